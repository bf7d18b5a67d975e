//! Lexical Matcher — deterministic, whole-word keyword matching against the term database.
//!
//! Algorithm:
//! 1. Every term is compiled once into `(?-u:\b)<escaped term>(?-u:\b)` (case-insensitive).
//!    Word boundaries are ASCII-only, so a term touching CJK or accented letters still matches.
//! 2. Count non-overlapping occurrences in the lowercased text; count ≥ 1 means matched.
//! 3. Rank matched terms by count, descending. Ties keep the term list's order (stable sort).
//! 4. Assemble output categories from source lists and truncate to each cap.
//! 5. Prepend context labels to high priority when trigger substrings appear.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};
use tracing::trace;

use crate::keywords::models::{ExtractionResult, RawKeywords, TermCategory};
use crate::keywords::terms::{SourceCategory, TermDatabase};

/// Per-call occurrence counts, keyed by term.
pub type MatchTally = HashMap<String, usize>;

/// Labels prepended to high priority when the text mentions consulting work.
const CONSULTING_TRIGGERS: &[&str] = &["consulting", "advisory"];
const CONSULTING_LABELS: [&str; 2] = ["Management Consulting", "Strategic Advisory"];

/// Labels prepended to high priority when the text mentions audit work.
const AUDIT_TRIGGERS: &[&str] = &["audit", "assurance"];
const AUDIT_LABELS: [&str; 2] = ["External Audit", "Internal Audit"];

/// Builds the whole-word pattern for a term, escaping every regex metacharacter.
pub fn term_pattern(term: &str) -> String {
    format!(r"(?-u:\b){}(?-u:\b)", regex::escape(term))
}

#[derive(Debug, Clone)]
struct CompiledTerm {
    term: String,
    pattern: Regex,
}

/// Result of ranking one term list against a text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedMatches {
    pub tally: MatchTally,
    /// Matched terms, most frequent first.
    pub ordered: Vec<String>,
}

/// Compiled matcher over a [`TermDatabase`]. Built once at startup, then shared.
#[derive(Debug, Clone)]
pub struct LexicalMatcher {
    high_priority: Vec<CompiledTerm>,
    technical: Vec<CompiledTerm>,
    soft: Vec<CompiledTerm>,
    industry: Vec<CompiledTerm>,
    action_verbs: Vec<CompiledTerm>,
    compliance: Vec<CompiledTerm>,
}

impl LexicalMatcher {
    pub fn new(db: &TermDatabase) -> Result<Self, regex::Error> {
        let compile = |category: SourceCategory| -> Result<Vec<CompiledTerm>, regex::Error> {
            db.lookup(category)
                .iter()
                .map(|term| {
                    let pattern = RegexBuilder::new(&term_pattern(term))
                        .case_insensitive(true)
                        .build()?;
                    Ok(CompiledTerm {
                        term: term.clone(),
                        pattern,
                    })
                })
                .collect()
        };

        Ok(Self {
            high_priority: compile(SourceCategory::HighPriority)?,
            technical: compile(SourceCategory::Technical)?,
            soft: compile(SourceCategory::Soft)?,
            industry: compile(SourceCategory::Industry)?,
            action_verbs: compile(SourceCategory::ActionVerb)?,
            compliance: compile(SourceCategory::Compliance)?,
        })
    }

    /// Runs the full local extraction over `text`. Never fails; empty text yields empty lists.
    pub fn extract(&self, text: &str) -> ExtractionResult {
        let text_lower = text.to_lowercase();

        let mut high_priority = top(
            &text_lower,
            self.high_priority.iter(),
            TermCategory::PriorityHigh,
        );
        prepend_context_labels(&text_lower, &mut high_priority);

        ExtractionResult::normalize(RawKeywords {
            high_priority,
            medium_priority: top(
                &text_lower,
                self.industry.iter().chain(self.compliance.iter()),
                TermCategory::PriorityMedium,
            ),
            technical_skills: top(&text_lower, self.technical.iter(), TermCategory::TechnicalSkill),
            soft_skills: top(&text_lower, self.soft.iter(), TermCategory::SoftSkill),
            industry_terms: top(&text_lower, self.industry.iter(), TermCategory::IndustryTerm),
            action_verbs: top(&text_lower, self.action_verbs.iter(), TermCategory::ActionVerb),
        })
    }

    /// Ranks a single source list against `text`, without truncation.
    #[cfg(test)]
    pub fn rank_category(&self, text: &str, category: SourceCategory) -> RankedMatches {
        let terms = match category {
            SourceCategory::HighPriority => &self.high_priority,
            SourceCategory::Technical => &self.technical,
            SourceCategory::Soft => &self.soft,
            SourceCategory::Industry => &self.industry,
            SourceCategory::ActionVerb => &self.action_verbs,
            SourceCategory::Compliance => &self.compliance,
        };
        rank(&text.to_lowercase(), terms.iter())
    }
}

fn rank<'a>(text_lower: &str, terms: impl Iterator<Item = &'a CompiledTerm>) -> RankedMatches {
    let mut tally = MatchTally::new();
    let mut ordered = Vec::new();

    for compiled in terms {
        let count = compiled.pattern.find_iter(text_lower).count();
        if count > 0 && !tally.contains_key(&compiled.term) {
            tally.insert(compiled.term.clone(), count);
            ordered.push(compiled.term.clone());
        }
    }

    // sort_by is stable: equal counts keep list order
    ordered.sort_by(|a, b| tally[b].cmp(&tally[a]));

    RankedMatches { tally, ordered }
}

fn top<'a>(
    text_lower: &str,
    terms: impl Iterator<Item = &'a CompiledTerm>,
    category: TermCategory,
) -> Vec<String> {
    let RankedMatches { tally, mut ordered } = rank(text_lower, terms);
    trace!("{:?}: {} distinct terms matched", category, tally.len());
    ordered.truncate(category.cap());
    ordered
}

/// Consulting labels are prepended first, audit labels second, so audit leads when both fire.
/// Duplicates and cap overflow are handled by normalization afterwards.
fn prepend_context_labels(text_lower: &str, high_priority: &mut Vec<String>) {
    let mentions = |triggers: &[&str]| triggers.iter().any(|t| text_lower.contains(t));

    if mentions(CONSULTING_TRIGGERS) {
        high_priority.splice(0..0, CONSULTING_LABELS.iter().map(|s| s.to_string()));
    }
    if mentions(AUDIT_TRIGGERS) {
        high_priority.splice(0..0, AUDIT_LABELS.iter().map(|s| s.to_string()));
    }
}
