//! Canonical output shape shared by the local and remote extraction paths.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Output category. Closed set; wire keys are part of the public contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermCategory {
    PriorityHigh,
    PriorityMedium,
    TechnicalSkill,
    SoftSkill,
    IndustryTerm,
    ActionVerb,
}

impl TermCategory {
    pub const ALL: [TermCategory; 6] = [
        TermCategory::PriorityHigh,
        TermCategory::PriorityMedium,
        TermCategory::TechnicalSkill,
        TermCategory::SoftSkill,
        TermCategory::IndustryTerm,
        TermCategory::ActionVerb,
    ];

    /// Maximum number of keywords kept for this category.
    pub fn cap(self) -> usize {
        match self {
            TermCategory::PriorityHigh | TermCategory::TechnicalSkill | TermCategory::IndustryTerm => 8,
            TermCategory::PriorityMedium | TermCategory::SoftSkill | TermCategory::ActionVerb => 6,
        }
    }

    #[cfg(test)]
    pub fn json_key(self) -> &'static str {
        match self {
            TermCategory::PriorityHigh => "highPriority",
            TermCategory::PriorityMedium => "mediumPriority",
            TermCategory::TechnicalSkill => "technicalSkills",
            TermCategory::SoftSkill => "softSkills",
            TermCategory::IndustryTerm => "industryTerms",
            TermCategory::ActionVerb => "actionVerbs",
        }
    }
}

/// Unnormalized category lists, as produced by the matcher or decoded from a provider.
///
/// Missing keys in provider output decode as empty lists.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawKeywords {
    pub high_priority: Vec<String>,
    pub medium_priority: Vec<String>,
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub industry_terms: Vec<String>,
    pub action_verbs: Vec<String>,
}

impl RawKeywords {
    fn take(&mut self, category: TermCategory) -> Vec<String> {
        let slot = match category {
            TermCategory::PriorityHigh => &mut self.high_priority,
            TermCategory::PriorityMedium => &mut self.medium_priority,
            TermCategory::TechnicalSkill => &mut self.technical_skills,
            TermCategory::SoftSkill => &mut self.soft_skills,
            TermCategory::IndustryTerm => &mut self.industry_terms,
            TermCategory::ActionVerb => &mut self.action_verbs,
        };
        std::mem::take(slot)
    }
}

/// The extraction result handed back to callers.
///
/// Only constructible through [`ExtractionResult::normalize`], so every list is
/// trimmed, free of empty entries, case-insensitively distinct, and within its cap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    high_priority: Vec<String>,
    medium_priority: Vec<String>,
    technical_skills: Vec<String>,
    soft_skills: Vec<String>,
    industry_terms: Vec<String>,
    action_verbs: Vec<String>,
}

impl ExtractionResult {
    pub fn normalize(mut raw: RawKeywords) -> Self {
        let mut clean = |category: TermCategory| normalize_list(raw.take(category), category.cap());
        Self {
            high_priority: clean(TermCategory::PriorityHigh),
            medium_priority: clean(TermCategory::PriorityMedium),
            technical_skills: clean(TermCategory::TechnicalSkill),
            soft_skills: clean(TermCategory::SoftSkill),
            industry_terms: clean(TermCategory::IndustryTerm),
            action_verbs: clean(TermCategory::ActionVerb),
        }
    }

    pub fn get(&self, category: TermCategory) -> &[String] {
        match category {
            TermCategory::PriorityHigh => &self.high_priority,
            TermCategory::PriorityMedium => &self.medium_priority,
            TermCategory::TechnicalSkill => &self.technical_skills,
            TermCategory::SoftSkill => &self.soft_skills,
            TermCategory::IndustryTerm => &self.industry_terms,
            TermCategory::ActionVerb => &self.action_verbs,
        }
    }

    pub fn total(&self) -> usize {
        TermCategory::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Trims, drops empties, de-duplicates case-insensitively (first wins), then truncates.
fn normalize_list(terms: Vec<String>, cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
        .take(cap)
        .collect()
}
