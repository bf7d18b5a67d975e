//! Term Database — the categorized vocabulary the lexical matcher scans for.
//!
//! Loaded once at startup (bundled finance vocabulary, or a JSON file named by
//! `TERM_DATABASE_PATH`) and shared read-only afterwards.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Categories as the database stores them. Output categories are assembled from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceCategory {
    HighPriority,
    Technical,
    Soft,
    Industry,
    ActionVerb,
    Compliance,
}

const HIGH_PRIORITY_TERMS: &[&str] = &[
    "financial modeling",
    "investment banking",
    "mergers and acquisitions",
    "m&a",
    "due diligence",
    "valuation",
    "dcf",
    "lbo",
    "leveraged buyout",
    "discounted cash flow",
    "pitch deck",
    "client management",
    "relationship management",
    "deal execution",
    "transaction advisory",
    "capital markets",
    "equity research",
    "debt financing",
    "credit analysis",
    "risk management",
];

const TECHNICAL_SKILLS: &[&str] = &[
    "excel",
    "powerpoint",
    "bloomberg",
    "capital iq",
    "factset",
    "refinitiv",
    "sql",
    "python",
    "tableau",
    "power bi",
    "vba",
    "financial modeling",
    "monte carlo",
    "scenario analysis",
    "sensitivity analysis",
    "regression analysis",
    "financial statements",
    "gaap",
    "ifrs",
];

const SOFT_SKILLS: &[&str] = &[
    "leadership",
    "communication",
    "problem solving",
    "analytical thinking",
    "team collaboration",
    "client service",
    "attention to detail",
    "time management",
    "multitasking",
    "presentation skills",
    "negotiation",
    "critical thinking",
    "adaptability",
    "project management",
];

const INDUSTRY_TERMS: &[&str] = &[
    "big 4",
    "bulge bracket",
    "boutique",
    "sell side",
    "buy side",
    "front office",
    "back office",
    "middle office",
    "ibd",
    "investment banking division",
    "sales and trading",
    "s&t",
    "asset management",
    "wealth management",
    "private equity",
    "pe",
    "venture capital",
    "vc",
    "hedge fund",
    "mutual fund",
    "etf",
    "derivatives",
    "fixed income",
    "equities",
    "commodities",
    "forex",
    "fx",
    "treasury",
    "corporate finance",
    "restructuring",
    "distressed",
    "ipo",
    "secondary offering",
    "rights offering",
    "spin off",
    "carve out",
    "joint venture",
];

const ACTION_VERBS: &[&str] = &[
    "executed",
    "analyzed",
    "managed",
    "developed",
    "structured",
    "advised",
    "coordinated",
    "facilitated",
    "negotiated",
    "implemented",
    "optimized",
    "streamlined",
    "evaluated",
    "assessed",
    "monitored",
    "supervised",
    "collaborated",
    "presented",
    "delivered",
];

const COMPLIANCE_TERMS: &[&str] = &[
    "sox",
    "sarbanes oxley",
    "sec",
    "finra",
    "cftc",
    "basel",
    "dodd frank",
    "mifid",
    "kyc",
    "aml",
    "anti money laundering",
    "compliance",
    "regulatory",
    "audit",
    "internal controls",
];

/// On-disk shape of a custom term database. Keys match the bundled vocabulary's names.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TermDatabaseFile {
    high_priority_terms: Vec<String>,
    technical_skills: Vec<String>,
    soft_skills: Vec<String>,
    industry_terms: Vec<String>,
    action_verbs: Vec<String>,
    compliance_terms: Vec<String>,
}

/// Immutable, categorized term lists. Every term is trimmed, lowercase, non-empty,
/// and unique within its list.
#[derive(Debug, Clone)]
pub struct TermDatabase {
    high_priority: Vec<String>,
    technical: Vec<String>,
    soft: Vec<String>,
    industry: Vec<String>,
    action_verbs: Vec<String>,
    compliance: Vec<String>,
}

impl TermDatabase {
    /// The bundled finance vocabulary.
    pub fn builtin() -> Self {
        let owned = |terms: &[&str]| terms.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        Self::from_lists(TermDatabaseFile {
            high_priority_terms: owned(HIGH_PRIORITY_TERMS),
            technical_skills: owned(TECHNICAL_SKILLS),
            soft_skills: owned(SOFT_SKILLS),
            industry_terms: owned(INDUSTRY_TERMS),
            action_verbs: owned(ACTION_VERBS),
            compliance_terms: owned(COMPLIANCE_TERMS),
        })
    }

    /// Loads a term database from a JSON file. Missing keys yield empty lists.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read term database '{}'", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("Invalid term database '{}'", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let file: TermDatabaseFile = serde_json::from_str(raw)?;
        Ok(Self::from_lists(file))
    }

    fn from_lists(file: TermDatabaseFile) -> Self {
        Self {
            high_priority: clean_terms(file.high_priority_terms),
            technical: clean_terms(file.technical_skills),
            soft: clean_terms(file.soft_skills),
            industry: clean_terms(file.industry_terms),
            action_verbs: clean_terms(file.action_verbs),
            compliance: clean_terms(file.compliance_terms),
        }
    }

    pub fn lookup(&self, category: SourceCategory) -> &[String] {
        match category {
            SourceCategory::HighPriority => &self.high_priority,
            SourceCategory::Technical => &self.technical,
            SourceCategory::Soft => &self.soft,
            SourceCategory::Industry => &self.industry,
            SourceCategory::ActionVerb => &self.action_verbs,
            SourceCategory::Compliance => &self.compliance,
        }
    }

    /// Total number of terms across all categories.
    pub fn term_count(&self) -> usize {
        self.high_priority.len()
            + self.technical.len()
            + self.soft.len()
            + self.industry.len()
            + self.action_verbs.len()
            + self.compliance.len()
    }
}

fn clean_terms(terms: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}
