use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MAX_NAME_LEN: usize = 200;
const MAX_VALUE_PROP_LEN: usize = 500;
const MAX_USE_CASE_LEN: usize = 200;
const MAX_LIST_LEN: usize = 10;
const MAX_FIELD_LEN: usize = 200;
const MAX_SUMMARY_LEN: usize = 2000;

/// The product or service leads are qualified against.
///
/// Immutable once scoring starts; the store clears stored results whenever
/// a new offer replaces this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferContext {
    pub name: String,
    pub value_propositions: Vec<String>,
    pub ideal_use_cases: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl OfferContext {
    pub fn new(
        name: impl Into<String>,
        value_propositions: Vec<String>,
        ideal_use_cases: Vec<String>,
    ) -> Result<Self, OfferValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
            return Err(OfferValidationError::InvalidName);
        }

        let value_propositions: Vec<String> = value_propositions
            .into_iter()
            .map(|entry| entry.trim().to_string())
            .collect();
        if value_propositions.is_empty() || value_propositions.len() > MAX_LIST_LEN {
            return Err(OfferValidationError::ValuePropositionCount);
        }
        for (index, entry) in value_propositions.iter().enumerate() {
            if entry.is_empty() || entry.chars().count() > MAX_VALUE_PROP_LEN {
                return Err(OfferValidationError::ValuePropositionLength { index });
            }
        }

        let ideal_use_cases: Vec<String> = ideal_use_cases
            .into_iter()
            .map(|entry| entry.trim().to_string())
            .collect();
        if ideal_use_cases.is_empty() || ideal_use_cases.len() > MAX_LIST_LEN {
            return Err(OfferValidationError::UseCaseCount);
        }
        for (index, entry) in ideal_use_cases.iter().enumerate() {
            if entry.is_empty() || entry.chars().count() > MAX_USE_CASE_LEN {
                return Err(OfferValidationError::UseCaseLength { index });
            }
        }

        Ok(Self {
            name,
            value_propositions,
            ideal_use_cases,
            created_at: Utc::now(),
        })
    }
}

/// Rejection reasons for a malformed offer submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OfferValidationError {
    #[error("offer name must be 1-200 characters")]
    InvalidName,
    #[error("offer requires 1-10 value propositions")]
    ValuePropositionCount,
    #[error("value proposition {index} must be 1-500 characters")]
    ValuePropositionLength { index: usize },
    #[error("offer requires 1-10 ideal use cases")]
    UseCaseCount,
    #[error("ideal use case {index} must be 1-200 characters")]
    UseCaseLength { index: usize },
}

/// A single uploaded lead's profile, created by bulk ingestion and
/// immutable afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProspectRecord {
    pub name: String,
    pub role: String,
    pub company: String,
    pub industry: String,
    pub location: String,
    pub professional_summary: String,
    pub uploaded_at: DateTime<Utc>,
}

impl ProspectRecord {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        company: impl Into<String>,
        industry: impl Into<String>,
        location: impl Into<String>,
        professional_summary: impl Into<String>,
    ) -> Result<Self, ProspectValidationError> {
        let record = Self {
            name: name.into().trim().to_string(),
            role: role.into().trim().to_string(),
            company: company.into().trim().to_string(),
            industry: industry.into().trim().to_string(),
            location: location.into().trim().to_string(),
            professional_summary: professional_summary.into().trim().to_string(),
            uploaded_at: Utc::now(),
        };

        for (field, value, max) in [
            ("name", &record.name, MAX_FIELD_LEN),
            ("role", &record.role, MAX_FIELD_LEN),
            ("company", &record.company, MAX_FIELD_LEN),
            ("industry", &record.industry, MAX_FIELD_LEN),
            ("location", &record.location, MAX_FIELD_LEN),
            (
                "professional_summary",
                &record.professional_summary,
                MAX_SUMMARY_LEN,
            ),
        ] {
            if value.is_empty() {
                return Err(ProspectValidationError::MissingField { field });
            }
            if value.chars().count() > max {
                return Err(ProspectValidationError::TooLong { field, max });
            }
        }

        Ok(record)
    }
}

/// Rejection reasons for a malformed prospect row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProspectValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("{field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Coarse buying-intent classification from the AI path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentLevel {
    High,
    Medium,
    Low,
}

impl IntentLevel {
    /// Fixed 1:1 numeric mapping used in the combined score.
    pub fn score(self) -> u8 {
        match self {
            IntentLevel::High => 50,
            IntentLevel::Medium => 30,
            IntentLevel::Low => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IntentLevel::High => "High",
            IntentLevel::Medium => "Medium",
            IntentLevel::Low => "Low",
        }
    }
}

/// Itemized deterministic sub-score, recomputed on every scoring run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBreakdown {
    pub role_score: u8,
    pub industry_score: u8,
    pub completeness_score: u8,
    pub total: u8,
}

impl RuleBreakdown {
    pub fn zero() -> Self {
        Self {
            role_score: 0,
            industry_score: 0,
            completeness_score: 0,
            total: 0,
        }
    }
}

/// Classifier (or fallback-heuristic) verdict for one prospect.
///
/// `confidence` is a heuristic estimate of response hedging, not a
/// calibrated probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentAnalysis {
    pub level: IntentLevel,
    pub reasoning: String,
    pub score: u8,
    pub confidence: f32,
}

/// One prospect's combined result. The full set is replaced atomically in
/// the store on every scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredLead {
    pub prospect: ProspectRecord,
    /// Final intent after rule reconciliation; may differ from
    /// `intent_analysis.level`.
    pub final_intent: IntentLevel,
    pub total_score: u8,
    pub combined_reasoning: String,
    pub rule_breakdown: RuleBreakdown,
    pub intent_analysis: IntentAnalysis,
    pub scored_at: DateTime<Utc>,
}

/// Lifecycle of the most recent scoring run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Completed,
}

/// Aggregate counters accumulated across a scoring run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStatistics {
    pub state: RunState,
    pub total_leads: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub ai_succeeded: usize,
    pub ai_failed: usize,
    pub avg_lead_ms: f64,
    pub high_intent: usize,
    pub medium_intent: usize,
    pub low_intent: usize,
}

impl RunStatistics {
    pub(crate) fn start_run(total_leads: usize) -> Self {
        Self {
            state: RunState::Running,
            total_leads,
            ..Self::default()
        }
    }

    pub(crate) fn record_lead(&mut self, lead: &ScoredLead, failed: bool, elapsed_ms: f64) {
        if failed {
            self.failed += 1;
        } else {
            self.succeeded += 1;
        }
        match lead.final_intent {
            IntentLevel::High => self.high_intent += 1,
            IntentLevel::Medium => self.medium_intent += 1,
            IntentLevel::Low => self.low_intent += 1,
        }
        let completed = (self.succeeded + self.failed) as f64;
        self.avg_lead_ms += (elapsed_ms - self.avg_lead_ms) / completed;
    }
}
