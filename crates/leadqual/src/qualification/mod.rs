//! Lead qualification pipeline: the deterministic rule engine, the AI
//! intent classifier client, and the orchestrator that merges both signals
//! into combined, explainable scores.

pub mod domain;
pub mod intent;
pub mod repository;
pub mod router;
pub mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    IntentAnalysis, IntentLevel, OfferContext, OfferValidationError, ProspectRecord,
    ProspectValidationError, RuleBreakdown, RunState, RunStatistics, ScoredLead,
};
pub use intent::{
    fallback_analysis, ClassifierError, CompletionTransport, ConnectivityReport,
    DisabledTransport, HttpCompletionTransport, IntentClassifier, RetryPolicy, TransportError,
    FALLBACK_CONFIDENCE, FALLBACK_MARKER,
};
pub use repository::{LeadRepository, RepositoryError};
pub use router::{qualification_router, LeadUploadRequest, OfferSubmission};
pub use service::{LeadScoringService, ScoringConfig, ScoringError, ScoringRunReport};
