use super::domain::{OfferContext, ProspectRecord, ScoredLead};

/// Storage abstraction for the current offer, the uploaded prospect batch,
/// and the last run's results. Injected into the orchestrator so the
/// scoring pipeline can be exercised in isolation; no ambient singletons.
///
/// Contract notes:
/// - `set_offer` replaces the offer and clears any stored results, since
///   results are only meaningful against the offer they were scored with.
/// - `replace_results` swaps the whole result set atomically; results are
///   never patched incrementally.
pub trait LeadRepository: Send + Sync {
    fn offer(&self) -> Result<Option<OfferContext>, RepositoryError>;
    fn set_offer(&self, offer: OfferContext) -> Result<(), RepositoryError>;
    fn prospects(&self) -> Result<Vec<ProspectRecord>, RepositoryError>;
    fn replace_prospects(&self, prospects: Vec<ProspectRecord>) -> Result<usize, RepositoryError>;
    fn results(&self) -> Result<Vec<ScoredLead>, RepositoryError>;
    fn replace_results(&self, results: Vec<ScoredLead>) -> Result<(), RepositoryError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("lead store unavailable: {0}")]
    Unavailable(String),
}
