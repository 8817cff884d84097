use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use leadqual::qualification::{
    LeadRepository, OfferContext, ProspectRecord, RepositoryError, ScoredLead,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct StoreInner {
    offer: Option<OfferContext>,
    prospects: Vec<ProspectRecord>,
    results: Vec<ScoredLead>,
}

/// Process-local lead store. Replacing the offer invalidates stored
/// results, since they were computed against the previous context.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadRepository {
    inner: Arc<Mutex<StoreInner>>,
}

impl LeadRepository for InMemoryLeadRepository {
    fn offer(&self) -> Result<Option<OfferContext>, RepositoryError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.offer.clone())
    }

    fn set_offer(&self, offer: OfferContext) -> Result<(), RepositoryError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard.offer = Some(offer);
        guard.results.clear();
        Ok(())
    }

    fn prospects(&self) -> Result<Vec<ProspectRecord>, RepositoryError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.prospects.clone())
    }

    fn replace_prospects(&self, prospects: Vec<ProspectRecord>) -> Result<usize, RepositoryError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard.prospects = prospects;
        Ok(guard.prospects.len())
    }

    fn results(&self) -> Result<Vec<ScoredLead>, RepositoryError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.results.clone())
    }

    fn replace_results(&self, results: Vec<ScoredLead>) -> Result<(), RepositoryError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard.results = results;
        Ok(())
    }
}
