use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::qualification::domain::{OfferContext, ProspectRecord, ScoredLead};
use crate::qualification::intent::{CompletionTransport, TransportError};
use crate::qualification::repository::{LeadRepository, RepositoryError};
use crate::qualification::service::{LeadScoringService, ScoringConfig};

#[derive(Default)]
struct StoreInner {
    offer: Option<OfferContext>,
    prospects: Vec<ProspectRecord>,
    results: Vec<ScoredLead>,
}

/// In-memory store mirroring the api crate's production implementation.
#[derive(Default)]
pub(super) struct MemoryRepository {
    inner: Mutex<StoreInner>,
}

impl LeadRepository for MemoryRepository {
    fn offer(&self) -> Result<Option<OfferContext>, RepositoryError> {
        Ok(self.inner.lock().expect("store mutex poisoned").offer.clone())
    }

    fn set_offer(&self, offer: OfferContext) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.offer = Some(offer);
        inner.results.clear();
        Ok(())
    }

    fn prospects(&self) -> Result<Vec<ProspectRecord>, RepositoryError> {
        Ok(self
            .inner
            .lock()
            .expect("store mutex poisoned")
            .prospects
            .clone())
    }

    fn replace_prospects(&self, prospects: Vec<ProspectRecord>) -> Result<usize, RepositoryError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.prospects = prospects;
        Ok(inner.prospects.len())
    }

    fn results(&self) -> Result<Vec<ScoredLead>, RepositoryError> {
        Ok(self
            .inner
            .lock()
            .expect("store mutex poisoned")
            .results
            .clone())
    }

    fn replace_results(&self, results: Vec<ScoredLead>) -> Result<(), RepositoryError> {
        self.inner.lock().expect("store mutex poisoned").results = results;
        Ok(())
    }
}

/// Always answers with the same completion text.
pub(super) struct StaticTransport(pub(super) &'static str);

#[async_trait]
impl CompletionTransport for StaticTransport {
    async fn complete(&self, _prompt: &str) -> Result<String, TransportError> {
        Ok(self.0.to_string())
    }
}

/// Always fails, counting the attempts it absorbed.
#[derive(Default)]
pub(super) struct FailingTransport {
    pub(super) calls: AtomicUsize,
}

#[async_trait]
impl CompletionTransport for FailingTransport {
    async fn complete(&self, _prompt: &str) -> Result<String, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(TransportError::Request("connection refused".to_string()))
    }
}

/// Completes out of order: prospects whose name appears in `slow_names`
/// stall before answering, so later batch members finish first.
pub(super) struct StaggeredTransport {
    pub(super) slow_names: Vec<&'static str>,
}

#[async_trait]
impl CompletionTransport for StaggeredTransport {
    async fn complete(&self, prompt: &str) -> Result<String, TransportError> {
        if self.slow_names.iter().any(|name| prompt.contains(name)) {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        let name = prompt
            .lines()
            .find_map(|line| line.strip_prefix("Name: "))
            .unwrap_or("unknown");
        Ok(format!("Intent: High\nReasoning: strong fit for {name}"))
    }
}

pub(super) fn offer() -> OfferContext {
    OfferContext::new(
        "Outbound Copilot",
        vec!["Personalized outreach at scale".to_string()],
        vec!["Technology companies".to_string()],
    )
    .expect("valid offer")
}

pub(super) fn prospect(name: &str, role: &str, industry: &str) -> ProspectRecord {
    ProspectRecord::new(
        name,
        role,
        "Acme Corp",
        industry,
        "Denver, CO",
        "Owns the revenue tooling roadmap.",
    )
    .expect("valid prospect")
}

pub(super) fn fast_config() -> ScoringConfig {
    ScoringConfig {
        ai_timeout_ms: 500,
        retry_base_delay_ms: 1,
        inter_batch_delay_ms: 1,
        max_retries: 2,
        ..ScoringConfig::default()
    }
}

pub(super) fn service<T: CompletionTransport + 'static>(
    transport: T,
    config: ScoringConfig,
) -> (Arc<MemoryRepository>, LeadScoringService<MemoryRepository, T>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = LeadScoringService::new(repository.clone(), Arc::new(transport), config);
    (repository, service)
}
