//! Intent classifier client: prompt construction, the retry loop against a
//! remote completion backend, response parsing, and the local heuristic
//! fallback used when the remote path is unusable.

mod parser;
mod prompt;
mod transport;

pub use parser::{estimate_confidence, parse_response, ParseOutcome};
pub use transport::{
    CompletionTransport, DisabledTransport, HttpCompletionTransport, TransportError,
};

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::warn;

use super::domain::{IntentAnalysis, IntentLevel, OfferContext, ProspectRecord};
use super::rules;

/// Confidence reported whenever the heuristic fallback substitutes for the
/// remote classifier, signalling degraded quality downstream.
pub const FALLBACK_CONFIDENCE: f32 = 0.3;

/// Marker embedded in fallback reasoning so degraded runs are detectable.
pub const FALLBACK_MARKER: &str = "heuristic fallback";

/// Retry behavior for remote classifier calls: bounded attempts with
/// exponential backoff and a per-call deadline.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub call_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            call_timeout: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt following `failed_attempt`:
    /// `base_delay * 2^(failed_attempt - 1)`.
    pub fn delay_after(&self, failed_attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(failed_attempt.saturating_sub(1))
    }
}

/// Raised when every configured attempt against the remote classifier has
/// failed; the orchestrator decides between fallback and propagation.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier gave up after {attempts} attempt(s): {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}

/// Result of the connectivity probe. Never raised as an error.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectivityReport {
    pub connected: bool,
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Client for the remote intent classifier.
pub struct IntentClassifier<T> {
    transport: Arc<T>,
    policy: RetryPolicy,
}

impl<T: CompletionTransport> IntentClassifier<T> {
    pub fn new(transport: Arc<T>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Classify one prospect against the offer.
    ///
    /// Hard remote failures (timeouts, transport errors, empty responses,
    /// exhausted retries) surface as `ClassifierError`. A response that
    /// arrives but carries no recognizable intent is a soft failure: the
    /// heuristic fallback is substituted without another remote call.
    pub async fn classify(
        &self,
        prospect: &ProspectRecord,
        offer: &OfferContext,
    ) -> Result<IntentAnalysis, ClassifierError> {
        let request = prompt::build_classification_prompt(prospect, offer);
        let raw = self.complete_with_retry(&request).await?;

        Ok(match parser::parse_response(&raw) {
            ParseOutcome::Parsed { level, reasoning } => IntentAnalysis {
                level,
                score: level.score(),
                reasoning,
                confidence: parser::estimate_confidence(&raw),
            },
            ParseOutcome::Unparsed => {
                warn!(
                    prospect = %prospect.name,
                    "classifier response had no recognizable intent, using heuristic fallback"
                );
                fallback_analysis(prospect, offer)
            }
        })
    }

    /// Runs a minimal prompt through the same retry path and reports the
    /// outcome without throwing.
    pub async fn connectivity_check(&self) -> ConnectivityReport {
        let started = Instant::now();
        match self.complete_with_retry(prompt::CONNECTIVITY_PROMPT).await {
            Ok(_) => ConnectivityReport {
                connected: true,
                response_time_ms: started.elapsed().as_millis() as u64,
                error: None,
            },
            Err(err) => ConnectivityReport {
                connected: false,
                response_time_ms: started.elapsed().as_millis() as u64,
                error: Some(err.to_string()),
            },
        }
    }

    async fn complete_with_retry(&self, request: &str) -> Result<String, ClassifierError> {
        let attempts = self.policy.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match tokio::time::timeout(self.policy.call_timeout, self.transport.complete(request))
                .await
            {
                Ok(Ok(text)) if !text.trim().is_empty() => return Ok(text),
                Ok(Ok(_)) => last_error = "empty completion".to_string(),
                Ok(Err(err)) => last_error = err.to_string(),
                Err(_) => {
                    last_error = format!("timed out after {:?}", self.policy.call_timeout);
                }
            }

            warn!(attempt, %last_error, "classifier call failed");
            if attempt < attempts {
                tokio::time::sleep(self.policy.delay_after(attempt)).await;
            }
        }

        Err(ClassifierError::Exhausted {
            attempts,
            last_error,
        })
    }
}

/// Cheap local heuristic substituted when the remote classifier is unusable
/// or unparsable: decision-maker role and direct industry/use-case match,
/// both -> High, one -> Medium, neither -> Low. Confidence is pinned low
/// and the reasoning carries an explicit marker.
pub fn fallback_analysis(prospect: &ProspectRecord, offer: &OfferContext) -> IntentAnalysis {
    let decision_maker = rules::has_decision_maker_title(&prospect.role);
    let industry_match = rules::industry_direct_match(&prospect.industry, &offer.ideal_use_cases);

    let level = match (decision_maker, industry_match) {
        (true, true) => IntentLevel::High,
        (true, false) | (false, true) => IntentLevel::Medium,
        (false, false) => IntentLevel::Low,
    };

    let reasoning = format!(
        "Classified via {FALLBACK_MARKER} (remote classifier unavailable): role {} a decision-maker title, industry {} the ideal use cases.",
        if decision_maker { "matches" } else { "does not match" },
        if industry_match { "matches" } else { "does not match" },
    );

    IntentAnalysis {
        level,
        score: level.score(),
        reasoning,
        confidence: FALLBACK_CONFIDENCE,
    }
}
