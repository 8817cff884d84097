use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ClassifierConfig;

use super::domain::{
    IntentAnalysis, IntentLevel, OfferContext, ProspectRecord, RuleBreakdown, RunState,
    RunStatistics, ScoredLead,
};
use super::intent::{
    fallback_analysis, ClassifierError, CompletionTransport, ConnectivityReport, IntentClassifier,
    RetryPolicy,
};
use super::repository::{LeadRepository, RepositoryError};
use super::rules;

/// Knobs for a scoring run. Defaults match the env-driven
/// `ClassifierConfig` defaults.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub use_ai: bool,
    pub ai_timeout_ms: u64,
    pub continue_on_ai_failure: bool,
    pub batch_size: usize,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub inter_batch_delay_ms: u64,
    pub max_upload_rows: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            use_ai: true,
            ai_timeout_ms: 10_000,
            continue_on_ai_failure: true,
            batch_size: 5,
            max_retries: 3,
            retry_base_delay_ms: 500,
            inter_batch_delay_ms: 200,
            max_upload_rows: 1000,
        }
    }
}

impl ScoringConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries.max(1),
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
            call_timeout: Duration::from_millis(self.ai_timeout_ms),
        }
    }
}

impl From<&ClassifierConfig> for ScoringConfig {
    fn from(config: &ClassifierConfig) -> Self {
        Self {
            use_ai: config.use_ai,
            ai_timeout_ms: config.timeout_ms,
            continue_on_ai_failure: config.continue_on_ai_failure,
            batch_size: config.batch_size,
            max_retries: config.max_retries,
            retry_base_delay_ms: config.retry_base_delay_ms,
            inter_batch_delay_ms: config.inter_batch_delay_ms,
            max_upload_rows: config.max_upload_rows,
        }
    }
}

/// Error raised by the scoring orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("no offer context configured")]
    NoOffer,
    #[error("no prospects uploaded")]
    NoLeads,
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Summary returned by a full scoring run.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringRunReport {
    pub scored: usize,
    pub stats: RunStatistics,
}

/// Orchestrator combining the rule engine and the intent classifier into
/// combined, explainable scores, with batched concurrency against the
/// remote classifier and per-run statistics.
pub struct LeadScoringService<R, T> {
    repository: Arc<R>,
    classifier: IntentClassifier<T>,
    config: ScoringConfig,
    stats: Mutex<RunStatistics>,
}

impl<R, T> LeadScoringService<R, T>
where
    R: LeadRepository + 'static,
    T: CompletionTransport + 'static,
{
    pub fn new(repository: Arc<R>, transport: Arc<T>, config: ScoringConfig) -> Self {
        let classifier = IntentClassifier::new(transport, config.retry_policy());
        Self {
            repository,
            classifier,
            config,
            stats: Mutex::new(RunStatistics::default()),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Statistics snapshot for the most recent (or in-flight) run.
    pub fn stats(&self) -> RunStatistics {
        self.stats.lock().expect("stats mutex poisoned").clone()
    }

    pub async fn connectivity_check(&self) -> ConnectivityReport {
        self.classifier.connectivity_check().await
    }

    /// Intent analysis that always resolves: remote classification when AI
    /// is enabled, with the heuristic fallback covering hard failures and
    /// the AI-disabled path.
    pub async fn analyze_intent(
        &self,
        prospect: &ProspectRecord,
        offer: &OfferContext,
    ) -> IntentAnalysis {
        if !self.config.use_ai {
            return fallback_analysis(prospect, offer);
        }
        match self.classifier.classify(prospect, offer).await {
            Ok(analysis) => analysis,
            Err(_) => fallback_analysis(prospect, offer),
        }
    }

    /// Score one prospect.
    ///
    /// The rule breakdown always succeeds. The classifier path honors
    /// `continue_on_ai_failure`: on exhaustion the fallback analysis is
    /// substituted (and counted) unless strict mode propagates the error.
    pub async fn score_lead(
        &self,
        prospect: &ProspectRecord,
        offer: &OfferContext,
    ) -> Result<ScoredLead, ScoringError> {
        let breakdown = rules::rule_breakdown(prospect, offer);

        let analysis = if self.config.use_ai {
            match self.classifier.classify(prospect, offer).await {
                Ok(analysis) => {
                    self.with_stats(|stats| stats.ai_succeeded += 1);
                    analysis
                }
                Err(err) => {
                    self.with_stats(|stats| stats.ai_failed += 1);
                    if !self.config.continue_on_ai_failure {
                        return Err(err.into());
                    }
                    warn!(
                        prospect = %prospect.name,
                        error = %err,
                        "classifier unavailable, substituting heuristic fallback"
                    );
                    fallback_analysis(prospect, offer)
                }
            }
        } else {
            fallback_analysis(prospect, offer)
        };

        // The reconciled label is shown to the user; the numeric score keeps
        // the classifier's original contribution (see DESIGN.md).
        let final_intent = reconcile_intent(analysis.level, breakdown.total);
        let total_score = breakdown.total + analysis.score;

        Ok(ScoredLead {
            prospect: prospect.clone(),
            final_intent,
            total_score,
            combined_reasoning: combine_reasoning(&breakdown, &analysis.reasoning),
            rule_breakdown: breakdown,
            intent_analysis: analysis,
            scored_at: chrono::Utc::now(),
        })
    }

    /// Score a list of prospects in fixed-size batches.
    ///
    /// Within a batch, leads run concurrently against the classifier;
    /// results are collected positionally so output order always matches
    /// input order. A short pause separates batches to throttle remote-call
    /// pressure. A lead whose scoring fails becomes a zero-score Low
    /// placeholder rather than aborting the batch; failures are surfaced
    /// through the run statistics.
    pub async fn score_leads(
        &self,
        prospects: &[ProspectRecord],
        offer: &OfferContext,
    ) -> Vec<ScoredLead> {
        self.with_stats(|stats| *stats = RunStatistics::start_run(prospects.len()));

        let batch_size = self.config.batch_size.max(1);
        let mut results = Vec::with_capacity(prospects.len());

        for batch in prospects.chunks(batch_size) {
            if !results.is_empty() && self.config.inter_batch_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.inter_batch_delay_ms)).await;
            }

            let scored = join_all(batch.iter().map(|prospect| async move {
                let started = Instant::now();
                let outcome = self.score_lead(prospect, offer).await;
                (prospect, outcome, started.elapsed())
            }))
            .await;

            for (prospect, outcome, elapsed) in scored {
                let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
                match outcome {
                    Ok(lead) => {
                        self.with_stats(|stats| stats.record_lead(&lead, false, elapsed_ms));
                        results.push(lead);
                    }
                    Err(err) => {
                        warn!(prospect = %prospect.name, error = %err, "lead scoring failed");
                        let placeholder = placeholder_lead(prospect, &err);
                        self.with_stats(|stats| {
                            stats.record_lead(&placeholder, true, elapsed_ms)
                        });
                        results.push(placeholder);
                    }
                }
            }
        }

        self.with_stats(|stats| stats.state = RunState::Completed);
        results
    }

    /// Full scoring pass against the store: read offer and prospects, score,
    /// replace the stored result set atomically, and report.
    pub async fn run_scoring(&self) -> Result<ScoringRunReport, ScoringError> {
        let offer = self.repository.offer()?.ok_or(ScoringError::NoOffer)?;
        let prospects = self.repository.prospects()?;
        if prospects.is_empty() {
            return Err(ScoringError::NoLeads);
        }

        info!(total = prospects.len(), use_ai = self.config.use_ai, "scoring run started");
        let results = self.score_leads(&prospects, &offer).await;
        self.repository.replace_results(results.clone())?;

        let stats = self.stats();
        info!(
            scored = results.len(),
            succeeded = stats.succeeded,
            failed = stats.failed,
            ai_failed = stats.ai_failed,
            "scoring run completed"
        );

        Ok(ScoringRunReport {
            scored: results.len(),
            stats,
        })
    }

    fn with_stats(&self, update: impl FnOnce(&mut RunStatistics)) {
        let mut stats = self.stats.lock().expect("stats mutex poisoned");
        update(&mut stats);
    }
}

/// Asymmetric trust policy: rule evidence pulls extreme AI verdicts toward
/// the middle, never flips High<->Low, and never touches a Medium verdict.
fn reconcile_intent(ai_level: IntentLevel, rule_total: u8) -> IntentLevel {
    match ai_level {
        IntentLevel::High if rule_total < 10 => IntentLevel::Medium,
        IntentLevel::Low if rule_total >= 40 => IntentLevel::Medium,
        other => other,
    }
}

fn combine_reasoning(breakdown: &RuleBreakdown, ai_reasoning: &str) -> String {
    let factors = rules::rule_factors(breakdown);
    if factors.is_empty() {
        format!("No rule factors matched. {ai_reasoning}")
    } else {
        format!("Rule factors: {}. {}", factors.join(", "), ai_reasoning)
    }
}

/// Zero-score stand-in keeping the result list aligned with the input list
/// when a single lead's scoring raises.
fn placeholder_lead(prospect: &ProspectRecord, error: &ScoringError) -> ScoredLead {
    ScoredLead {
        prospect: prospect.clone(),
        final_intent: IntentLevel::Low,
        total_score: 0,
        combined_reasoning: format!("Scoring failed: {error}"),
        rule_breakdown: RuleBreakdown::zero(),
        intent_analysis: IntentAnalysis {
            level: IntentLevel::Low,
            reasoning: format!("Scoring failed: {error}"),
            score: 0,
            confidence: 0.0,
        },
        scored_at: chrono::Utc::now(),
    }
}
