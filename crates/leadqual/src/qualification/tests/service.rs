use std::sync::atomic::Ordering;

use super::common::*;
use crate::qualification::domain::IntentLevel;
use crate::qualification::intent::{FALLBACK_CONFIDENCE, FALLBACK_MARKER};
use crate::qualification::service::{ScoringConfig, ScoringError};

#[tokio::test]
async fn high_rule_and_ai_agreement_scores_one_hundred() {
    let (_, service) = service(
        StaticTransport("Intent: High\nReasoning: strong fit"),
        fast_config(),
    );

    let lead = service
        .score_lead(&prospect("Jamie", "CEO", "Technology"), &offer())
        .await
        .expect("scores");

    assert_eq!(lead.rule_breakdown.role_score, 20);
    assert_eq!(lead.rule_breakdown.industry_score, 20);
    assert_eq!(lead.rule_breakdown.completeness_score, 10);
    assert_eq!(lead.rule_breakdown.total, 50);
    assert_eq!(lead.intent_analysis.score, 50);
    assert_eq!(lead.total_score, 100);
    assert_eq!(lead.final_intent, IntentLevel::High);
    assert!(lead
        .combined_reasoning
        .starts_with("Rule factors: decision maker role, excellent industry fit, complete profile data."));
    assert!(lead.combined_reasoning.ends_with("strong fit"));
}

#[tokio::test]
async fn optimistic_ai_verdict_is_downgraded_on_weak_rules() {
    let (_, service) = service(
        StaticTransport("Intent: High\nReasoning: gut feel"),
        fast_config(),
    );

    // No decision-maker role, unrelated industry, blank summary: rule total 0.
    let mut weak = prospect("Sam", "Analyst", "Agriculture");
    weak.professional_summary = " ".to_string();
    let lead = service.score_lead(&weak, &offer()).await.expect("scores");

    assert_eq!(lead.rule_breakdown.total, 0);
    assert_eq!(lead.final_intent, IntentLevel::Medium);
    // The numeric contribution keeps the classifier's original 50.
    assert_eq!(lead.intent_analysis.level, IntentLevel::High);
    assert_eq!(lead.total_score, 50);
}

#[tokio::test]
async fn pessimistic_ai_verdict_is_upgraded_on_strong_rules() {
    let (_, service) = service(
        StaticTransport("Intent: Low\nReasoning: no signals found"),
        fast_config(),
    );

    let lead = service
        .score_lead(&prospect("Jamie", "CEO", "Technology"), &offer())
        .await
        .expect("scores");

    assert_eq!(lead.rule_breakdown.total, 50);
    assert_eq!(lead.final_intent, IntentLevel::Medium);
    assert_eq!(lead.intent_analysis.level, IntentLevel::Low);
    assert_eq!(lead.total_score, 60);
}

#[tokio::test]
async fn medium_ai_verdict_is_never_altered() {
    let (_, service) = service(
        StaticTransport("Intent: Medium\nReasoning: partial fit"),
        fast_config(),
    );

    let strong = service
        .score_lead(&prospect("Jamie", "CEO", "Technology"), &offer())
        .await
        .expect("scores");
    assert_eq!(strong.final_intent, IntentLevel::Medium);

    let mut weak = prospect("Sam", "Analyst", "Agriculture");
    weak.professional_summary = " ".to_string();
    let weak_lead = service.score_lead(&weak, &offer()).await.expect("scores");
    assert_eq!(weak_lead.rule_breakdown.total, 0);
    assert_eq!(weak_lead.final_intent, IntentLevel::Medium);
}

#[tokio::test]
async fn classifier_failure_substitutes_fallback_when_continuing() {
    let (_, service) = service(FailingTransport::default(), fast_config());

    let lead = service
        .score_lead(&prospect("Jamie", "CEO", "Technology"), &offer())
        .await
        .expect("fallback keeps the lead scorable");

    assert_eq!(lead.intent_analysis.confidence, FALLBACK_CONFIDENCE);
    assert!(lead.intent_analysis.reasoning.contains(FALLBACK_MARKER));
    // Decision maker + direct industry match: heuristic High, rules agree.
    assert_eq!(lead.final_intent, IntentLevel::High);
    assert_eq!(lead.total_score, 100);
    assert_eq!(service.stats().ai_failed, 1);
}

#[tokio::test]
async fn strict_mode_propagates_classifier_failure_from_score_lead() {
    let config = ScoringConfig {
        continue_on_ai_failure: false,
        ..fast_config()
    };
    let (_, service) = service(FailingTransport::default(), config);

    let error = service
        .score_lead(&prospect("Jamie", "CEO", "Technology"), &offer())
        .await
        .expect_err("strict mode surfaces exhaustion");

    assert!(matches!(error, ScoringError::Classifier(_)));
    assert_eq!(service.stats().ai_failed, 1);
}

#[tokio::test]
async fn disabled_ai_skips_the_remote_call_entirely() {
    let transport = FailingTransport::default();
    let config = ScoringConfig {
        use_ai: false,
        ..fast_config()
    };
    let (_, service) = service(transport, config);

    let lead = service
        .score_lead(&prospect("Jamie", "CEO", "Technology"), &offer())
        .await
        .expect("scores without AI");

    assert_eq!(lead.intent_analysis.confidence, FALLBACK_CONFIDENCE);
    let stats = service.stats();
    assert_eq!(stats.ai_succeeded, 0);
    assert_eq!(stats.ai_failed, 0);
}

#[tokio::test]
async fn analyze_intent_never_fails() {
    let (_, service) = service(FailingTransport::default(), fast_config());

    let analysis = service
        .analyze_intent(&prospect("Sam", "Analyst", "Agriculture"), &offer())
        .await;

    assert_eq!(analysis.level, IntentLevel::Low);
    assert_eq!(analysis.confidence, FALLBACK_CONFIDENCE);
}

#[tokio::test]
async fn retries_respect_the_configured_attempt_budget() {
    use crate::qualification::service::LeadScoringService;
    use std::sync::Arc;

    let config = ScoringConfig {
        max_retries: 3,
        ..fast_config()
    };
    let repository = Arc::new(MemoryRepository::default());
    let transport = Arc::new(FailingTransport::default());
    let service = LeadScoringService::new(repository, transport.clone(), config);

    let _ = service
        .score_lead(&prospect("Jamie", "CEO", "Technology"), &offer())
        .await
        .expect("fallback applies");

    // One logical classification, three transport attempts.
    assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
}
