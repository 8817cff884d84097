//! CLI paths that exercise the scoring pipeline without the HTTP server:
//! a one-shot qualification run over local files and a classifier probe.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use serde::Deserialize;

use crate::infra::InMemoryLeadRepository;
use leadqual::config::AppConfig;
use leadqual::error::AppError;
use leadqual::ingest;
use leadqual::qualification::{
    DisabledTransport, HttpCompletionTransport, IntentClassifier, LeadScoringService, OfferContext,
    ScoredLead, ScoringConfig,
};

#[derive(Args, Debug)]
pub(crate) struct QualifyArgs {
    /// Path to the offer context JSON file
    #[arg(long)]
    pub(crate) offer: PathBuf,
    /// Path to the lead CSV file
    #[arg(long)]
    pub(crate) leads: PathBuf,
}

#[derive(Debug, Deserialize)]
struct OfferFile {
    name: String,
    value_propositions: Vec<String>,
    ideal_use_cases: Vec<String>,
}

pub(crate) async fn run_qualify(args: QualifyArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    let raw = fs::read_to_string(&args.offer)?;
    let offer_file: OfferFile = serde_json::from_str(&raw)?;
    let offer = OfferContext::new(
        offer_file.name,
        offer_file.value_propositions,
        offer_file.ideal_use_cases,
    )?;

    let prospects =
        ingest::parse_prospects_from_path(&args.leads, config.classifier.max_upload_rows)?;

    // Offline runs always use the local heuristic; no remote calls.
    let scoring_config = ScoringConfig {
        use_ai: false,
        ..ScoringConfig::from(&config.classifier)
    };
    let service = LeadScoringService::new(
        Arc::new(InMemoryLeadRepository::default()),
        Arc::new(DisabledTransport),
        scoring_config,
    );

    let mut results = service.score_leads(&prospects, &offer).await;
    results.sort_by(|a, b| b.total_score.cmp(&a.total_score));

    print_results(&offer, &results);
    Ok(())
}

fn print_results(offer: &OfferContext, results: &[ScoredLead]) {
    println!("Scored {} lead(s) against \"{}\"\n", results.len(), offer.name);
    println!(
        "{:<4} {:<24} {:<20} {:<8} {:>5} {:>5} {:>5}",
        "#", "Name", "Company", "Intent", "Total", "Rule", "AI"
    );

    for (rank, lead) in results.iter().enumerate() {
        println!(
            "{:<4} {:<24} {:<20} {:<8} {:>5} {:>5} {:>5}",
            rank + 1,
            lead.prospect.name,
            lead.prospect.company,
            lead.final_intent.label(),
            lead.total_score,
            lead.rule_breakdown.total,
            lead.intent_analysis.score,
        );
        println!("     {}", lead.combined_reasoning);
    }
}

pub(crate) async fn run_check_classifier() -> Result<(), AppError> {
    let config = AppConfig::load()?;

    let transport = Arc::new(HttpCompletionTransport::from_config(&config.classifier));
    let classifier = IntentClassifier::new(
        transport,
        ScoringConfig::from(&config.classifier).retry_policy(),
    );

    let report = classifier.connectivity_check().await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.connected {
        std::process::exit(1);
    }
    Ok(())
}
