//! Bulk prospect ingestion from CSV and CSV export of scored results.
//!
//! Expected upload header:
//! `name,role,company,industry,location,professional_summary`

mod parser;

use std::io::Read;
use std::path::Path;

use crate::qualification::domain::{ProspectValidationError, ScoredLead};

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read prospect CSV: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid prospect CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        source: ProspectValidationError,
    },
    #[error("upload exceeds the {max} row limit")]
    TooManyRows { max: usize },
    #[error("upload contained no prospect rows")]
    Empty,
}

pub fn parse_prospects<R: Read>(
    reader: R,
    max_rows: usize,
) -> Result<Vec<crate::qualification::domain::ProspectRecord>, IngestError> {
    parser::parse_rows(reader, max_rows)
}

pub fn parse_prospects_from_path<P: AsRef<Path>>(
    path: P,
    max_rows: usize,
) -> Result<Vec<crate::qualification::domain::ProspectRecord>, IngestError> {
    let file = std::fs::File::open(path)?;
    parse_prospects(file, max_rows)
}

/// Renders scored results in the order given (callers rank beforehand).
pub fn render_results_csv(results: &[ScoredLead]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "name",
        "role",
        "company",
        "industry",
        "location",
        "intent",
        "total_score",
        "rule_score",
        "intent_score",
        "confidence",
        "reasoning",
    ])?;

    for lead in results {
        writer.write_record([
            lead.prospect.name.as_str(),
            lead.prospect.role.as_str(),
            lead.prospect.company.as_str(),
            lead.prospect.industry.as_str(),
            lead.prospect.location.as_str(),
            lead.final_intent.label(),
            &lead.total_score.to_string(),
            &lead.rule_breakdown.total.to_string(),
            &lead.intent_analysis.score.to_string(),
            &format!("{:.2}", lead.intent_analysis.confidence),
            lead.combined_reasoning.as_str(),
        ])?;
    }

    writer.flush()?;
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
