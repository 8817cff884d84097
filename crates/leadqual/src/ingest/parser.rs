use std::io::Read;

use serde::Deserialize;

use crate::qualification::domain::{ProspectRecord, ProspectValidationError};

use super::IngestError;

#[derive(Debug, Deserialize)]
struct ProspectRow {
    name: String,
    role: String,
    company: String,
    industry: String,
    location: String,
    professional_summary: String,
}

impl ProspectRow {
    fn into_record(self) -> Result<ProspectRecord, ProspectValidationError> {
        ProspectRecord::new(
            self.name,
            self.role,
            self.company,
            self.industry,
            self.location,
            self.professional_summary,
        )
    }
}

/// Parses and validates prospect rows. The upload is transactional: the
/// first invalid row fails the whole batch with its 1-based data row number.
pub(crate) fn parse_rows<R: Read>(
    reader: R,
    max_rows: usize,
) -> Result<Vec<ProspectRecord>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<ProspectRow>().enumerate() {
        let row_number = index + 1;
        if records.len() >= max_rows {
            return Err(IngestError::TooManyRows { max: max_rows });
        }

        let row = row?;
        let record = row
            .into_record()
            .map_err(|source| IngestError::InvalidRow {
                row: row_number,
                source,
            })?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(IngestError::Empty);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "name,role,company,industry,location,professional_summary\n";

    #[test]
    fn parses_and_trims_valid_rows() {
        let csv = format!(
            "{HEADER} Jamie Rivera , CEO ,Acme Corp,Technology,\"Denver, CO\",Runs outbound.\n"
        );
        let records = parse_rows(Cursor::new(csv), 10).expect("rows parse");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Jamie Rivera");
        assert_eq!(records[0].location, "Denver, CO");
    }

    #[test]
    fn reports_invalid_row_with_number() {
        let csv = format!(
            "{HEADER}Jamie,CEO,Acme,Technology,Denver,Fine.\nBlank,,Acme,Technology,Denver,Missing role.\n"
        );
        let error = parse_rows(Cursor::new(csv), 10).expect_err("second row invalid");
        match error {
            IngestError::InvalidRow { row: 2, .. } => {}
            other => panic!("expected invalid row 2, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_uploads_and_row_overflow() {
        let error = parse_rows(Cursor::new(HEADER.to_string()), 10).expect_err("no data rows");
        assert!(matches!(error, IngestError::Empty));

        let csv = format!(
            "{HEADER}A,CEO,Acme,Tech,Denver,x.\nB,CEO,Acme,Tech,Denver,x.\nC,CEO,Acme,Tech,Denver,x.\n"
        );
        let error = parse_rows(Cursor::new(csv), 2).expect_err("over the cap");
        assert!(matches!(error, IngestError::TooManyRows { max: 2 }));
    }

    #[test]
    fn propagates_malformed_csv() {
        let csv = format!("{HEADER}Jamie,CEO,Acme\n");
        let error = parse_rows(Cursor::new(csv), 10).expect_err("short row rejected");
        assert!(matches!(error, IngestError::Csv(_)));
    }
}
