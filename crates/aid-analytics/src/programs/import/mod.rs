mod normalizer;
mod parser;

pub use normalizer::{normalize_beneficiary, normalize_program};
pub use parser::{RawBeneficiary, RawProgram};

use super::domain::{Beneficiary, Program, ProgramId};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Failures raised while loading records; the engines themselves never fail.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read records: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid records snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid beneficiary CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Normalized programs and beneficiaries as of one fetch from the records API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordsSnapshot {
    pub programs: Vec<Program>,
    pub beneficiaries: Vec<Beneficiary>,
}

impl RecordsSnapshot {
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, ImportError> {
        let file = File::open(path)?;
        Self::from_json_reader(file)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, ImportError> {
        let raw = parser::parse_snapshot(reader)?;
        let snapshot = Self {
            programs: raw.programs.into_iter().map(normalize_program).collect(),
            beneficiaries: raw
                .beneficiaries
                .into_iter()
                .map(normalize_beneficiary)
                .collect(),
        };

        debug!(
            programs = snapshot.programs.len(),
            beneficiaries = snapshot.beneficiaries.len(),
            "loaded records snapshot"
        );
        Ok(snapshot)
    }

    /// Appends beneficiaries from a CSV export (`id,programId,status,isPaid,amount,createdAt,updatedAt`).
    pub fn with_beneficiaries_csv<R: Read>(mut self, reader: R) -> Result<Self, ImportError> {
        let rows = parser::parse_beneficiary_csv(reader)?;
        debug!(rows = rows.len(), "loaded beneficiary CSV export");
        self.beneficiaries
            .extend(rows.into_iter().map(normalize_beneficiary));
        Ok(self)
    }

    pub fn with_beneficiaries_csv_path<P: AsRef<Path>>(self, path: P) -> Result<Self, ImportError> {
        let file = File::open(path)?;
        self.with_beneficiaries_csv(file)
    }

    pub fn program(&self, id: &str) -> Option<&Program> {
        self.programs.iter().find(|program| program.id.0 == id)
    }

    /// Beneficiaries enrolled in one program, in snapshot order.
    pub fn beneficiaries_for(&self, program_id: &ProgramId) -> Vec<Beneficiary> {
        self.beneficiaries
            .iter()
            .filter(|beneficiary| &beneficiary.program_id == program_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::programs::domain::BeneficiaryStatus;
    use crate::programs::phase::{Phase, PhaseClassification};
    use std::io::Cursor;

    const SNAPSHOT: &str = r#"{
        "programs": [
            {"id": "p-1", "name": "Rice Subsidy", "maxBeneficiaries": 10, "amount": 500, "status": "ongoing"},
            {"id": 2, "name": "Fuel Voucher", "maxBeneficiaries": "20", "amount": "750"}
        ],
        "beneficiaries": [
            {"id": "b-1", "programId": "p-1", "status": "approved", "isPaid": true, "amount": 500},
            {"id": "b-2", "programId": 2, "status": "pending", "isPaid": "false", "amount": "750"},
            {"id": "b-3", "programId": "p-1", "status": "processing", "isPaid": 0, "amount": 500}
        ]
    }"#;

    #[test]
    fn snapshot_normalizes_every_record() {
        let snapshot = RecordsSnapshot::from_json_reader(Cursor::new(SNAPSHOT)).expect("snapshot");

        assert_eq!(snapshot.programs.len(), 2);
        assert_eq!(snapshot.beneficiaries.len(), 3);
        assert_eq!(snapshot.program("2").map(|program| program.amount), Some(750.0));

        let enrolled = snapshot.beneficiaries_for(&ProgramId::from("p-1"));
        let ids: Vec<&str> = enrolled.iter().map(|beneficiary| beneficiary.id.0.as_str()).collect();
        assert_eq!(ids, vec!["b-1", "b-3"]);
    }

    #[test]
    fn csv_export_extends_the_snapshot() {
        let csv = "id,programId,status,isPaid,amount,createdAt,updatedAt\n\
b-9,2,disbursed,no,750,2024-01-03,2024-01-05\n";

        let snapshot = RecordsSnapshot::from_json_reader(Cursor::new(SNAPSHOT))
            .and_then(|snapshot| snapshot.with_beneficiaries_csv(Cursor::new(csv)))
            .expect("snapshot with csv");

        let enrolled = snapshot.beneficiaries_for(&ProgramId::from("2"));
        assert_eq!(enrolled.len(), 2);
        assert_eq!(enrolled[1].status, BeneficiaryStatus::Disbursed);
        assert!(enrolled[1].is_paid_out());
    }

    #[test]
    fn numeric_dates_and_names_still_load() {
        let json = r#"{"programs": [
            {"id": "p-1", "name": 123, "startDate": 1704067200000, "endDate": "2024-01-31"},
            {"id": "p-2", "name": "Fuel Voucher", "startDate": false, "endDate": "2024-01-31"}
        ]}"#;

        let snapshot = RecordsSnapshot::from_json_reader(Cursor::new(json)).expect("snapshot");

        let numeric = snapshot.program("p-1").expect("numeric program");
        assert_eq!(numeric.name, "123");
        assert!(numeric.start_date.is_some());
        let undated = snapshot.program("p-2").expect("undated program");
        assert_eq!(undated.start_date, None);
        let now = numeric.start_date.expect("start date");
        assert_eq!(PhaseClassification::for_program(undated, now).phase, Phase::Planning);
    }

    #[test]
    fn malformed_json_is_reported() {
        let error = RecordsSnapshot::from_json_reader(Cursor::new("{\"programs\": [")).expect_err("json error");

        match error {
            ImportError::Json(_) => {}
            other => panic!("expected json error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_propagates_io_errors() {
        let error = RecordsSnapshot::from_json_path("./does-not-exist.json").expect_err("io error");

        match error {
            ImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
