use chrono::{NaiveDate, NaiveDateTime};

use crate::programs::domain::{
    Beneficiary, BeneficiaryId, BeneficiaryStatus, Program, ProgramId, StoredStatus,
};

pub(crate) fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(0, 0, 0)
        .expect("valid time")
}

pub(crate) fn program(id: &str, max_beneficiaries: u32) -> Program {
    Program {
        id: ProgramId::from(id),
        name: format!("Program {id}"),
        assistance_type: "Financial Assistance".to_string(),
        beneficiary_type: "Residents".to_string(),
        start_date: None,
        end_date: None,
        payout_date: None,
        max_beneficiaries: Some(max_beneficiaries),
        amount: 1000.0,
        stored_status: StoredStatus::Ongoing,
        created_at: None,
        updated_at: None,
    }
}

/// Program running January 2024 with a payout on February 15th unless overridden.
pub(crate) fn january_program(id: &str, max_beneficiaries: u32) -> Program {
    Program {
        start_date: Some(at(2024, 1, 1)),
        end_date: Some(at(2024, 1, 31)),
        payout_date: Some(at(2024, 2, 15)),
        ..program(id, max_beneficiaries)
    }
}

pub(crate) fn beneficiary(
    id: &str,
    program_id: &str,
    status: BeneficiaryStatus,
    is_paid: bool,
) -> Beneficiary {
    Beneficiary {
        id: BeneficiaryId(id.to_string()),
        program_id: ProgramId::from(program_id),
        status,
        is_paid,
        amount: 1000.0,
        created_at: None,
        updated_at: None,
    }
}

pub(crate) fn enroll(program_id: &str, count: usize, status: BeneficiaryStatus) -> Vec<Beneficiary> {
    (0..count)
        .map(|index| beneficiary(&format!("{program_id}-b{index}"), program_id, status, false))
        .collect()
}
