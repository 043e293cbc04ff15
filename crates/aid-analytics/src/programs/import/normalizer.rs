use super::parser::{parse_datetime, RawBeneficiary, RawProgram};
use crate::programs::domain::{
    Beneficiary, BeneficiaryId, BeneficiaryStatus, Program, ProgramId, StoredStatus,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::{trace, warn};

pub fn normalize_program(raw: RawProgram) -> Program {
    let id = ProgramId(identifier(&raw.id));
    let stored_status = match text(&raw.status) {
        Some(status) => StoredStatus::parse(&status).unwrap_or_else(|| {
            warn!(program = %id, status = %status, "unknown program status; treating as draft");
            StoredStatus::Draft
        }),
        None => StoredStatus::Draft,
    };

    Program {
        name: clean_text(&raw.name),
        assistance_type: clean_text(&raw.assistance_type),
        beneficiary_type: clean_text(&raw.beneficiary_type),
        start_date: date_field(&id.0, "startDate", &raw.start_date),
        end_date: date_field(&id.0, "endDate", &raw.end_date),
        payout_date: date_field(&id.0, "payoutDate", &raw.payout_date),
        max_beneficiaries: capacity(&raw.max_beneficiaries),
        amount: number(&raw.amount).unwrap_or(0.0),
        stored_status,
        created_at: date_field(&id.0, "createdAt", &raw.created_at),
        updated_at: date_field(&id.0, "updatedAt", &raw.updated_at),
        id,
    }
}

pub fn normalize_beneficiary(raw: RawBeneficiary) -> Beneficiary {
    let id = identifier(&raw.id);
    let status = text(&raw.status)
        .map(|status| BeneficiaryStatus::parse(&status))
        .unwrap_or(BeneficiaryStatus::Other);
    if status == BeneficiaryStatus::Other {
        trace!(beneficiary = %id, status = %raw.status, "unrecognized beneficiary status");
    }

    Beneficiary {
        program_id: ProgramId(identifier(&raw.program_id)),
        status,
        is_paid: flag(&raw.is_paid),
        amount: number(&raw.amount).unwrap_or(0.0),
        created_at: date_field(&id, "createdAt", &raw.created_at),
        updated_at: date_field(&id, "updatedAt", &raw.updated_at),
        id: BeneficiaryId(id),
    }
}

/// Ids arrive as strings or numbers; anything else becomes an empty id.
fn identifier(value: &Value) -> String {
    match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    }
}

/// Scalar rendered as text; arrays, objects and null carry no text.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn clean_text(value: &Value) -> String {
    text(value)
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

/// Finite number from a JSON number or a numeric string.
fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|number| number.is_finite())
}

fn capacity(value: &Value) -> Option<u32> {
    number(value)
        .filter(|max| *max > 0.0)
        .map(|max| max.round().min(u32::MAX as f64) as u32)
        .filter(|max| *max > 0)
}

fn flag(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
        Value::String(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "1"
        ),
        _ => false,
    }
}

/// Dates arrive as text or as epoch milliseconds; anything else is dropped with a warning.
fn date_field(record: &str, field: &str, value: &Value) -> Option<NaiveDateTime> {
    let parsed = match value {
        Value::Null => return None,
        Value::String(text) if text.trim().is_empty() => return None,
        Value::String(text) => parse_datetime(text),
        Value::Number(number) => number
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|timestamp| timestamp.naive_utc()),
        _ => None,
    };

    if parsed.is_none() {
        warn!(record, field, value = %value, "ignoring unparseable date");
    }
    parsed
}
