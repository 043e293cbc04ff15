use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::io::Read;

/// Program record exactly as the records API returns it.
///
/// Every field stays an untyped JSON value so one badly typed field never
/// rejects the snapshot; the normalizer decides what each value means.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProgram {
    pub id: Value,
    pub name: Value,
    pub assistance_type: Value,
    pub beneficiary_type: Value,
    pub start_date: Value,
    pub end_date: Value,
    pub payout_date: Value,
    pub max_beneficiaries: Value,
    pub amount: Value,
    pub status: Value,
    pub created_at: Value,
    pub updated_at: Value,
}

/// Beneficiary record exactly as the records API returns it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawBeneficiary {
    pub id: Value,
    pub program_id: Value,
    pub status: Value,
    pub is_paid: Value,
    pub amount: Value,
    pub created_at: Value,
    pub updated_at: Value,
}

/// JSON snapshot layout: `{ "programs": [...], "beneficiaries": [...] }`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawSnapshot {
    pub(crate) programs: Vec<RawProgram>,
    pub(crate) beneficiaries: Vec<RawBeneficiary>,
}

pub(crate) fn parse_snapshot<R: Read>(reader: R) -> Result<RawSnapshot, serde_json::Error> {
    serde_json::from_reader(reader)
}

/// Parses a beneficiary CSV export into raw records.
///
/// Every cell is kept as text; coercion happens in the normalizer like it does
/// for JSON input.
pub(crate) fn parse_beneficiary_csv<R: Read>(reader: R) -> Result<Vec<RawBeneficiary>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<BeneficiaryRow>() {
        records.push(record?.into_raw());
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct BeneficiaryRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(rename = "programId", default, deserialize_with = "empty_string_as_none")]
    program_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(rename = "isPaid", default, deserialize_with = "empty_string_as_none")]
    is_paid: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    amount: Option<String>,
    #[serde(rename = "createdAt", default, deserialize_with = "empty_string_as_none")]
    created_at: Option<String>,
    #[serde(rename = "updatedAt", default, deserialize_with = "empty_string_as_none")]
    updated_at: Option<String>,
}

impl BeneficiaryRow {
    fn into_raw(self) -> RawBeneficiary {
        RawBeneficiary {
            id: text_value(self.id),
            program_id: text_value(self.program_id),
            status: text_value(self.status),
            is_paid: text_value(self.is_paid),
            amount: text_value(self.amount),
            created_at: text_value(self.created_at),
            updated_at: text_value(self.updated_at),
        }
    }
}

fn text_value(cell: Option<String>) -> Value {
    cell.map(Value::String).unwrap_or(Value::Null)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts RFC 3339 timestamps, naive `T`-separated timestamps and bare dates (midnight).
pub(crate) fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .expect("valid date")
            .and_hms_opt(hour, minute, 0)
            .expect("valid time")
    }

    #[test]
    fn parse_datetime_supports_common_layouts() {
        assert_eq!(
            parse_datetime("2024-01-15T08:30:00Z"),
            Some(at(2024, 1, 15, 8, 30))
        );
        assert_eq!(
            parse_datetime("2024-01-15T10:30:00+02:00"),
            Some(at(2024, 1, 15, 8, 30))
        );
        assert_eq!(
            parse_datetime("2024-01-15T08:30:00.250"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
                .and_then(|date| date.and_hms_milli_opt(8, 30, 0, 250))
        );
        assert_eq!(parse_datetime("2024-01-15"), Some(at(2024, 1, 15, 0, 0)));
        assert!(parse_datetime("  ").is_none());
        assert!(parse_datetime("next tuesday").is_none());
    }

    #[test]
    fn snapshot_tolerates_missing_sections_and_fields() {
        let snapshot = parse_snapshot(Cursor::new(r#"{"programs": [{"id": 7}]}"#))
            .expect("parse snapshot");

        assert_eq!(snapshot.programs.len(), 1);
        assert_eq!(snapshot.programs[0].id, Value::from(7));
        assert!(snapshot.programs[0].name.is_null());
        assert!(snapshot.programs[0].amount.is_null());
        assert!(snapshot.beneficiaries.is_empty());
    }

    #[test]
    fn badly_typed_fields_do_not_reject_the_snapshot() {
        let snapshot = parse_snapshot(Cursor::new(
            r#"{"programs": [{"id": "p-1", "name": 123, "startDate": 1704067200000, "status": true}],
                "beneficiaries": [{"id": "b-1", "createdAt": false, "status": 2}]}"#,
        ))
        .expect("parse snapshot");

        assert_eq!(snapshot.programs[0].name, Value::from(123));
        assert_eq!(snapshot.programs[0].start_date, Value::from(1704067200000_i64));
        assert_eq!(snapshot.beneficiaries[0].created_at, Value::Bool(false));
    }

    #[test]
    fn csv_rows_become_text_values() {
        let csv = "id,programId,status,isPaid,amount,createdAt,updatedAt\n\
b-1, p-1 ,approved,yes,1500,2024-01-02,\n";

        let rows = parse_beneficiary_csv(Cursor::new(csv)).expect("parse csv");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].program_id, Value::from("p-1"));
        assert_eq!(rows[0].is_paid, Value::from("yes"));
        assert_eq!(rows[0].amount, Value::from("1500"));
        assert_eq!(rows[0].created_at, Value::from("2024-01-02"));
        assert!(rows[0].updated_at.is_null());
    }

    #[test]
    fn csv_with_ragged_rows_is_rejected() {
        let csv = "id,programId,status\nb-1,p-1\n";

        assert!(parse_beneficiary_csv(Cursor::new(csv)).is_err());
    }
}
