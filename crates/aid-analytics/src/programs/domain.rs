use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier wrapper for aid programs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgramId(pub String);

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProgramId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier wrapper for enrolled beneficiaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BeneficiaryId(pub String);

/// Status persisted on the program record by the office staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoredStatus {
    #[default]
    Draft,
    Ongoing,
    Complete,
}

impl StoredStatus {
    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "ongoing" => Some(Self::Ongoing),
            "complete" | "completed" => Some(Self::Complete),
            _ => None,
        }
    }
}

/// Display status of a program after the paid-out override is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectiveStatus {
    Ongoing,
    Complete,
    Draft,
}

impl EffectiveStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Ongoing, Self::Complete, Self::Draft]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ongoing => "Ongoing",
            Self::Complete => "Complete",
            Self::Draft => "Draft",
        }
    }
}

/// Application status of a single beneficiary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeneficiaryStatus {
    Pending,
    Processing,
    Approved,
    Rejected,
    Disbursed,
    Completed,
    #[serde(other)]
    Other,
}

impl BeneficiaryStatus {
    pub(crate) fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "processing" => Self::Processing,
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            "disbursed" => Self::Disbursed,
            "completed" => Self::Completed,
            _ => Self::Other,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Disbursed => "Disbursed",
            Self::Completed => "Completed",
            Self::Other => "Other",
        }
    }

    /// Statuses that mean the aid already reached the beneficiary.
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Disbursed | Self::Completed)
    }
}

/// Normalized aid program record. Built once at the input boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
    pub assistance_type: String,
    pub beneficiary_type: String,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub payout_date: Option<NaiveDateTime>,
    pub max_beneficiaries: Option<u32>,
    pub amount: f64,
    pub stored_status: StoredStatus,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Program {
    /// Enrollment capacity, treating a zero capacity the same as a missing one.
    pub fn capacity(&self) -> Option<u32> {
        self.max_beneficiaries.filter(|max| *max > 0)
    }

    /// Case-insensitive substring match against the assistance and beneficiary types.
    pub fn matches_category(&self, category: &str) -> bool {
        let needle = category.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        self.assistance_type.to_lowercase().contains(&needle)
            || self.beneficiary_type.to_lowercase().contains(&needle)
    }
}

/// Normalized beneficiary record enrolled in a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub id: BeneficiaryId,
    pub program_id: ProgramId,
    pub status: BeneficiaryStatus,
    pub is_paid: bool,
    pub amount: f64,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Beneficiary {
    pub fn is_paid_out(&self) -> bool {
        self.is_paid || self.status.is_settled()
    }

    pub fn is_awaiting_payment(&self) -> bool {
        !self.is_paid_out() && self.status != BeneficiaryStatus::Rejected
    }
}

/// Effective status of a program: complete once every enrolled beneficiary is paid out.
pub fn effective_status(program: &Program, beneficiaries: &[Beneficiary]) -> EffectiveStatus {
    if !beneficiaries.is_empty() && beneficiaries.iter().all(Beneficiary::is_paid_out) {
        return EffectiveStatus::Complete;
    }

    match program.stored_status {
        StoredStatus::Draft => EffectiveStatus::Draft,
        StoredStatus::Ongoing | StoredStatus::Complete => EffectiveStatus::Ongoing,
    }
}

/// Splits a flat beneficiary list into per-program lists, preserving input order.
pub fn group_by_program(beneficiaries: &[Beneficiary]) -> HashMap<ProgramId, Vec<Beneficiary>> {
    let mut grouped: HashMap<ProgramId, Vec<Beneficiary>> = HashMap::new();
    for beneficiary in beneficiaries {
        grouped
            .entry(beneficiary.program_id.clone())
            .or_default()
            .push(beneficiary.clone());
    }
    grouped
}

/// Whole days between two timestamps, rounded to the nearest day.
pub(crate) fn days_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    ((to - from).num_seconds() as f64 / 86_400.0).round() as i64
}

/// Rounds a percentage the way dashboards display it, never producing NaN.
pub(crate) fn round_percent(numerator: f64, denominator: f64) -> u32 {
    if denominator <= 0.0 || !numerator.is_finite() || !denominator.is_finite() {
        return 0;
    }

    (numerator / denominator * 100.0).round().max(0.0) as u32
}
