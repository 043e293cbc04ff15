use super::super::domain::EffectiveStatus;
use super::super::phase::Phase;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StatusCountEntry {
    pub status: EffectiveStatus,
    pub status_label: &'static str,
    pub programs: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseCountEntry {
    pub phase: Phase,
    pub phase_label: &'static str,
    pub programs: usize,
}

/// Compact per-program line for portfolio listings.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramHealthEntry {
    pub program_id: String,
    pub program_name: String,
    pub effective_status: EffectiveStatus,
    pub phase: Phase,
    pub health_score: u32,
    pub efficiency_score: u32,
    pub completion_percentage: u32,
    pub payment_rate: u32,
}
