use super::super::domain::{Beneficiary, EffectiveStatus, Program};
use super::super::efficiency::EfficiencyScore;
use super::super::facts::ProgramFacts;
use super::super::health::HealthScoreBreakdown;
use super::super::metrics::ProgramMetrics;
use super::super::phase::{Phase, PhaseMetrics};
use super::super::suggestions::{suggest_for_program, Suggestion};
use super::views::ProgramHealthEntry;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Everything the program dashboard shows for one program.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramOverview {
    pub program_id: String,
    pub program_name: String,
    pub effective_status: EffectiveStatus,
    pub effective_status_label: &'static str,
    pub phase: Phase,
    pub phase_label: &'static str,
    pub phase_metrics: PhaseMetrics,
    pub metrics: ProgramMetrics,
    pub time_progress: u32,
    pub health: HealthScoreBreakdown,
    pub efficiency: EfficiencyScore,
    pub budget_utilization: u32,
    pub days_since_start: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_end: Option<i64>,
    pub suggestions: Vec<Suggestion>,
}

impl ProgramOverview {
    pub fn build(program: &Program, beneficiaries: &[Beneficiary], now: NaiveDateTime) -> Self {
        Self::from_facts(ProgramFacts::collect(program, beneficiaries, now))
    }

    pub fn from_facts(facts: ProgramFacts) -> Self {
        let suggestions = suggest_for_program(&facts);
        let phase = facts.phase();

        Self {
            program_id: facts.program_id.0,
            program_name: facts.program_name,
            effective_status: facts.effective_status,
            effective_status_label: facts.effective_status.label(),
            phase,
            phase_label: phase.label(),
            phase_metrics: facts.classification.metrics,
            metrics: facts.metrics,
            time_progress: facts.time_progress,
            health: facts.health,
            efficiency: facts.efficiency,
            budget_utilization: facts.budget_utilization,
            days_since_start: facts.days_since_start,
            days_until_end: facts.days_until_end,
            suggestions,
        }
    }

    pub fn health_score(&self) -> u32 {
        self.health.final_score()
    }
}

impl From<&ProgramFacts> for ProgramHealthEntry {
    fn from(facts: &ProgramFacts) -> Self {
        Self {
            program_id: facts.program_id.0.clone(),
            program_name: facts.program_name.clone(),
            effective_status: facts.effective_status,
            phase: facts.phase(),
            health_score: facts.health_score(),
            efficiency_score: facts.efficiency.score,
            completion_percentage: facts.completion(),
            payment_rate: facts.metrics.payment_rate,
        }
    }
}
