use super::domain::{effective_status, Beneficiary, EffectiveStatus, Program, ProgramId};
use super::efficiency::EfficiencyScore;
use super::health::{HealthInputs, HealthScoreBreakdown};
use super::metrics::ProgramMetrics;
use super::phase::{days_since_start, days_until_end, time_progress, Phase, PhaseClassification};
use chrono::{Duration, NaiveDateTime};

const ACTIVITY_WINDOW_DAYS: i64 = 7;

/// Every derived value for one program, computed from scratch for a given `now`.
///
/// Suggestion rules and dashboard views read from this record instead of
/// recomputing metrics on their own.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramFacts {
    pub program_id: ProgramId,
    pub program_name: String,
    pub has_payout_date: bool,
    pub effective_status: EffectiveStatus,
    pub metrics: ProgramMetrics,
    pub classification: PhaseClassification,
    pub time_progress: u32,
    pub health: HealthScoreBreakdown,
    pub efficiency: EfficiencyScore,
    pub budget_utilization: u32,
    pub days_since_start: i64,
    pub days_until_end: Option<i64>,
    pub recent_enrollments: usize,
}

impl ProgramFacts {
    pub fn collect(program: &Program, beneficiaries: &[Beneficiary], now: NaiveDateTime) -> Self {
        let metrics = ProgramMetrics::aggregate(program, beneficiaries);
        let classification = PhaseClassification::for_program(program, now);
        let time_progress = time_progress(program, now);

        let health = HealthScoreBreakdown::compute(&HealthInputs {
            completion_percentage: metrics.completion_percentage,
            time_progress,
            payment_rate: metrics.payment_rate,
            status_counts: metrics.status_counts,
            phase: classification.phase,
            gathering_progress: classification.metrics.gathering.progress,
        });
        let efficiency =
            EfficiencyScore::compute(beneficiaries, time_progress, metrics.completion_percentage);

        let activity_cutoff = now - Duration::days(ACTIVITY_WINDOW_DAYS);
        let recent_enrollments = beneficiaries
            .iter()
            .filter(|beneficiary| {
                beneficiary
                    .created_at
                    .is_some_and(|created| created >= activity_cutoff)
            })
            .count();

        Self {
            program_id: program.id.clone(),
            program_name: program.name.clone(),
            has_payout_date: program.payout_date.is_some(),
            effective_status: effective_status(program, beneficiaries),
            budget_utilization: metrics.budget_utilization(program),
            metrics,
            classification,
            time_progress,
            health,
            efficiency,
            days_since_start: days_since_start(program, now),
            days_until_end: days_until_end(program, now),
            recent_enrollments,
        }
    }

    pub fn phase(&self) -> Phase {
        self.classification.phase
    }

    pub fn health_score(&self) -> u32 {
        self.health.final_score()
    }

    pub fn completion(&self) -> u32 {
        self.metrics.completion_percentage
    }
}
