use super::super::domain::{group_by_program, Beneficiary, EffectiveStatus, Program};
use super::super::facts::ProgramFacts;
use super::super::phase::Phase;
use super::super::suggestions::{suggest_for_portfolio, Suggestion};
use super::views::{PhaseCountEntry, ProgramHealthEntry, StatusCountEntry};
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

/// Portfolio dashboard: totals across programs plus portfolio-level suggestions.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioOverview {
    pub total_programs: usize,
    pub status_counts: Vec<StatusCountEntry>,
    pub phase_counts: Vec<PhaseCountEntry>,
    pub total_beneficiaries: usize,
    pub paid_beneficiaries: usize,
    pub pending_beneficiaries: usize,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub pending_amount: f64,
    pub average_health_score: u32,
    pub programs: Vec<ProgramHealthEntry>,
    pub suggestions: Vec<Suggestion>,
}

impl PortfolioOverview {
    pub fn build(
        programs: &[Program],
        beneficiaries: &[Beneficiary],
        category: Option<&str>,
        now: NaiveDateTime,
    ) -> Self {
        let grouped = group_by_program(beneficiaries);
        let empty = Vec::new();

        let facts: Vec<ProgramFacts> = programs
            .iter()
            .filter(|program| category.map_or(true, |category| program.matches_category(category)))
            .map(|program| {
                let enrolled = grouped.get(&program.id).unwrap_or(&empty);
                ProgramFacts::collect(program, enrolled, now)
            })
            .collect();

        Self::from_facts(&facts)
    }

    pub fn from_facts(facts: &[ProgramFacts]) -> Self {
        let status_counts = EffectiveStatus::ordered()
            .into_iter()
            .map(|status| StatusCountEntry {
                status,
                status_label: status.label(),
                programs: facts
                    .iter()
                    .filter(|facts| facts.effective_status == status)
                    .count(),
            })
            .collect();

        let phase_counts = Phase::ordered()
            .into_iter()
            .map(|phase| PhaseCountEntry {
                phase,
                phase_label: phase.label(),
                programs: facts.iter().filter(|facts| facts.phase() == phase).count(),
            })
            .collect();

        let total_health: u32 = facts.iter().map(ProgramFacts::health_score).sum();
        let average_health_score = if facts.is_empty() {
            0
        } else {
            (total_health as f64 / facts.len() as f64).round() as u32
        };

        let suggestions = suggest_for_portfolio(facts);
        debug!(
            programs = facts.len(),
            suggestions = suggestions.len(),
            "portfolio overview built"
        );

        Self {
            total_programs: facts.len(),
            status_counts,
            phase_counts,
            total_beneficiaries: facts.iter().map(|facts| facts.metrics.total).sum(),
            paid_beneficiaries: facts.iter().map(|facts| facts.metrics.paid_count).sum(),
            pending_beneficiaries: facts.iter().map(|facts| facts.metrics.pending_count).sum(),
            total_amount: facts.iter().map(|facts| facts.metrics.total_amount).sum(),
            paid_amount: facts.iter().map(|facts| facts.metrics.paid_amount).sum(),
            pending_amount: facts.iter().map(|facts| facts.metrics.pending_amount).sum(),
            average_health_score,
            programs: facts.iter().map(ProgramHealthEntry::from).collect(),
            suggestions,
        }
    }

    pub fn programs_in(&self, status: EffectiveStatus) -> usize {
        self.status_counts
            .iter()
            .find(|entry| entry.status == status)
            .map(|entry| entry.programs)
            .unwrap_or(0)
    }
}
