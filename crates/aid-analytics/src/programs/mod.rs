//! Lifecycle, health and performance analytics for aid programs.
//!
//! Every engine here is a pure function of normalized records and an explicit
//! `now`; nothing is cached between calls.

pub mod domain;
pub mod efficiency;
pub mod facts;
pub mod health;
pub mod import;
pub mod metrics;
pub mod phase;
pub mod ranking;
pub mod report;
pub mod suggestions;

pub use domain::{
    effective_status, group_by_program, Beneficiary, BeneficiaryId, BeneficiaryStatus,
    EffectiveStatus, Program, ProgramId, StoredStatus,
};
pub use efficiency::{average_processing_days, EfficiencyScore};
pub use facts::ProgramFacts;
pub use health::{HealthInputs, HealthScoreBreakdown, PhaseWeights};
pub use import::{ImportError, RecordsSnapshot};
pub use metrics::{ProgramMetrics, StatusCounts};
pub use phase::{
    days_since_start, days_until_end, time_progress, Phase, PhaseClassification, PhaseMetrics,
    PhaseStatus, PhaseWindow, ProgramSchedule,
};
pub use ranking::{rank_programs, score_program, Badge, RankedProgram, RankingBaseline};
pub use report::views::{PhaseCountEntry, ProgramHealthEntry, StatusCountEntry};
pub use report::{PortfolioOverview, ProgramOverview};
pub use suggestions::{suggest_for_portfolio, suggest_for_program, Suggestion, SuggestionKind};

#[cfg(test)]
pub(crate) mod tests;
