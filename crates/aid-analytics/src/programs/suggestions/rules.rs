use super::super::facts::ProgramFacts;
use super::super::phase::Phase;
use super::{Suggestion, SuggestionKind};

pub(crate) struct SuggestionRule {
    pub key: &'static str,
    pub applies: fn(&ProgramFacts) -> bool,
    pub build: fn(&ProgramFacts) -> Suggestion,
}

/// Per-program rules in priority order.
pub(crate) const PROGRAM_RULES: &[SuggestionRule] = &[
    SuggestionRule {
        key: "gathering_closing",
        applies: gathering_closing,
        build: |facts| {
            urgent(
                facts,
                "Enrollment window closing",
                format!(
                    "Only {}% of slots are filled with {} day(s) left to gather beneficiaries.",
                    facts.completion(),
                    facts.classification.metrics.gathering.days_left
                ),
                "Extend the deadline or intensify outreach",
            )
        },
    },
    SuggestionRule {
        key: "payout_unscheduled",
        applies: payout_unscheduled,
        build: |facts| {
            info(
                facts,
                "Set a payout date",
                "Enrollment has closed but no payout date is scheduled.".to_string(),
                "Schedule the payout",
            )
        },
    },
    SuggestionRule {
        key: "payout_lagging",
        applies: payout_lagging,
        build: |facts| {
            urgent(
                facts,
                "Payout behind schedule",
                format!(
                    "Payout has started but only {}% of beneficiaries have been paid.",
                    facts.metrics.payment_rate
                ),
                "Release pending disbursements",
            )
        },
    },
    SuggestionRule {
        key: "critical_health",
        applies: critical_health,
        build: |facts| {
            urgent(
                facts,
                "Critical program health",
                format!(
                    "Health score is {} out of 100; the program needs immediate attention.",
                    facts.health_score()
                ),
                "Review the health breakdown",
            )
        },
    },
    SuggestionRule {
        key: "weak_health",
        applies: weak_health,
        build: |facts| {
            warning(
                facts,
                "Program health needs attention",
                format!(
                    "Health score is {} out of 100; some indicators are below target.",
                    facts.health_score()
                ),
                "Review the health breakdown",
            )
        },
    },
    SuggestionRule {
        key: "slow_enrollment",
        applies: slow_enrollment,
        build: |facts| {
            warning(
                facts,
                "Enrollment is lagging",
                format!(
                    "Only {}% enrolled while {}% of the schedule has elapsed.",
                    facts.completion(),
                    facts.time_progress
                ),
                "Boost outreach to eligible residents",
            )
        },
    },
    SuggestionRule {
        key: "near_capacity",
        applies: near_capacity,
        build: |facts| {
            success(
                facts,
                "Enrollment nearly full",
                format!(
                    "{}% of beneficiary slots are filled.",
                    facts.completion()
                ),
                "Prepare a waitlist",
            )
        },
    },
    SuggestionRule {
        key: "payments_behind",
        applies: payments_behind,
        build: |facts| {
            warning(
                facts,
                "Payments outstanding",
                format!(
                    "{}% paid with {} beneficiar{} still awaiting payment.",
                    facts.metrics.payment_rate,
                    facts.metrics.pending_count,
                    if facts.metrics.pending_count == 1 { "y" } else { "ies" }
                ),
                "Process pending payments",
            )
        },
    },
    SuggestionRule {
        key: "deadline_approaching",
        applies: deadline_approaching,
        build: |facts| {
            urgent(
                facts,
                "Deadline approaching",
                format!(
                    "{} day(s) until enrollment closes and only {}% of slots are filled.",
                    facts.days_until_end.unwrap_or(0),
                    facts.completion()
                ),
                "Prioritize remaining enrollments",
            )
        },
    },
    SuggestionRule {
        key: "low_efficiency",
        applies: low_efficiency,
        build: |facts| {
            info(
                facts,
                "Processing efficiency is low",
                format!(
                    "Efficiency score is {} with approvals averaging {:.1} day(s).",
                    facts.efficiency.score, facts.efficiency.avg_processing_days
                ),
                "Streamline application review",
            )
        },
    },
    SuggestionRule {
        key: "pending_backlog",
        applies: pending_backlog,
        build: |facts| {
            let counts = facts.metrics.status_counts;
            info(
                facts,
                "Pending applications outnumber approvals",
                format!(
                    "{} pending versus {} approved applications.",
                    counts.pending, counts.approved
                ),
                "Review pending applications",
            )
        },
    },
    SuggestionRule {
        key: "processing_backlog",
        applies: processing_backlog,
        build: |facts| {
            let counts = facts.metrics.status_counts;
            info(
                facts,
                "Applications stuck in processing",
                format!(
                    "{} applications are processing against {} approved.",
                    counts.processing, counts.approved
                ),
                "Finish processing reviews",
            )
        },
    },
    SuggestionRule {
        key: "high_rejection",
        applies: high_rejection,
        build: |facts| {
            warning(
                facts,
                "High rejection rate",
                format!(
                    "{:.0}% of decided applications were rejected.",
                    rejection_rate(facts).unwrap_or(0.0)
                ),
                "Revisit eligibility requirements",
            )
        },
    },
    SuggestionRule {
        key: "budget_nearly_spent",
        applies: budget_nearly_spent,
        build: |facts| {
            warning(
                facts,
                "Budget almost fully allocated",
                format!(
                    "{}% of the program allocation is committed.",
                    facts.budget_utilization
                ),
                "Review remaining budget",
            )
        },
    },
    SuggestionRule {
        key: "unpaid_amounts",
        applies: unpaid_amounts,
        build: |facts| {
            info(
                facts,
                "Amounts awaiting release",
                format!(
                    "{:.2} is committed to beneficiaries who have not been paid.",
                    facts.metrics.pending_amount
                ),
                "Reconcile pending disbursements",
            )
        },
    },
    SuggestionRule {
        key: "stalled_enrollment",
        applies: stalled_enrollment,
        build: |facts| {
            info(
                facts,
                "No recent enrollments",
                "No beneficiaries were added in the last 7 days.".to_string(),
                "Check intake channels",
            )
        },
    },
];

pub(crate) fn gathering_closing(facts: &ProgramFacts) -> bool {
    facts.phase() == Phase::Gathering
        && facts.classification.metrics.gathering.days_left <= 7
        && facts.completion() < 50
}

pub(crate) fn payout_unscheduled(facts: &ProgramFacts) -> bool {
    facts.phase() == Phase::Processing && !facts.has_payout_date
}

pub(crate) fn payout_lagging(facts: &ProgramFacts) -> bool {
    facts.phase() == Phase::Payout && facts.metrics.payment_rate < 50
}

pub(crate) fn critical_health(facts: &ProgramFacts) -> bool {
    facts.health_score() < 30
}

pub(crate) fn weak_health(facts: &ProgramFacts) -> bool {
    (30..60).contains(&facts.health_score())
}

pub(crate) fn slow_enrollment(facts: &ProgramFacts) -> bool {
    facts.completion() < 30 && facts.time_progress > 50
}

pub(crate) fn near_capacity(facts: &ProgramFacts) -> bool {
    facts.completion() > 90
}

pub(crate) fn payments_behind(facts: &ProgramFacts) -> bool {
    facts.metrics.payment_rate < 50 && facts.metrics.pending_count > 0
}

pub(crate) fn deadline_approaching(facts: &ProgramFacts) -> bool {
    facts
        .days_until_end
        .is_some_and(|days| days < 30 && facts.completion() < 80)
}

pub(crate) fn low_efficiency(facts: &ProgramFacts) -> bool {
    facts.efficiency.score < 50
}

pub(crate) fn pending_backlog(facts: &ProgramFacts) -> bool {
    let counts = facts.metrics.status_counts;
    counts.pending > counts.approved
}

pub(crate) fn processing_backlog(facts: &ProgramFacts) -> bool {
    let counts = facts.metrics.status_counts;
    counts.processing as f64 > 0.5 * counts.approved as f64
}

pub(crate) fn high_rejection(facts: &ProgramFacts) -> bool {
    rejection_rate(facts).is_some_and(|rate| rate > 30.0)
}

pub(crate) fn budget_nearly_spent(facts: &ProgramFacts) -> bool {
    facts.budget_utilization > 90
}

pub(crate) fn unpaid_amounts(facts: &ProgramFacts) -> bool {
    facts.metrics.pending_amount > 0.0
}

pub(crate) fn stalled_enrollment(facts: &ProgramFacts) -> bool {
    facts.recent_enrollments == 0 && facts.days_since_start > 7
}

/// Rejected share of decided applications; `None` before any decision.
pub(crate) fn rejection_rate(facts: &ProgramFacts) -> Option<f64> {
    let counts = facts.metrics.status_counts;
    let decided = counts.approved + counts.rejected;
    (decided > 0).then(|| counts.rejected as f64 / decided as f64 * 100.0)
}

fn urgent(facts: &ProgramFacts, title: &str, message: String, action: &str) -> Suggestion {
    single(SuggestionKind::Urgent, facts, title, message, action)
}

fn warning(facts: &ProgramFacts, title: &str, message: String, action: &str) -> Suggestion {
    single(SuggestionKind::Warning, facts, title, message, action)
}

fn info(facts: &ProgramFacts, title: &str, message: String, action: &str) -> Suggestion {
    single(SuggestionKind::Info, facts, title, message, action)
}

fn success(facts: &ProgramFacts, title: &str, message: String, action: &str) -> Suggestion {
    single(SuggestionKind::Success, facts, title, message, action)
}

fn single(
    kind: SuggestionKind,
    facts: &ProgramFacts,
    title: &str,
    message: String,
    action: &str,
) -> Suggestion {
    Suggestion::new(kind, title, message, action, vec![facts.program_name.clone()])
}
