use super::super::facts::ProgramFacts;
use super::rules;
use super::{Suggestion, SuggestionKind};
use tracing::debug;

struct PortfolioRule {
    key: &'static str,
    matches: fn(&ProgramFacts) -> bool,
    build: fn(&[&ProgramFacts]) -> Suggestion,
}

/// Portfolio-level rules: the program rule classes, aggregated across programs.
const PORTFOLIO_RULES: &[PortfolioRule] = &[
    PortfolioRule {
        key: "gathering_closing",
        matches: rules::gathering_closing,
        build: |matched| {
            grouped(
                SuggestionKind::Urgent,
                matched,
                "Enrollment windows closing",
                "close within a week with fewer than half of their slots filled.",
                "Extend deadlines or intensify outreach",
            )
        },
    },
    PortfolioRule {
        key: "payout_unscheduled",
        matches: rules::payout_unscheduled,
        build: |matched| {
            grouped(
                SuggestionKind::Info,
                matched,
                "Payout dates missing",
                "finished enrollment without a scheduled payout date.",
                "Schedule payouts",
            )
        },
    },
    PortfolioRule {
        key: "payout_lagging",
        matches: rules::payout_lagging,
        build: |matched| {
            grouped(
                SuggestionKind::Urgent,
                matched,
                "Payouts behind schedule",
                "are in payout with less than half of their beneficiaries paid.",
                "Release pending disbursements",
            )
        },
    },
    PortfolioRule {
        key: "critical_health",
        matches: rules::critical_health,
        build: |matched| {
            grouped(
                SuggestionKind::Urgent,
                matched,
                "Critical program health",
                "have a health score below 30.",
                "Review the affected programs",
            )
        },
    },
    PortfolioRule {
        key: "low_health",
        matches: low_health,
        build: |matched| {
            grouped(
                SuggestionKind::Warning,
                matched,
                "Programs need attention",
                "have a health score below 50.",
                "Review health breakdowns",
            )
        },
    },
    PortfolioRule {
        key: "slow_enrollment",
        matches: rules::slow_enrollment,
        build: |matched| {
            grouped(
                SuggestionKind::Warning,
                matched,
                "Enrollment lagging",
                "are under 30% enrolled past the midpoint of their schedule.",
                "Boost outreach",
            )
        },
    },
    PortfolioRule {
        key: "near_capacity",
        matches: rules::near_capacity,
        build: |matched| {
            grouped(
                SuggestionKind::Success,
                matched,
                "Programs nearly full",
                "have filled more than 90% of their slots.",
                "Prepare waitlists",
            )
        },
    },
    PortfolioRule {
        key: "payments_behind",
        matches: rules::payments_behind,
        build: |matched| {
            let waiting: usize = matched.iter().map(|facts| facts.metrics.pending_count).sum();
            let mut suggestion = grouped(
                SuggestionKind::Warning,
                matched,
                "Payments outstanding",
                "have paid less than half of their beneficiaries.",
                "Process pending payments",
            );
            suggestion
                .message
                .push_str(&format!(" {waiting} beneficiaries are still waiting."));
            suggestion
        },
    },
    PortfolioRule {
        key: "deadline_approaching",
        matches: rules::deadline_approaching,
        build: |matched| {
            grouped(
                SuggestionKind::Urgent,
                matched,
                "Deadlines approaching",
                "close enrollment within 30 days below 80% capacity.",
                "Prioritize remaining enrollments",
            )
        },
    },
    PortfolioRule {
        key: "low_efficiency",
        matches: rules::low_efficiency,
        build: |matched| {
            grouped(
                SuggestionKind::Info,
                matched,
                "Low processing efficiency",
                "have an efficiency score below 50.",
                "Streamline application review",
            )
        },
    },
    PortfolioRule {
        key: "pending_backlog",
        matches: rules::pending_backlog,
        build: |matched| {
            grouped(
                SuggestionKind::Info,
                matched,
                "Pending backlog",
                "have more pending applications than approvals.",
                "Review pending applications",
            )
        },
    },
    PortfolioRule {
        key: "processing_backlog",
        matches: rules::processing_backlog,
        build: |matched| {
            grouped(
                SuggestionKind::Info,
                matched,
                "Processing backlog",
                "have many applications stuck in processing.",
                "Finish processing reviews",
            )
        },
    },
    PortfolioRule {
        key: "high_rejection",
        matches: rules::high_rejection,
        build: |matched| {
            grouped(
                SuggestionKind::Warning,
                matched,
                "High rejection rates",
                "reject more than 30% of decided applications.",
                "Revisit eligibility requirements",
            )
        },
    },
    PortfolioRule {
        key: "budget_nearly_spent",
        matches: rules::budget_nearly_spent,
        build: |matched| {
            grouped(
                SuggestionKind::Warning,
                matched,
                "Budgets nearly spent",
                "have committed more than 90% of their allocation.",
                "Review remaining budgets",
            )
        },
    },
    PortfolioRule {
        key: "unpaid_amounts",
        matches: rules::unpaid_amounts,
        build: |matched| {
            let pending: f64 = matched
                .iter()
                .map(|facts| facts.metrics.pending_amount)
                .sum();
            let mut suggestion = grouped(
                SuggestionKind::Info,
                matched,
                "Amounts awaiting release",
                "have committed amounts not yet paid out.",
                "Reconcile pending disbursements",
            );
            suggestion
                .message
                .push_str(&format!(" {pending:.2} is outstanding in total."));
            suggestion
        },
    },
    PortfolioRule {
        key: "stalled_enrollment",
        matches: rules::stalled_enrollment,
        build: |matched| {
            grouped(
                SuggestionKind::Info,
                matched,
                "Enrollment stalled",
                "added no beneficiaries in the last 7 days.",
                "Check intake channels",
            )
        },
    },
];

fn low_health(facts: &ProgramFacts) -> bool {
    (30..50).contains(&facts.health_score())
}

fn grouped(
    kind: SuggestionKind,
    matched: &[&ProgramFacts],
    title: &str,
    predicate: &str,
    action: &str,
) -> Suggestion {
    let count = matched.len();
    let message = if count == 1 {
        format!("1 program {}", singular(predicate))
    } else {
        format!("{count} programs {predicate}")
    };

    Suggestion::new(
        kind,
        title,
        message,
        action,
        matched
            .iter()
            .map(|facts| facts.program_name.clone())
            .collect(),
    )
}

/// Turns a plural verb phrase ("have", "are", "close") into its singular form.
fn singular(predicate: &str) -> String {
    let (verb, rest) = predicate.split_once(' ').unwrap_or((predicate, ""));
    let verb = match verb {
        "have" => "has".to_string(),
        "are" => "is".to_string(),
        "finished" | "added" => verb.to_string(),
        other => format!("{other}s"),
    };

    if rest.is_empty() {
        verb
    } else {
        format!("{verb} {rest}")
    }
}

/// Recommendations across a whole portfolio, one per matching rule class.
pub fn suggest_for_portfolio(programs: &[ProgramFacts]) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for rule in PORTFOLIO_RULES {
        let matched: Vec<&ProgramFacts> = programs
            .iter()
            .filter(|facts| (rule.matches)(facts))
            .collect();
        if matched.is_empty() {
            continue;
        }
        debug!(rule = rule.key, programs = matched.len(), "portfolio rule matched");
        suggestions.push((rule.build)(&matched));
    }

    if suggestions.is_empty() {
        let message = if programs.is_empty() {
            "No programs to review yet.".to_string()
        } else {
            format!("All {} programs are running smoothly.", programs.len())
        };
        suggestions.push(Suggestion::new(
            SuggestionKind::Success,
            "Running smoothly",
            message,
            "Keep monitoring",
            Vec::new(),
        ));
    }

    suggestions
}
