//! Rule-table recommendations for program officers.
//!
//! Rules are evaluated in priority order against precomputed [`ProgramFacts`];
//! every matching rule contributes one suggestion and an empty result is
//! replaced by a single success notice.

mod portfolio;
mod rules;

pub use portfolio::suggest_for_portfolio;

use super::facts::ProgramFacts;
use serde::Serialize;
use tracing::trace;

/// Severity tier of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Urgent,
    Warning,
    Info,
    Success,
}

impl SuggestionKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Urgent => "Urgent",
            Self::Warning => "Warning",
            Self::Info => "Info",
            Self::Success => "Success",
        }
    }

    /// Lower values are more pressing.
    pub const fn priority(self) -> u8 {
        match self {
            Self::Urgent => 0,
            Self::Warning => 1,
            Self::Info => 2,
            Self::Success => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub title: String,
    pub message: String,
    pub action: String,
    pub affected_programs: Vec<String>,
}

impl Suggestion {
    pub(crate) fn new(
        kind: SuggestionKind,
        title: impl Into<String>,
        message: impl Into<String>,
        action: impl Into<String>,
        affected_programs: Vec<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            action: action.into(),
            affected_programs,
        }
    }
}

/// Recommendations for a single program, most pressing rule classes first.
pub fn suggest_for_program(facts: &ProgramFacts) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = rules::PROGRAM_RULES
        .iter()
        .filter(|rule| (rule.applies)(facts))
        .inspect(|rule| {
            trace!(rule = rule.key, program = %facts.program_id, "suggestion rule matched")
        })
        .map(|rule| (rule.build)(facts))
        .collect();

    if suggestions.is_empty() {
        suggestions.push(Suggestion::new(
            SuggestionKind::Success,
            "Running smoothly",
            format!("{} is on track with no issues detected.", facts.program_name),
            "Keep monitoring",
            vec![facts.program_name.clone()],
        ));
    }

    suggestions
}
