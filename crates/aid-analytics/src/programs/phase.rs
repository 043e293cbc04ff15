use super::domain::{days_between, round_percent, Program};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Lifecycle stage of a program derived from its dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Planning,
    Upcoming,
    Gathering,
    Processing,
    Payout,
    Completed,
}

impl Phase {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Planning,
            Self::Upcoming,
            Self::Gathering,
            Self::Processing,
            Self::Payout,
            Self::Completed,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::Upcoming => "Upcoming",
            Self::Gathering => "Gathering Beneficiaries",
            Self::Processing => "Processing",
            Self::Payout => "Payout",
            Self::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    #[default]
    Upcoming,
    Active,
    Completed,
}

/// Day counts and progress for one lifecycle window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PhaseWindow {
    pub progress: u32,
    pub status: PhaseStatus,
    pub days_elapsed: i64,
    pub days_left: i64,
    pub days_total: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PhaseMetrics {
    pub gathering: PhaseWindow,
    pub processing: PhaseWindow,
    pub payout: PhaseWindow,
}

/// The three dates that drive the lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgramSchedule {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub payout: Option<NaiveDateTime>,
}

impl From<&Program> for ProgramSchedule {
    fn from(program: &Program) -> Self {
        Self {
            start: program.start_date,
            end: program.end_date,
            payout: program.payout_date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseClassification {
    pub phase: Phase,
    pub metrics: PhaseMetrics,
}

impl PhaseClassification {
    pub fn for_program(program: &Program, now: NaiveDateTime) -> Self {
        Self::classify(ProgramSchedule::from(program), now)
    }

    pub fn classify(schedule: ProgramSchedule, now: NaiveDateTime) -> Self {
        let phase = current_phase(schedule, now);
        let metrics = PhaseMetrics {
            gathering: gathering_window(schedule, phase, now),
            processing: processing_window(schedule, phase, now),
            payout: payout_window(schedule, phase, now),
        };

        Self { phase, metrics }
    }
}

fn current_phase(schedule: ProgramSchedule, now: NaiveDateTime) -> Phase {
    let (start, end) = match (schedule.start, schedule.end) {
        (Some(start), Some(end)) => (start, end),
        _ => return Phase::Planning,
    };

    if now < start {
        return Phase::Upcoming;
    }
    if now <= end {
        return Phase::Gathering;
    }
    if schedule.payout.map_or(true, |payout| now < payout) {
        return Phase::Processing;
    }
    if schedule.payout.is_some_and(|payout| now >= payout) {
        return Phase::Payout;
    }

    // Unreachable from dates alone; kept as the terminal default.
    Phase::Completed
}

fn window_status(phase: Phase, window: Phase, boundary_passed: bool) -> PhaseStatus {
    if phase == window {
        PhaseStatus::Active
    } else if boundary_passed || phase == Phase::Completed {
        PhaseStatus::Completed
    } else {
        PhaseStatus::Upcoming
    }
}

fn span_window(
    from: NaiveDateTime,
    to: NaiveDateTime,
    now: NaiveDateTime,
    status: PhaseStatus,
) -> PhaseWindow {
    let days_elapsed = days_between(from, now).max(0);
    let days_left = days_between(now, to).max(0);
    let days_total = days_between(from, to).max(1);
    let progress = round_percent(days_elapsed as f64, days_total as f64).min(100);

    PhaseWindow {
        progress,
        status,
        days_elapsed,
        days_left,
        days_total,
    }
}

fn gathering_window(schedule: ProgramSchedule, phase: Phase, now: NaiveDateTime) -> PhaseWindow {
    match (schedule.start, schedule.end) {
        (Some(start), Some(end)) => {
            let status = window_status(phase, Phase::Gathering, now > end);
            span_window(start, end, now, status)
        }
        _ => PhaseWindow::default(),
    }
}

fn processing_window(schedule: ProgramSchedule, phase: Phase, now: NaiveDateTime) -> PhaseWindow {
    let payout_passed = schedule.payout.map(|payout| now >= payout).unwrap_or(false);
    let status = window_status(phase, Phase::Processing, payout_passed);

    match (schedule.end, schedule.payout) {
        (Some(end), Some(payout)) if schedule.start.is_some() => {
            span_window(end, payout, now, status)
        }
        (Some(end), None) if schedule.start.is_some() => PhaseWindow {
            progress: 0,
            status,
            days_elapsed: days_between(end, now).max(0),
            days_left: 0,
            days_total: 1,
        },
        _ => PhaseWindow::default(),
    }
}

fn payout_window(schedule: ProgramSchedule, phase: Phase, now: NaiveDateTime) -> PhaseWindow {
    let payout = match schedule.payout {
        Some(payout) if phase != Phase::Planning => payout,
        _ => return PhaseWindow::default(),
    };

    let passed = now >= payout;
    PhaseWindow {
        progress: if passed { 100 } else { 0 },
        status: window_status(phase, Phase::Payout, false),
        days_elapsed: if passed {
            days_between(payout, now).max(0)
        } else {
            0
        },
        days_left: days_between(now, payout).max(0),
        days_total: 1,
    }
}

/// Overall schedule progress from start to payout; zero until a payout date is set.
///
/// Not capped: values above 100 mean the program has run past its payout date.
pub fn time_progress(program: &Program, now: NaiveDateTime) -> u32 {
    match (program.start_date, program.payout_date) {
        (Some(start), Some(payout)) => {
            let total = days_between(start, payout);
            if total <= 0 {
                return 0;
            }
            let elapsed = days_between(start, now).max(0);
            round_percent(elapsed as f64, total as f64)
        }
        _ => 0,
    }
}

/// Whole days since the program opened, zero before it starts or when undated.
pub fn days_since_start(program: &Program, now: NaiveDateTime) -> i64 {
    program
        .start_date
        .map(|start| days_between(start, now).max(0))
        .unwrap_or(0)
}

/// Whole days until the enrollment window closes; `None` once it has closed or when undated.
pub fn days_until_end(program: &Program, now: NaiveDateTime) -> Option<i64> {
    program
        .end_date
        .filter(|end| now <= *end)
        .map(|end| days_between(now, end).max(0))
}
