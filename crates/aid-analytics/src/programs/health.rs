//! Phase-weighted program health score.
//!
//! Four sub-scores (enrollment completion, schedule adherence, payment progress
//! and approval quality) are tiered against a weight that depends on where the
//! program sits in its lifecycle. The breakdown keeps every intermediate value so
//! dashboards can show how the final number was reached.

use super::metrics::StatusCounts;
use super::phase::Phase;
use serde::Serialize;

/// Points available to each sub-score. Every row sums to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseWeights {
    pub completion: u32,
    pub time: u32,
    pub status: u32,
    pub payment: u32,
}

impl PhaseWeights {
    pub const fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::Planning | Phase::Upcoming | Phase::Gathering => Self {
                completion: 40,
                time: 30,
                status: 30,
                payment: 0,
            },
            Phase::Processing => Self {
                completion: 20,
                time: 20,
                status: 30,
                payment: 30,
            },
            Phase::Payout => Self {
                completion: 10,
                time: 10,
                status: 20,
                payment: 60,
            },
            Phase::Completed => Self {
                completion: 20,
                time: 20,
                status: 20,
                payment: 40,
            },
        }
    }

    pub const fn total(self) -> u32 {
        self.completion + self.time + self.status + self.payment
    }
}

/// Everything the health score needs, already reduced from the raw records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthInputs {
    pub completion_percentage: u32,
    pub time_progress: u32,
    pub payment_rate: u32,
    pub status_counts: StatusCounts,
    pub phase: Phase,
    pub gathering_progress: u32,
}

/// One tiered component of the health score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubScore {
    pub points: f64,
    pub max: u32,
    /// Rate the tier was chosen from; `None` when there was nothing to measure.
    pub rate: Option<f64>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSubScores {
    pub completion: SubScore,
    pub time: SubScore,
    pub payment: SubScore,
    pub status: SubScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HealthTotal {
    pub points: f64,
    #[serde(rename = "final")]
    pub final_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthScoreBreakdown {
    pub phase: Phase,
    pub weights: PhaseWeights,
    pub scores: HealthSubScores,
    pub total: HealthTotal,
}

impl HealthScoreBreakdown {
    pub fn compute(inputs: &HealthInputs) -> Self {
        let weights = PhaseWeights::for_phase(inputs.phase);

        let completion = completion_score(inputs.completion_percentage, weights.completion);
        let time = time_score(inputs, weights.time);
        let payment = payment_score(inputs.payment_rate, weights.payment);
        let status = status_score(&inputs.status_counts, weights.status);

        let points = completion.points + time.points + payment.points + status.points;
        let final_score = points.clamp(0.0, 100.0).round() as u32;

        Self {
            phase: inputs.phase,
            weights,
            scores: HealthSubScores {
                completion,
                time,
                payment,
                status,
            },
            total: HealthTotal {
                points,
                final_score,
            },
        }
    }

    pub fn final_score(&self) -> u32 {
        self.total.final_score
    }
}

fn tier(weight: u32, percent_of_weight: u32) -> f64 {
    (weight * percent_of_weight) as f64 / 100.0
}

fn completion_score(completion: u32, weight: u32) -> SubScore {
    let share = match completion {
        90.. => 100,
        70..=89 => 80,
        50..=69 => 60,
        30..=49 => 40,
        _ => 20,
    };

    SubScore {
        points: tier(weight, share),
        max: weight,
        rate: Some(completion as f64),
        notes: format!("{completion}% of enrollment capacity filled"),
    }
}

fn time_score(inputs: &HealthInputs, weight: u32) -> SubScore {
    let progress = if inputs.phase == Phase::Gathering {
        inputs.gathering_progress
    } else {
        inputs.time_progress
    };

    let (share, notes) = match progress {
        0..=50 => (100, format!("{progress}% of schedule used")),
        51..=75 => (80, format!("{progress}% of schedule used")),
        76..=90 => (60, format!("{progress}% of schedule used")),
        91..=100 => (40, format!("{progress}% of schedule used")),
        _ => (20, format!("schedule overrun ({progress}%)")),
    };

    SubScore {
        points: tier(weight, share),
        max: weight,
        rate: Some(progress as f64),
        notes,
    }
}

fn payment_score(payment_rate: u32, weight: u32) -> SubScore {
    let share = match payment_rate {
        80.. => 100,
        60..=79 => 80,
        40..=59 => 60,
        20..=39 => 40,
        _ => 20,
    };

    SubScore {
        points: tier(weight, share),
        max: weight,
        rate: Some(payment_rate as f64),
        notes: format!("{payment_rate}% of beneficiaries paid"),
    }
}

fn status_score(counts: &StatusCounts, weight: u32) -> SubScore {
    let decided = counts.approved + counts.pending + counts.rejected;
    if decided == 0 {
        return SubScore {
            points: tier(weight, 50),
            max: weight,
            rate: None,
            notes: "no applications to assess yet".to_string(),
        };
    }

    let approval_rate = counts.approved as f64 / decided as f64 * 100.0;
    let share = if approval_rate >= 80.0 {
        100
    } else if approval_rate >= 60.0 {
        80
    } else if approval_rate >= 40.0 {
        60
    } else {
        40
    };

    SubScore {
        points: tier(weight, share),
        max: weight,
        rate: Some(approval_rate),
        notes: format!(
            "{} approved, {} pending, {} rejected",
            counts.approved, counts.pending, counts.rejected
        ),
    }
}
