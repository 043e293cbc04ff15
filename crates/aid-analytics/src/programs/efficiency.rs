use super::domain::{days_between, Beneficiary, BeneficiaryStatus};
use serde::Serialize;

/// Processing speed and enrollment pace rolled into one 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EfficiencyScore {
    pub score: u32,
    pub speed_points: u32,
    pub progress_points: u32,
    pub avg_processing_days: f64,
    pub progress_ratio: f64,
}

impl EfficiencyScore {
    pub fn compute(
        beneficiaries: &[Beneficiary],
        time_progress: u32,
        completion_percentage: u32,
    ) -> Self {
        let avg_processing_days = average_processing_days(beneficiaries);
        let speed_points = speed_points(avg_processing_days);

        let progress_ratio = completion_percentage as f64 / time_progress.max(1) as f64;
        let progress_points = progress_points(progress_ratio);

        Self {
            score: (speed_points + progress_points).min(100),
            speed_points,
            progress_points,
            avg_processing_days,
            progress_ratio,
        }
    }
}

/// Mean approval turnaround in whole days; zero when no approved record carries both timestamps.
pub fn average_processing_days(beneficiaries: &[Beneficiary]) -> f64 {
    let durations: Vec<i64> = beneficiaries
        .iter()
        .filter(|beneficiary| beneficiary.status == BeneficiaryStatus::Approved)
        .filter_map(|beneficiary| match (beneficiary.created_at, beneficiary.updated_at) {
            (Some(created), Some(updated)) => Some(days_between(created, updated).max(0)),
            _ => None,
        })
        .collect();

    if durations.is_empty() {
        return 0.0;
    }

    durations.iter().sum::<i64>() as f64 / durations.len() as f64
}

fn speed_points(avg_days: f64) -> u32 {
    if avg_days <= 1.0 {
        50
    } else if avg_days <= 3.0 {
        40
    } else if avg_days <= 7.0 {
        30
    } else if avg_days <= 14.0 {
        20
    } else {
        10
    }
}

fn progress_points(ratio: f64) -> u32 {
    if ratio >= 1.2 {
        50
    } else if ratio >= 1.0 {
        40
    } else if ratio >= 0.8 {
        30
    } else if ratio >= 0.6 {
        20
    } else {
        10
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::programs::tests::common::{at, beneficiary};

    #[test]
    fn no_timed_approvals_counts_as_fastest_tier() {
        let mut pending = beneficiary("b-1", "p-1", BeneficiaryStatus::Pending, false);
        pending.created_at = Some(at(2024, 1, 1));
        pending.updated_at = Some(at(2024, 3, 1));
        let untimed = beneficiary("b-2", "p-1", BeneficiaryStatus::Approved, false);

        let efficiency = EfficiencyScore::compute(&[pending, untimed], 50, 50);

        assert_eq!(efficiency.avg_processing_days, 0.0);
        assert_eq!(efficiency.speed_points, 50);
    }

    #[test]
    fn slow_approvals_lower_speed_points() {
        let approvals: Vec<_> = [2, 10]
            .into_iter()
            .enumerate()
            .map(|(index, days)| {
                let mut approved =
                    beneficiary(&format!("b-{index}"), "p-1", BeneficiaryStatus::Approved, false);
                approved.created_at = Some(at(2024, 1, 1));
                approved.updated_at = Some(at(2024, 1, 1 + days));
                approved
            })
            .collect();

        let efficiency = EfficiencyScore::compute(&approvals, 100, 100);

        assert_eq!(efficiency.avg_processing_days, 6.0);
        assert_eq!(efficiency.speed_points, 30);
        assert_eq!(efficiency.progress_points, 40);
        assert_eq!(efficiency.score, 70);
    }

    #[test]
    fn speed_tiers_follow_thresholds() {
        let cases = [
            (0, 50),
            (1, 50),
            (2, 40),
            (3, 40),
            (4, 30),
            (7, 30),
            (8, 20),
            (14, 20),
            (15, 10),
        ];
        for (days, expected) in cases {
            let mut approved = beneficiary("b-1", "p-1", BeneficiaryStatus::Approved, false);
            approved.created_at = Some(at(2024, 1, 1));
            approved.updated_at = Some(at(2024, 1, 1 + days));

            let efficiency = EfficiencyScore::compute(&[approved], 100, 100);

            assert_eq!(efficiency.avg_processing_days, days as f64);
            assert_eq!(efficiency.speed_points, expected, "{days} day(s)");
        }
    }

    #[test]
    fn progress_ratio_tiers_follow_thresholds() {
        let cases = [
            (120, 50),
            (119, 40),
            (100, 40),
            (99, 30),
            (80, 30),
            (79, 20),
            (60, 20),
            (59, 10),
        ];
        for (completion, expected) in cases {
            let efficiency = EfficiencyScore::compute(&[], 100, completion);
            assert_eq!(efficiency.progress_points, expected, "{completion}% over 100% time");
        }
    }

    #[test]
    fn enrollment_ahead_of_schedule_earns_full_progress_points() {
        let efficiency = EfficiencyScore::compute(&[], 40, 60);

        assert_eq!(efficiency.progress_ratio, 1.5);
        assert_eq!(efficiency.progress_points, 50);
        assert_eq!(efficiency.score, 100);
    }

    #[test]
    fn zero_time_progress_is_treated_as_one_percent() {
        let efficiency = EfficiencyScore::compute(&[], 0, 0);

        assert_eq!(efficiency.progress_ratio, 0.0);
        assert_eq!(efficiency.progress_points, 10);
        assert_eq!(efficiency.score, 60);
    }
}
