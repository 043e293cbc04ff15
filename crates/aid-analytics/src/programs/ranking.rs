use super::domain::{effective_status, group_by_program, Beneficiary, EffectiveStatus, Program};
use super::metrics::ProgramMetrics;
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

pub const BENEFICIARY_WEIGHT: f64 = 0.35;
pub const COMPLETION_WEIGHT: f64 = 0.25;
pub const PAYMENT_WEIGHT: f64 = 0.15;
pub const IMPACT_WEIGHT: f64 = 0.15;
pub const GROWTH_WEIGHT: f64 = 0.10;

const GROWTH_WINDOW_DAYS: i64 = 30;

/// Qualitative tag attached to a ranked program when it crosses a fixed threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Badge {
    Trending,
    TopRated,
    Excellent,
    HighPerformer,
}

impl Badge {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Trending => "Trending",
            Self::TopRated => "Top Rated",
            Self::Excellent => "Excellent",
            Self::HighPerformer => "High Performer",
        }
    }
}

/// Portfolio-wide maxima, reduced once before any program is scored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankingBaseline {
    pub max_total: usize,
    pub max_average_amount: f64,
}

impl RankingBaseline {
    pub fn from_metrics<'a>(metrics: impl IntoIterator<Item = &'a ProgramMetrics>) -> Self {
        metrics.into_iter().fold(
            Self {
                max_total: 0,
                max_average_amount: 0.0,
            },
            |baseline, metrics| Self {
                max_total: baseline.max_total.max(metrics.total),
                max_average_amount: baseline.max_average_amount.max(metrics.average_amount),
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingMetrics {
    pub beneficiary_score: f64,
    pub completion_score: f64,
    pub payment_score: f64,
    pub impact_score: f64,
    pub growth_score: f64,
    pub total_beneficiaries: usize,
    pub recent_enrollments: usize,
    pub completion_rate: u32,
    pub payment_rate: u32,
    pub average_amount: f64,
    pub growth_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedProgram {
    pub program: Program,
    pub effective_status: EffectiveStatus,
    pub overall_score: f64,
    pub metrics: RankingMetrics,
    pub badges: Vec<Badge>,
}

/// Scores every program (optionally narrowed to a category) and sorts them best first.
///
/// Callers truncate the result to the leaderboard size they display.
pub fn rank_programs(
    programs: &[Program],
    beneficiaries: &[Beneficiary],
    category: Option<&str>,
    now: NaiveDateTime,
) -> Vec<RankedProgram> {
    let grouped = group_by_program(beneficiaries);
    let empty = Vec::new();

    let candidates: Vec<(&Program, &[Beneficiary], ProgramMetrics)> = programs
        .iter()
        .filter(|program| category.map_or(true, |category| program.matches_category(category)))
        .map(|program| {
            let enrolled = grouped.get(&program.id).unwrap_or(&empty).as_slice();
            let metrics = ProgramMetrics::aggregate(program, enrolled);
            (program, enrolled, metrics)
        })
        .collect();

    let baseline = RankingBaseline::from_metrics(candidates.iter().map(|(_, _, metrics)| metrics));

    let mut ranked: Vec<RankedProgram> = candidates
        .into_iter()
        .map(|(program, enrolled, metrics)| score_program(program, enrolled, &metrics, &baseline, now))
        .collect();

    ranked.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));

    debug!(
        ranked = ranked.len(),
        category = category.unwrap_or("all"),
        max_total = baseline.max_total,
        "ranked programs"
    );

    ranked
}

/// Scores one program against precomputed portfolio maxima.
pub fn score_program(
    program: &Program,
    beneficiaries: &[Beneficiary],
    metrics: &ProgramMetrics,
    baseline: &RankingBaseline,
    now: NaiveDateTime,
) -> RankedProgram {
    let beneficiary_score = metrics.total as f64 / baseline.max_total.max(1) as f64 * 100.0;
    let completion_score = metrics.completion_percentage.min(100) as f64;
    let payment_score = metrics.payment_rate as f64;
    let impact_score = metrics.average_amount / baseline.max_average_amount.max(1.0) * 100.0;

    let cutoff = now - Duration::days(GROWTH_WINDOW_DAYS);
    let recent_enrollments = beneficiaries
        .iter()
        .filter(|beneficiary| beneficiary.created_at.is_some_and(|created| created >= cutoff))
        .count();
    let previous = metrics.total - recent_enrollments;
    let growth_rate = if previous > 0 {
        (recent_enrollments as f64 - previous as f64) / previous as f64 * 100.0
    } else {
        0.0
    };
    let growth_score = (growth_rate + 50.0).clamp(0.0, 100.0);

    let overall_score = BENEFICIARY_WEIGHT * beneficiary_score
        + COMPLETION_WEIGHT * completion_score
        + PAYMENT_WEIGHT * payment_score
        + IMPACT_WEIGHT * impact_score
        + GROWTH_WEIGHT * growth_score;

    let mut badges = Vec::new();
    if growth_rate > 20.0 {
        badges.push(Badge::Trending);
    }
    if metrics.payment_rate >= 90 {
        badges.push(Badge::TopRated);
    }
    if metrics.completion_percentage >= 95 {
        badges.push(Badge::Excellent);
    }
    if overall_score >= 85.0 {
        badges.push(Badge::HighPerformer);
    }

    RankedProgram {
        program: program.clone(),
        effective_status: effective_status(program, beneficiaries),
        overall_score,
        metrics: RankingMetrics {
            beneficiary_score,
            completion_score,
            payment_score,
            impact_score,
            growth_score,
            total_beneficiaries: metrics.total,
            recent_enrollments,
            completion_rate: metrics.completion_percentage,
            payment_rate: metrics.payment_rate,
            average_amount: metrics.average_amount,
            growth_rate,
        },
        badges,
    }
}
