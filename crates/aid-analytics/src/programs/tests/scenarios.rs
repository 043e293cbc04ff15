use super::common::*;
use crate::programs::domain::{effective_status, BeneficiaryStatus, EffectiveStatus, StoredStatus};
use crate::programs::efficiency::EfficiencyScore;
use crate::programs::health::PhaseWeights;
use crate::programs::phase::{time_progress, Phase, PhaseClassification};
use crate::programs::ranking::rank_programs;
use crate::programs::report::{PortfolioOverview, ProgramOverview};

#[test]
fn mid_gathering_program_uses_gathering_weights() {
    let program = january_program("p-a", 100);
    let enrolled = enroll("p-a", 50, BeneficiaryStatus::Pending);

    let overview = ProgramOverview::build(&program, &enrolled, at(2024, 1, 15));

    assert_eq!(overview.phase, Phase::Gathering);
    assert_eq!(overview.phase_metrics.gathering.progress, 47);
    assert_eq!(overview.metrics.completion_percentage, 50);
    assert_eq!(overview.time_progress, 31);
    assert_eq!(overview.health.weights, PhaseWeights::for_phase(Phase::Gathering));
    assert_eq!(overview.health.weights.payment, 0);
    assert_eq!(overview.health.scores.payment.points, 0.0);
    assert_eq!(overview.health.scores.completion.points, 24.0);
    assert_eq!(overview.health.scores.time.points, 30.0);
    assert_eq!(overview.health.scores.status.points, 12.0);
    assert_eq!(overview.health_score(), 66);
}

#[test]
fn fully_paid_program_reads_as_complete() {
    let program = program("p-b", 10);
    assert_eq!(program.stored_status, StoredStatus::Ongoing);
    let paid: Vec<_> = (0..10)
        .map(|index| beneficiary(&format!("b-{index}"), "p-b", BeneficiaryStatus::Approved, true))
        .collect();

    assert_eq!(effective_status(&program, &paid), EffectiveStatus::Complete);
    let overview = ProgramOverview::build(&program, &paid, at(2024, 1, 15));
    assert_eq!(overview.effective_status, EffectiveStatus::Complete);
    assert_eq!(overview.effective_status_label, "Complete");
}

#[test]
fn program_without_beneficiaries_scores_neutral_status() {
    let program = january_program("p-c", 100);

    let overview = ProgramOverview::build(&program, &[], at(2024, 1, 15));

    assert_eq!(overview.metrics.total, 0);
    assert_eq!(overview.metrics.payment_rate, 0);
    assert_eq!(overview.metrics.completion_percentage, 0);
    let status = &overview.health.scores.status;
    assert_eq!(status.points, 0.5 * overview.health.weights.status as f64);
    assert_eq!(status.rate, None);
    assert_eq!(overview.effective_status, EffectiveStatus::Ongoing);
}

#[test]
fn untimed_approvals_fall_into_fastest_speed_tier() {
    let mut enrolled = enroll("p-e", 4, BeneficiaryStatus::Approved);
    enrolled[0].created_at = Some(at(2024, 1, 2));
    enrolled[1].updated_at = Some(at(2024, 1, 9));

    let efficiency = EfficiencyScore::compute(&enrolled, 40, 40);

    assert_eq!(efficiency.avg_processing_days, 0.0);
    assert_eq!(efficiency.speed_points, 50);
}

#[test]
fn identical_inputs_produce_identical_reports() {
    let program = january_program("p-1", 20);
    let mut enrolled = enroll("p-1", 12, BeneficiaryStatus::Approved);
    enrolled[0].is_paid = true;
    enrolled[1].status = BeneficiaryStatus::Rejected;
    let now = at(2024, 2, 20);

    let first = ProgramOverview::build(&program, &enrolled, now);
    let second = ProgramOverview::build(&program, &enrolled, now);

    assert_eq!(
        serde_json::to_value(&first).expect("serialize overview"),
        serde_json::to_value(&second).expect("serialize overview")
    );
    assert_eq!(
        rank_programs(&[program.clone()], &enrolled, None, now),
        rank_programs(&[program], &enrolled, None, now)
    );
}

#[test]
fn scores_stay_within_bounds_across_the_lifecycle() {
    let program = january_program("p-1", 10);
    let enrolled = enroll("p-1", 25, BeneficiaryStatus::Pending);

    for now in [
        at(2023, 12, 1),
        at(2024, 1, 10),
        at(2024, 2, 1),
        at(2024, 2, 20),
        at(2025, 6, 1),
    ] {
        let overview = ProgramOverview::build(&program, &enrolled, now);
        assert!(overview.health_score() <= 100);
        assert!(overview.efficiency.score <= 100);
        for window in [
            overview.phase_metrics.gathering,
            overview.phase_metrics.processing,
            overview.phase_metrics.payout,
        ] {
            assert!(window.progress <= 100);
            assert!(window.days_left >= 0);
        }
        assert!(!overview.suggestions.is_empty());
    }
}

#[test]
fn phases_follow_the_calendar() {
    let program = january_program("p-1", 10);
    let phase_at = |now| PhaseClassification::for_program(&program, now).phase;

    assert_eq!(phase_at(at(2023, 12, 15)), Phase::Upcoming);
    assert_eq!(phase_at(at(2024, 1, 1)), Phase::Gathering);
    assert_eq!(phase_at(at(2024, 1, 31)), Phase::Gathering);
    assert_eq!(phase_at(at(2024, 2, 1)), Phase::Processing);
    assert_eq!(phase_at(at(2024, 2, 15)), Phase::Payout);
    assert_eq!(time_progress(&program, at(2024, 3, 31)), 200);
}

#[test]
fn effective_status_agrees_across_views() {
    let programs = vec![program("p-paid", 5), program("p-open", 5)];
    let mut beneficiaries: Vec<_> = (0..5)
        .map(|index| {
            beneficiary(
                &format!("paid-{index}"),
                "p-paid",
                BeneficiaryStatus::Disbursed,
                false,
            )
        })
        .collect();
    beneficiaries.extend(enroll("p-open", 3, BeneficiaryStatus::Approved));
    let now = at(2024, 1, 15);

    let ranked = rank_programs(&programs, &beneficiaries, None, now);
    let portfolio = PortfolioOverview::build(&programs, &beneficiaries, None, now);

    for entry in &portfolio.programs {
        let ranked_status = ranked
            .iter()
            .find(|ranked| ranked.program.id.0 == entry.program_id)
            .map(|ranked| ranked.effective_status)
            .expect("program ranked");
        assert_eq!(ranked_status, entry.effective_status);
    }
    assert_eq!(portfolio.programs_in(EffectiveStatus::Complete), 1);
    assert_eq!(portfolio.programs_in(EffectiveStatus::Ongoing), 1);
    assert_eq!(portfolio.paid_beneficiaries, 5);
    assert_eq!(portfolio.pending_beneficiaries, 3);
}

#[test]
fn processing_without_payout_date_keeps_schedule_neutral() {
    let mut program = january_program("p-1", 10);
    program.payout_date = None;
    let enrolled = enroll("p-1", 8, BeneficiaryStatus::Approved);

    let overview = ProgramOverview::build(&program, &enrolled, at(2024, 2, 20));

    assert_eq!(overview.phase, Phase::Processing);
    assert_eq!(overview.time_progress, 0);
    assert_eq!(overview.health.scores.time.points, 20.0);
    assert_eq!(overview.health_score(), 72);
    assert_eq!(overview.efficiency.score, 100);
    assert!(overview
        .suggestions
        .iter()
        .all(|suggestion| suggestion.title != "Program health needs attention"));
    assert!(overview
        .suggestions
        .iter()
        .any(|suggestion| suggestion.title == "Set a payout date"));
}
