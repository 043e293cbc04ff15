use aid_analytics::config::AppConfig;
use aid_analytics::error::AppError;
use aid_analytics::programs::{
    rank_programs, PortfolioOverview, ProgramOverview, RankedProgram, RecordsSnapshot, Suggestion,
};
use aid_analytics::telemetry;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "aid-dashboard",
    about = "Lifecycle, health and ranking analytics for aid programs",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the dashboard for a single program
    Program(ProgramArgs),
    /// Summarize every program in the snapshot
    Portfolio(PortfolioArgs),
    /// Print the program leaderboard
    Rankings(RankingArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// JSON records snapshot (defaults to DASHBOARD_SNAPSHOT)
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// Extra beneficiary CSV export merged into the snapshot
    #[arg(long)]
    beneficiaries_csv: Option<PathBuf>,
    /// Evaluation time as YYYY-MM-DD or RFC 3339 (defaults to now)
    #[arg(long, value_parser = parse_now)]
    now: Option<NaiveDateTime>,
    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ProgramArgs {
    /// Program id as it appears in the snapshot
    #[arg(long)]
    id: String,
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Args, Debug)]
struct PortfolioArgs {
    /// Only include programs whose assistance or beneficiary type contains this text
    #[arg(long)]
    category: Option<String>,
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Args, Debug)]
struct RankingArgs {
    /// Only rank programs whose assistance or beneficiary type contains this text
    #[arg(long)]
    category: Option<String>,
    /// Leaderboard size (defaults to DASHBOARD_TOP_N)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    top: Option<u32>,
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Debug, Serialize)]
struct PortfolioResponse<'a> {
    evaluated_at: NaiveDateTime,
    #[serde(flatten)]
    overview: &'a PortfolioOverview,
    top_programs: &'a [RankedProgram],
}

#[derive(Debug, Serialize)]
struct RankingsResponse<'a> {
    evaluated_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    rankings: &'a [RankedProgram],
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("application error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Program(args) => {
            let (snapshot, now) = load_source(&config, "program", &args.source)?;
            let overview = program_overview(&snapshot, &args.id, now)?;
            if args.source.json {
                print_json(&overview)
            } else {
                render_program_overview(&overview, now);
                Ok(())
            }
        }
        Command::Portfolio(args) => {
            let (snapshot, now) = load_source(&config, "portfolio", &args.source)?;
            let category = args.category.as_deref();
            let portfolio = PortfolioOverview::build(
                &snapshot.programs,
                &snapshot.beneficiaries,
                category,
                now,
            );
            let top_programs = leaderboard(&snapshot, category, config.dashboard.top_n, now);
            if args.source.json {
                print_json(&PortfolioResponse {
                    evaluated_at: now,
                    overview: &portfolio,
                    top_programs: &top_programs,
                })
            } else {
                render_portfolio(&portfolio, category, now);
                println!();
                render_rankings(&top_programs, category, now);
                Ok(())
            }
        }
        Command::Rankings(args) => {
            let (snapshot, now) = load_source(&config, "rankings", &args.source)?;
            let top = args
                .top
                .map(|top| top as usize)
                .unwrap_or(config.dashboard.top_n);
            let rankings = leaderboard(&snapshot, args.category.as_deref(), top, now);
            if args.source.json {
                print_json(&RankingsResponse {
                    evaluated_at: now,
                    category: args.category.as_deref(),
                    rankings: &rankings,
                })
            } else {
                render_rankings(&rankings, args.category.as_deref(), now);
                Ok(())
            }
        }
    }
}

fn load_source(
    config: &AppConfig,
    command: &str,
    source: &SourceArgs,
) -> Result<(RecordsSnapshot, NaiveDateTime), AppError> {
    let path = config.dashboard.snapshot_path(source.snapshot.clone())?;
    let mut snapshot = RecordsSnapshot::from_json_path(&path)?;
    if let Some(csv) = &source.beneficiaries_csv {
        snapshot = snapshot.with_beneficiaries_csv_path(csv)?;
    }

    let now = source.now.unwrap_or_else(|| Local::now().naive_local());
    info!(
        ?config.environment,
        command,
        snapshot = %path.display(),
        programs = snapshot.programs.len(),
        beneficiaries = snapshot.beneficiaries.len(),
        %now,
        "records loaded"
    );

    Ok((snapshot, now))
}

fn program_overview(
    snapshot: &RecordsSnapshot,
    id: &str,
    now: NaiveDateTime,
) -> Result<ProgramOverview, AppError> {
    let program = snapshot
        .program(id)
        .ok_or_else(|| AppError::ProgramNotFound(id.to_string()))?;
    let enrolled = snapshot.beneficiaries_for(&program.id);
    Ok(ProgramOverview::build(program, &enrolled, now))
}

fn leaderboard(
    snapshot: &RecordsSnapshot,
    category: Option<&str>,
    top: usize,
    now: NaiveDateTime,
) -> Vec<RankedProgram> {
    let mut ranked = rank_programs(&snapshot.programs, &snapshot.beneficiaries, category, now);
    ranked.truncate(top);
    ranked
}

fn parse_now(raw: &str) -> Result<NaiveDateTime, String> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("failed to parse '{raw}' as YYYY-MM-DD or RFC 3339"))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

fn render_program_overview(overview: &ProgramOverview, now: NaiveDateTime) {
    println!("{} ({})", overview.program_name, overview.program_id);
    println!(
        "Status: {} | Phase: {} (evaluated {})",
        overview.effective_status_label, overview.phase_label, now
    );

    println!("\nPhase progress");
    let windows = [
        ("Gathering", &overview.phase_metrics.gathering),
        ("Processing", &overview.phase_metrics.processing),
        ("Payout", &overview.phase_metrics.payout),
    ];
    for (label, window) in windows {
        println!(
            "- {}: {}% ({} of {} days, {} left)",
            label, window.progress, window.days_elapsed, window.days_total, window.days_left
        );
    }

    let metrics = &overview.metrics;
    println!("\nEnrollment and payments");
    println!(
        "- Beneficiaries: {} ({}% of capacity)",
        metrics.total, metrics.completion_percentage
    );
    println!(
        "- Paid: {} ({}%), awaiting payment: {}",
        metrics.paid_count, metrics.payment_rate, metrics.pending_count
    );
    println!(
        "- Amounts: {:.2} committed, {:.2} paid, {:.2} pending",
        metrics.total_amount, metrics.paid_amount, metrics.pending_amount
    );
    println!("- Budget utilization: {}%", overview.budget_utilization);
    println!("- Schedule used: {}%", overview.time_progress);
    if let Some(days) = overview.days_until_end {
        println!("- Enrollment closes in {} day(s)", days);
    }

    let health = &overview.health;
    println!("\nHealth score: {}/100", health.final_score());
    let parts = [
        ("Completion", &health.scores.completion),
        ("Schedule", &health.scores.time),
        ("Payment", &health.scores.payment),
        ("Approvals", &health.scores.status),
    ];
    for (label, score) in parts {
        println!(
            "- {}: {:.1}/{} ({})",
            label, score.points, score.max, score.notes
        );
    }

    let efficiency = &overview.efficiency;
    println!(
        "\nEfficiency score: {}/100 (avg approval {:.1} day(s))",
        efficiency.score, efficiency.avg_processing_days
    );

    render_suggestions(&overview.suggestions);
}

fn render_portfolio(portfolio: &PortfolioOverview, category: Option<&str>, now: NaiveDateTime) {
    println!("Program portfolio (evaluated {})", now);
    if let Some(category) = category {
        println!("Category filter: {}", category);
    }
    println!(
        "{} programs, {} beneficiaries, average health {}/100",
        portfolio.total_programs, portfolio.total_beneficiaries, portfolio.average_health_score
    );

    println!("\nBy status");
    for entry in &portfolio.status_counts {
        println!("- {}: {}", entry.status_label, entry.programs);
    }

    println!("\nBy phase");
    for entry in portfolio.phase_counts.iter().filter(|entry| entry.programs > 0) {
        println!("- {}: {}", entry.phase_label, entry.programs);
    }

    println!(
        "\nPayments: {} paid, {} awaiting ({:.2} paid, {:.2} pending of {:.2})",
        portfolio.paid_beneficiaries,
        portfolio.pending_beneficiaries,
        portfolio.paid_amount,
        portfolio.pending_amount,
        portfolio.total_amount
    );

    if !portfolio.programs.is_empty() {
        println!("\nPrograms");
        for entry in &portfolio.programs {
            println!(
                "- {} | {} | {} | health {} | efficiency {} | {}% enrolled | {}% paid",
                entry.program_name,
                entry.effective_status.label(),
                entry.phase.label(),
                entry.health_score,
                entry.efficiency_score,
                entry.completion_percentage,
                entry.payment_rate
            );
        }
    }

    render_suggestions(&portfolio.suggestions);
}

fn render_rankings(rankings: &[RankedProgram], category: Option<&str>, now: NaiveDateTime) {
    match category {
        Some(category) => println!("Top programs in '{}' (evaluated {})", category, now),
        None => println!("Top programs (evaluated {})", now),
    }

    if rankings.is_empty() {
        println!("\nNo programs to rank.");
        return;
    }

    println!();
    for (position, entry) in rankings.iter().enumerate() {
        let badges = if entry.badges.is_empty() {
            String::new()
        } else {
            let labels: Vec<&str> = entry.badges.iter().map(|badge| badge.label()).collect();
            format!(" [{}]", labels.join(", "))
        };
        println!(
            "{}. {} ({}) score {:.1}{}",
            position + 1,
            entry.program.name,
            entry.effective_status.label(),
            entry.overall_score,
            badges
        );
        println!(
            "   {} beneficiaries, {}% enrolled, {}% paid, growth {:+.0}%",
            entry.metrics.total_beneficiaries,
            entry.metrics.completion_rate,
            entry.metrics.payment_rate,
            entry.metrics.growth_rate
        );
    }
}

fn render_suggestions(suggestions: &[Suggestion]) {
    println!("\nSuggestions");
    for suggestion in suggestions {
        println!(
            "- [{}] {}: {} -> {}",
            suggestion.kind.label(),
            suggestion.title,
            suggestion.message,
            suggestion.action
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aid_analytics::programs::EffectiveStatus;

    fn snapshot() -> RecordsSnapshot {
        let data = include_bytes!("../crates/aid-analytics/fixtures/records.json");
        RecordsSnapshot::from_json_reader(&data[..]).expect("fixture loads")
    }

    fn evaluated_at() -> NaiveDateTime {
        parse_now("2024-02-20").expect("valid date")
    }

    #[test]
    fn parse_now_accepts_dates_and_timestamps() {
        assert_eq!(
            parse_now("2024-02-20").expect("date"),
            NaiveDate::from_ymd_opt(2024, 2, 20)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .expect("valid")
        );
        assert_eq!(
            parse_now("2024-02-20T10:00:00+02:00").expect("timestamp"),
            NaiveDate::from_ymd_opt(2024, 2, 20)
                .and_then(|date| date.and_hms_opt(8, 0, 0))
                .expect("valid")
        );
        assert!(parse_now("last week").is_err());
    }

    #[test]
    fn cli_parses_rankings_flags() {
        let cli = Cli::try_parse_from([
            "aid-dashboard",
            "rankings",
            "--category",
            "food",
            "--top",
            "5",
            "--snapshot",
            "records.json",
            "--now",
            "2024-02-20",
            "--json",
        ])
        .expect("arguments parse");

        match cli.command {
            Command::Rankings(args) => {
                assert_eq!(args.category.as_deref(), Some("food"));
                assert_eq!(args.top, Some(5));
                assert_eq!(args.source.snapshot, Some(PathBuf::from("records.json")));
                assert_eq!(args.source.now, Some(evaluated_at()));
                assert!(args.source.json);
            }
            other => panic!("expected rankings command, got {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_zero_leaderboard() {
        assert!(Cli::try_parse_from(["aid-dashboard", "rankings", "--top", "0"]).is_err());
    }

    #[test]
    fn program_overview_reports_unknown_ids() {
        let error = program_overview(&snapshot(), "missing", evaluated_at())
            .expect_err("unknown program");

        assert!(matches!(error, AppError::ProgramNotFound(id) if id == "missing"));
    }

    #[test]
    fn program_overview_uses_enrolled_beneficiaries() {
        let overview =
            program_overview(&snapshot(), "rice-2024", evaluated_at()).expect("program found");

        assert_eq!(overview.metrics.total, 4);
        assert_eq!(overview.effective_status, EffectiveStatus::Complete);
    }

    #[test]
    fn leaderboard_is_truncated_to_top_n() {
        let ranked = leaderboard(&snapshot(), None, 2, evaluated_at());

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].program.name, "Rice Subsidy");
    }

    #[test]
    fn rankings_response_serializes_with_evaluation_time() {
        let ranked = leaderboard(&snapshot(), Some("food"), 3, evaluated_at());
        let body = serde_json::to_value(RankingsResponse {
            evaluated_at: evaluated_at(),
            category: Some("food"),
            rankings: &ranked,
        })
        .expect("serializes");

        assert_eq!(body["category"], "food");
        assert_eq!(body["rankings"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["rankings"][0]["badges"][0], "top-rated");
    }
}
