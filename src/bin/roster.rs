use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Duration, Utc};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use u_roster::config::EventConfig;
use u_roster::error::{ConfigError, SnapshotError};
use u_roster::models::{ExperienceLevel, Member, Role, RosterSnapshot, Shift, ShiftPriority};
use u_roster::optimizer::{RosterKpi, RosterOptimizer, RosterReport};

const DEMO_ALIASES: [&str; 12] = [
    "Eagle", "Hawk", "Lion", "Tiger", "Otter", "Bunny", "Fawn", "Robin", "Finch", "Kitten",
    "Badger", "Heron",
];
const DEMO_GROUPS: [&str; 2] = ["FLINTA", "M_NB"];
const DEMO_MAX_PREFERENCES: usize = 5;
/// 2026-06-25, in days since the Unix epoch.
const DEMO_BUILD_UP_DAY: i64 = 20_629;

#[derive(Parser, Debug)]
#[command(
    name = "u-roster",
    about = "Build event shift rosters from a member and shift snapshot",
    version
)]
struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a snapshot, run the optimizer and print the roster as JSON
    Run(RunArgs),
    /// Generate a synthetic festival snapshot and roster it
    Demo(DemoArgs),
    /// Check a snapshot for integrity problems
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Snapshot JSON file
    #[arg(long)]
    snapshot: PathBuf,
    /// Event configuration TOML file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Include coverage KPIs in the report
    #[arg(long)]
    kpi: bool,
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Number of generated members
    #[arg(long, default_value_t = 12)]
    members: usize,
    /// RNG seed; the same seed yields the same snapshot
    #[arg(long, default_value_t = 2026)]
    seed: u64,
    /// Include coverage KPIs in the report
    #[arg(long)]
    kpi: bool,
    /// Print the generated snapshot instead of rostering it
    #[arg(long)]
    snapshot_only: bool,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Snapshot JSON file
    #[arg(long)]
    snapshot: PathBuf,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid log level/filter '{value}': {source}")]
    LogFilter {
        value: String,
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("telemetry error: {0}")]
    Subscriber(String),

    #[error("snapshot failed validation with {0} error(s)")]
    Invalid(usize),
}

#[derive(Serialize)]
struct CliReport<'a> {
    event_id: &'a str,
    #[serde(flatten)]
    roster: RosterReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    kpi: Option<RosterKpi>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_tracing(&cli.log_level) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    match dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(log_level: &str) -> Result<(), CliError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level).map_err(|source| CliError::LogFilter {
            value: log_level.to_string(),
            source,
        })?,
    };

    // stdout carries the JSON report
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| CliError::Subscriber(err.to_string()))
}

fn dispatch(command: Command) -> Result<(), CliError> {
    match command {
        Command::Run(args) => run(args),
        Command::Demo(args) => demo(args),
        Command::Validate(args) => validate(args),
    }
}

fn run(args: RunArgs) -> Result<(), CliError> {
    let snapshot = RosterSnapshot::load(&args.snapshot)?;
    let config = match &args.config {
        Some(path) => EventConfig::load(path)?,
        None => EventConfig::default(),
    };
    check(&snapshot)?;
    roster(&snapshot, config, args.kpi)
}

fn demo(args: DemoArgs) -> Result<(), CliError> {
    let snapshot = demo_snapshot(args.members, args.seed);
    info!(
        members = snapshot.members.len(),
        shifts = snapshot.shifts.len(),
        seed = args.seed,
        "demo snapshot generated"
    );

    if args.snapshot_only {
        println!("{}", snapshot.to_json_pretty()?);
        return Ok(());
    }
    roster(&snapshot, EventConfig::default(), args.kpi)
}

fn validate(args: ValidateArgs) -> Result<(), CliError> {
    let snapshot = RosterSnapshot::load(&args.snapshot)?;
    check(&snapshot)?;
    println!(
        "ok: {} members, {} shifts",
        snapshot.members.len(),
        snapshot.shifts.len()
    );
    Ok(())
}

fn check(snapshot: &RosterSnapshot) -> Result<(), CliError> {
    if let Err(errors) = snapshot.validate() {
        for e in &errors {
            eprintln!("invalid: {e}");
        }
        return Err(CliError::Invalid(errors.len()));
    }
    Ok(())
}

fn roster(snapshot: &RosterSnapshot, config: EventConfig, with_kpi: bool) -> Result<(), CliError> {
    let optimizer = RosterOptimizer::new(config);
    let outcome = optimizer.run_snapshot(snapshot);
    let kpi = with_kpi.then(|| {
        RosterKpi::calculate(&outcome, &snapshot.members, &snapshot.shifts, optimizer.config())
    });

    let report = CliReport {
        event_id: &snapshot.event_id,
        roster: outcome.to_report(),
        kpi,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Three festival days plus a buffer build-up evening.
fn demo_shifts() -> Vec<Shift> {
    let build_up = festival_day(25);
    let mut shifts = vec![Shift::new(
        "buffer_d25_setup",
        build_up + Duration::hours(18),
        build_up + Duration::hours(24),
    )
    .with_priority(ShiftPriority::Buffer)
    .with_role(Role::TeamMember, 2)];

    for day in 26..=28 {
        let base = festival_day(day);
        shifts.push(
            Shift::new(
                format!("core_d{day}_morning"),
                base + Duration::hours(8),
                base + Duration::hours(14),
            )
            .with_desirability(4)
            .with_role(Role::ShiftLead, 1)
            .with_role(Role::TeamMember, 1),
        );
        shifts.push(
            Shift::new(
                format!("core_d{day}_day"),
                base + Duration::hours(14),
                base + Duration::hours(20),
            )
            .with_desirability(2)
            .with_role(Role::TeamMember, 2),
        );
        shifts.push(
            Shift::new(
                format!("core_d{day}_night"),
                base + Duration::hours(22),
                base + Duration::hours(28),
            )
            .with_desirability(1)
            .with_role(Role::TeamMember, 2),
        );
    }

    let exec = festival_day(27);
    shifts.push(
        Shift::new("core_d27_executive", exec + Duration::hours(8), exec + Duration::hours(20))
            .with_capacity(1)
            .with_role(Role::Executive, 1),
    );
    shifts
}

/// Midnight UTC of a June 2026 day.
fn festival_day(day: u32) -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::days(DEMO_BUILD_UP_DAY + i64::from(day) - 25)
}

/// Builds a reproducible snapshot: tiers and groups cycle, preferences
/// are random.
fn demo_snapshot(member_count: usize, seed: u64) -> RosterSnapshot {
    let mut rng = StdRng::seed_from_u64(seed);
    let shifts = demo_shifts();
    let mut shift_ids: Vec<&str> = shifts.iter().map(|s| s.id.as_str()).collect();

    let members = (0..member_count)
        .map(|i| {
            let alias = DEMO_ALIASES[i % DEMO_ALIASES.len()];
            let round = i / DEMO_ALIASES.len();
            let name = if round == 0 {
                alias.to_string()
            } else {
                format!("{alias} {}", round + 1)
            };

            let mut member = Member::new(
                format!("member_{i:03}"),
                ExperienceLevel::ALL[i % ExperienceLevel::ALL.len()],
                DEMO_GROUPS[i % DEMO_GROUPS.len()],
            )
            .with_name(name);

            shift_ids.shuffle(&mut rng);
            let wanted = rng.random_range(0..=DEMO_MAX_PREFERENCES);
            for (rank, id) in shift_ids.iter().take(wanted).enumerate() {
                member = member.with_preference(*id, rank as u32 + 1);
            }
            member
        })
        .collect();

    RosterSnapshot::new("starlight_2026", members, shifts)
}
