//! `mesh-meeting` CLI — schedule Mesh Meetings from a YAML availability file.
//!
//! ## Usage
//!
//! ```sh
//! # Schedule the upcoming week and write one .ics per meeting into ./output
//! mesh-meeting schedule.yaml output
//!
//! # A specific week (any date in it), conflict-free, 30-minute meetings
//! mesh-meeting --week-of 2026-10-14 --policy conflict-free --meeting-slots 2 schedule.yaml output
//!
//! # Preview without writing files
//! mesh-meeting --dry-run schedule.yaml output
//! ```
//!
//! `schedule.yaml` maps each participant's email to a name and availability:
//!
//! ```yaml
//! john.doe@example.com:
//!   name: John Doe
//!   availability:
//!     - Monday 9:00am-11:00am
//!     - Tuesday 10:00am-12:00pm
//! ```

mod ics;
mod input;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use mesh_engine::{build_invites, plan_meetings, MeshConfig, SelectionPolicy, WindowPlacement};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mesh-meeting",
    version,
    about = "Schedule Mesh Meetings from declared weekly availability"
)]
struct Cli {
    /// YAML file mapping participant emails to name and availability
    schedule: PathBuf,

    /// Directory to write one .ics invite per meeting into
    output: PathBuf,

    /// TOML file with grid and scheduling settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Any date in the target week (YYYY-MM-DD); overrides --relative-week
    #[arg(long, value_name = "DATE")]
    week_of: Option<NaiveDate>,

    /// Weeks relative to the upcoming Monday
    #[arg(long, value_name = "N", default_value_t = 0, allow_hyphen_values = true)]
    relative_week: i64,

    /// Meeting selection policy
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Candidate placement within a shared block
    #[arg(long, value_enum)]
    placement: Option<PlacementArg>,

    /// Meeting length in slots
    #[arg(long)]
    meeting_slots: Option<u32>,

    /// Slot granularity in minutes
    #[arg(long)]
    slot_minutes: Option<u32>,

    /// Maximum meetings per participant
    #[arg(long)]
    max_per_person: Option<usize>,

    /// Print the plan without writing files
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Exhaustive,
    ConflictFree,
}

impl From<PolicyArg> for SelectionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Exhaustive => SelectionPolicy::Exhaustive,
            PolicyArg::ConflictFree => SelectionPolicy::ConflictFree,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PlacementArg {
    FirstFit,
    Tiled,
}

impl From<PlacementArg> for WindowPlacement {
    fn from(arg: PlacementArg) -> Self {
        match arg {
            PlacementArg::FirstFit => WindowPlacement::FirstFit,
            PlacementArg::Tiled => WindowPlacement::Tiled,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;
    let declarations = input::read_declarations(&cli.schedule)?;
    info!(participants = declarations.len(), "loaded schedule");

    let meetings = plan_meetings(&config, &declarations).context("Failed to schedule meetings")?;

    let week = match cli.week_of {
        Some(date) => mesh_engine::week::monday_of(date),
        None => mesh_engine::week::upcoming_monday(Local::now().date_naive(), cli.relative_week),
    };
    let invites = build_invites(&meetings, week);

    println!("Week of {}", week);
    println!("=== Mesh Meetings™ ===");
    for invite in &invites {
        println!(
            "{} - {}  {} <{}> / {} <{}>",
            invite.start.format("%a %Y-%m-%d %H:%M"),
            invite.end.format("%H:%M"),
            invite.attendees[0].name,
            invite.attendees[0].identity,
            invite.attendees[1].name,
            invite.attendees[1].identity,
        );
    }
    println!("{} meeting(s)", invites.len());

    if cli.dry_run {
        return Ok(());
    }

    let written = ics::write_invites(&cli.output, &invites)?;
    info!(files = written.len(), dir = %cli.output.display(), "wrote invites");
    Ok(())
}

/// Defaults, then the config file, then command-line overrides.
fn build_config(cli: &Cli) -> Result<MeshConfig> {
    let mut config = match &cli.config {
        Some(path) => input::read_config(path)?,
        None => MeshConfig::default(),
    };

    if let Some(policy) = cli.policy {
        config.policy = policy.into();
    }
    if let Some(placement) = cli.placement {
        config.placement = placement.into();
    }
    if let Some(slots) = cli.meeting_slots {
        config.meeting_slots = slots;
    }
    if let Some(minutes) = cli.slot_minutes {
        config.slot_minutes = minutes;
    }
    if let Some(cap) = cli.max_per_person {
        config.max_meetings_per_person = Some(cap);
    }

    config.validate().context("Invalid scheduling configuration")?;
    Ok(config)
}
