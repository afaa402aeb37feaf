use clap::Parser;
use std::path::PathBuf;
use std::process;
use studymap::Command;
use studymap::config::resolve_data_path;
use studymap_core::{Calendar, CoreResult, Workspace};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Studymap - track study projects on an activity heatmap
#[derive(Parser)]
#[command(name = "smap")]
#[command(version = "0.1.0")]
#[command(about = "Track study projects on an activity heatmap", long_about = None)]
struct Args {
    /// Path to the data file (can also be set via SMAP_DATA_PATH env var)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Command>,
}

/// Initialize logging from `RUST_LOG`, defaulting to warnings only.
///
/// Examples:
/// - `RUST_LOG=trace` - include per-project cell aggregation
/// - `RUST_LOG=debug` - include workspace mutations and heatmap layout
/// - `RUST_LOG=studymap_core=debug` - core crate only
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}

fn main() {
    init_logging();

    if let Err(e) = run_app() {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

/// Main application logic - separated for testability
fn run_app() -> CoreResult<()> {
    let args = Args::parse();
    let output = run_with_args(&args, &Calendar::local())?;
    println!("{}", output);
    Ok(())
}

/// Run the application with the given arguments, returning what to print.
///
/// The data file is only written back when the command changed something.
fn run_with_args<Tz: chrono::TimeZone>(args: &Args, calendar: &Calendar<Tz>) -> CoreResult<String> {
    let Some(command) = &args.command else {
        return Ok("Welcome to Studymap!\nUse 'smap --help' for usage information.".to_string());
    };

    let data_path = resolve_data_path(args.data.clone())?;
    debug!("Using data file {}", data_path.display());

    let mut workspace = Workspace::load(&data_path)?;
    let output = command.execute(&mut workspace, calendar)?;

    if command.modifies_workspace() {
        workspace.save(&data_path)?;
    }

    Ok(output)
}
