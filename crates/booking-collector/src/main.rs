//! booking-collector
//!
//! Exports all appointments from the booking plugin and saves them to
//! `Appointments.csv`. Exit code 0 on success, 1 on any fatal failure.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use booking_collector::config::{self, ConfigSource};
use booking_collector::collector;
use booking_collector::persist::SavedFile;
use booking_collector::{CollectError, Collector, HttpPanel};
use shared::constants::APPOINTMENTS_FILENAME;

#[derive(Parser, Debug)]
#[command(name = "booking-collector")]
#[command(about = "Export booking-plugin appointments from a WordPress admin panel to CSV")]
struct Args {
    /// Config file (falls back to WP_* environment variables when missing)
    #[arg(short, long, default_value = booking_collector::constants::CONFIG_FILE)]
    config: PathBuf,

    /// Where to save the appointments file
    #[arg(short, long, default_value = APPOINTMENTS_FILENAME)]
    output: PathBuf,

    /// Treat a login response without success markers as a failed login
    #[arg(long)]
    strict_login: bool,

    /// Print the run outcome as one JSON line on stdout
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: &Args) -> Result<SavedFile, CollectError> {
    let (config, source) = config::load(&args.config)?;
    match source {
        ConfigSource::File => tracing::info!("using configuration from {}", args.config.display()),
        ConfigSource::Environment => tracing::info!("using configuration from environment variables"),
    }

    let run_budget = config.timeouts.run();
    let panel = HttpPanel::new(&config)?;
    let collector = Collector::new(panel, config.credentials.clone()).strict_login(args.strict_login);

    tokio::time::timeout(run_budget, collector.run(&args.output))
        .await
        .map_err(|_| CollectError::Timeout(run_budget.as_secs()))?
}

fn print_report(saved: &SavedFile) {
    println!("\n✅ Appointments saved");
    println!("=============================================");
    println!("  File:      {}", saved.path.display());
    println!("  Size:      {} bytes", saved.size_bytes);
    println!("  Modified:  {}", saved.modified.format("%Y-%m-%d %H:%M:%S"));
    println!("  Records:   {}", saved.records);
    println!("  Columns:   {}", saved.columns);

    if !saved.preview.is_empty() {
        println!("\nFirst {} rows:", saved.preview.len());
        println!("  {}", saved.preview.headers.join(" | "));
        println!("  {}", "-".repeat(60));
        for row in &saved.preview.rows {
            println!("  {}", row.join(" | "));
        }
    }
}

fn print_failure(error: &CollectError) {
    eprintln!("\n❌ {}", error);
    eprintln!("\n{}", error.remediation());
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = tokio::select! {
        result = run(&args) => result,
        _ = tokio::signal::ctrl_c() => Err(CollectError::Interrupted),
    };
    let outcome = collector::outcome(&result);

    match &result {
        Ok(saved) if !args.json => print_report(saved),
        Err(e) => print_failure(e),
        Ok(_) => {}
    }

    if args.json {
        match serde_json::to_string(&outcome) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::error!("could not serialize outcome: {}", e),
        }
    }

    if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
