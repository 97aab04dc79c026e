//! booking-dashboard
//!
//! Console dashboard over `Appointments.csv`: filters, key metrics, charts
//! and a CSV download of the filtered view.

use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use booking_dashboard::charts::Charts;
use booking_dashboard::constants;
use booking_dashboard::data::load_appointments;
use booking_dashboard::filters::{FilterOptions, FilterSelection, FilterSummary, apply_filters};
use booking_dashboard::metrics::KeyMetrics;
use booking_dashboard::refresh::{self, CollectorCommand};
use booking_dashboard::session::Session;
use booking_dashboard::{config, export, render};
use shared::constants::APPOINTMENTS_FILENAME;

#[derive(Parser, Debug)]
#[command(name = "booking-dashboard")]
#[command(about = "Filtered metrics and charts over the collected booking appointments")]
struct Args {
    /// Dashboard username
    #[arg(short, long)]
    username: String,

    /// Dashboard password (prefer the DASHBOARD_LOGIN_PASSWORD variable)
    #[arg(short, long, env = constants::ENV_LOGIN_PASSWORD, hide_env_values = true)]
    password: String,

    /// Credentials file (falls back to DASHBOARD_* environment variables)
    #[arg(long, default_value = constants::CONFIG_FILE)]
    config: PathBuf,

    /// Appointments file written by the collector
    #[arg(long, default_value = APPOINTMENTS_FILENAME)]
    data: PathBuf,

    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Status to include (repeatable)
    #[arg(long = "status", value_name = "STATUS")]
    statuses: Vec<String>,

    /// Service to include (repeatable)
    #[arg(long = "service", value_name = "SERVICE")]
    services: Vec<String>,

    /// Dance role to include (repeatable)
    #[arg(long = "role", value_name = "ROLE")]
    roles: Vec<String>,

    /// Country to include (repeatable)
    #[arg(long = "country", value_name = "COUNTRY")]
    countries: Vec<String>,

    /// Lowest price to include (€)
    #[arg(long)]
    min_price: Option<f64>,

    /// Highest price to include (€)
    #[arg(long)]
    max_price: Option<f64>,

    /// Run the collector first to fetch the latest data
    #[arg(long)]
    refresh: bool,

    /// Collector executable (default: booking-collector next to this binary, else on PATH)
    #[arg(long)]
    collector: Option<PathBuf>,

    /// Write the filtered view as a timestamped CSV into this directory
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,

    /// List the available filter values and exit
    #[arg(long)]
    options: bool,

    /// Rows shown in the table preview
    #[arg(long, default_value_t = constants::DEFAULT_PREVIEW_ROWS)]
    rows: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn selection(&self) -> FilterSelection {
        FilterSelection {
            date_from: self.from,
            date_to: self.to,
            statuses: self.statuses.clone(),
            services: self.services.clone(),
            roles: self.roles.clone(),
            countries: self.countries.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }
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

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let credentials = match config::load(&args.config) {
        Ok(credentials) => credentials,
        Err(e) => bail!("❌ {}\n\n{}", e, e.guidance()),
    };

    let session = match Session::login(&credentials, &args.username, &args.password) {
        Ok(session) => session,
        Err(e) => bail!("❌ {}", e),
    };
    println!(
        "✅ Logged in as {} at {}",
        session.username(),
        session.started().format("%H:%M:%S")
    );

    let result = run(&args).await;
    session.logout();
    result
}

async fn run(args: &Args) -> Result<()> {
    println!("\n💃 Appointments Dashboard");
    println!("=============================================");

    if args.refresh {
        refresh_data(args).await;
    }

    let dataset = match load_appointments(&args.data) {
        Ok(dataset) => dataset,
        Err(e) => bail!("❌ {}\n\n{}", e, e.guidance()),
    };
    render::file_info(&dataset);

    if args.options {
        render::filter_options(&FilterOptions::from_frame(&dataset.frame));
        return Ok(());
    }

    let filtered = apply_filters(&dataset.frame, &args.selection());
    render::filter_summary(&FilterSummary::new(&filtered, &dataset.frame));

    if filtered.is_empty() {
        println!("\n⚠️  No data available with current filters. Try adjusting your filters.");
        return Ok(());
    }

    render::key_metrics(&KeyMetrics::compute(&filtered));
    render::charts(&Charts::build(&filtered));
    render::preview(&filtered, args.rows);

    if let Some(dir) = &args.export {
        let path = export::export_csv(&filtered, dir, Local::now())?;
        println!("\n📥 Saved {} appointments to {}", filtered.len(), path.display());
    }

    Ok(())
}

/// Run the collector; on failure keep going with the existing file
async fn refresh_data(args: &Args) {
    let collector = match &args.collector {
        Some(program) => CollectorCommand::new(program),
        None => CollectorCommand::locate(),
    };

    println!("\n🔄 Running collector to fetch latest data...");
    let timeout = Duration::from_secs(constants::REFRESH_TIMEOUT_SECS);
    match refresh::refresh(&collector, &args.data, timeout).await {
        Ok(report) => {
            println!("✅ Data refreshed successfully!");
            println!("📊 New data contains {} appointments", report.record_count);
        }
        Err(e) => {
            println!("❌ {}", e);
            println!("⚠️  Continuing with the previous data");
        }
    }
}
