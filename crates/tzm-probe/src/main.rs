use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use dotenvy::dotenv;
use tracing::{info, info_span, Instrument};
use tzm_common::db::{create_pool_from_url, DbPoolError, PgTimestampStore};
use tzm_common::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use tzm_common::{run_id, write_matrix_report, FileSink, Mode, ReportError, StoreError, TimestampStore};

const APP_NAME: &str = "tzm-probe";

#[derive(Debug, Clone, Parser)]
#[command(
    name = "tzm-probe",
    about = "Round-trip timestamps through PostgreSQL column types and write a Markdown matrix"
)]
struct Cli {
    /// PostgreSQL connection string (URL or key=value form)
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "host=localhost port=15432 user=postgres password=postgres"
    )]
    database_url: String,

    /// Report file; modern runs recreate it, legacy runs append to it
    #[arg(long, env = "TZM_REPORT_PATH", default_value = "result.md")]
    report_path: PathBuf,

    /// Session TimeZone to set before creating the backing tables
    #[arg(long, env = "TZM_SESSION_TIME_ZONE")]
    session_time_zone: Option<String>,

    /// Any argument here selects legacy mode
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    mode_args: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
enum ProbeError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to open report: {0}")]
    Report(#[source] std::io::Error),
    #[error("database pool error: {0}")]
    DbPool(#[from] DbPoolError),
    #[error("store setup failed: {0}")]
    Store(#[from] StoreError),
    #[error("matrix run failed: {0}")]
    Matrix(#[from] ReportError),
}

#[derive(Debug, Clone, PartialEq)]
struct ProbeConfig {
    database_url: String,
    report_path: PathBuf,
    session_time_zone: Option<String>,
    mode: Mode,
}

impl ProbeConfig {
    fn from_cli(cli: Cli) -> Result<Self, ProbeError> {
        if cli.database_url.trim().is_empty() {
            return Err(ProbeError::Config("DATABASE_URL must not be empty".into()));
        }
        if cli.report_path.as_os_str().is_empty() {
            return Err(ProbeError::Config("TZM_REPORT_PATH must not be empty".into()));
        }

        let session_time_zone = cli
            .session_time_zone
            .map(|zone| zone.trim().to_string())
            .filter(|zone| !zone.is_empty());

        Ok(Self {
            database_url: cli.database_url,
            report_path: cli.report_path,
            session_time_zone,
            mode: Mode::from_invocation(&cli.mode_args),
        })
    }
}

async fn run() -> Result<(), ProbeError> {
    dotenv().ok();
    init_tracing_subscriber(APP_NAME);
    install_tracing_panic_hook(APP_NAME);

    let config = ProbeConfig::from_cli(Cli::parse())?;
    let mode = config.mode;

    let span = info_span!("probe", run_id = run_id::get(), %mode);
    async move {
        let mut sink = FileSink::open(&config.report_path, mode).map_err(ProbeError::Report)?;

        let pool = create_pool_from_url(&config.database_url)?;
        let store = PgTimestampStore::connect(&pool, mode).await?;

        if let Some(zone) = config.session_time_zone.as_deref() {
            store.set_session_time_zone(zone).await?;
        }
        let session_zone = store.session_time_zone().await?;
        info!(session_zone = %session_zone, report = %config.report_path.display(), "connected");

        store.create_tables().await?;

        let report = write_matrix_report(&store, &mut sink, mode, &Local).await?;
        sink.finish().map_err(ReportError::from)?;

        info!(
            rows = report.rows.len(),
            mismatches = report.mismatch_count(),
            failures = report.failure_count(),
            "report written"
        );
        Ok::<(), ProbeError>(())
    }
    .instrument(span)
    .await
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!(error = %err, "tzm-probe failed");
        std::process::exit(1);
    }
}
