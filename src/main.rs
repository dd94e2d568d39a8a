use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use release_issues::config::{AppConfig, DEFAULT_RECORDS_FILE, DEFAULT_SORTED_FILE, log_path};
use release_issues::pipeline::{Pipeline, RunOptions};

#[derive(Parser)]
#[command(name = "release-issues")]
#[command(
    version,
    about = "Collect known and resolved issues from FortiOS release notes"
)]
struct Cli {
    /// FortiOS version(s) to collect, e.g. -r 7.0.12 -r 7.2.5
    #[arg(short = 'r', long = "release", value_name = "VERSION")]
    releases: Vec<String>,

    /// File the collected records are appended to
    #[arg(long, default_value = DEFAULT_RECORDS_FILE)]
    records_file: PathBuf,

    /// Resolve the collected records to one entry per bug
    #[arg(long)]
    sorted: bool,

    /// File the resolved records are written to
    #[arg(long, default_value = DEFAULT_SORTED_FILE)]
    sorted_file: PathBuf,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to a file instead of stderr (defaults to the data directory)
    #[arg(long, value_name = "PATH")]
    log_file: Option<Option<PathBuf>>,
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (writer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("log file {:?} has no file name", path))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {:?}", dir))?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name))
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(log_file.is_none())
        .init();

    Ok(guard)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_file = cli.log_file.map(|path| path.unwrap_or_else(log_path));
    let _guard = init_logging(log_file.as_deref())?;

    let config = AppConfig::load(cli.config.as_deref())?;

    if cli.releases.is_empty() && !cli.sorted {
        warn!("Nothing to do: pass --release VERSION and/or --sorted");
        return Ok(());
    }

    let options = RunOptions {
        versions: cli.releases,
        records_file: cli.records_file,
        sorted: cli.sorted,
        sorted_file: cli.sorted_file,
    };

    let pipeline = Pipeline::from_config(&config)?;
    let summary = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(pipeline.run(&options))?;

    info!(
        "Appended {} records to {:?}",
        summary.appended, options.records_file
    );
    if let Some(canonical) = summary.canonical {
        info!(
            "Wrote {} resolved records to {:?}",
            canonical, options.sorted_file
        );
    }

    Ok(())
}
