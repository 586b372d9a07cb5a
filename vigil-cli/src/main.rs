mod catalog;
mod display;
mod error;

use std::{io, path::PathBuf, process, sync::Arc, time::Duration};

use clap::Parser;
use colored::Colorize;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{Level, error, info, warn};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};
use vigil_engine::{DEFAULT_MAX_FREQUENCY_HZ, Orchestrator, ProbeConfig};

use crate::{
    display::Renderer,
    error::{CliError, Result},
};

#[derive(Parser, Debug)]
#[command(
    name = "vigil",
    version,
    about = "Concurrent HTTP prober with a live per-target stats board"
)]
struct Args {
    /// Target URLs to probe, given directly on the command line.
    #[arg(value_name = "URL")]
    urls: Vec<String>,

    /// File listing one target per line: a URL, optionally followed
    /// by a URL template with {year}/{month}/{day}/{number}/{text} slots.
    #[arg(short = 'f', long, value_name = "FILE")]
    targets_file: Option<PathBuf>,

    /// Upper bound on each target's request rate, in requests per second.
    #[arg(long, default_value_t = DEFAULT_MAX_FREQUENCY_HZ, value_name = "HZ")]
    max_frequency: f64,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 2.0, value_name = "SECONDS")]
    timeout: f64,

    /// Stats board refresh period in milliseconds.
    #[arg(long, default_value_t = 500, value_name = "MILLIS")]
    refresh: u64,

    /// Log stats lines instead of redrawing the board in place.
    #[arg(long)]
    plain: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("Application error: {e}");
        eprintln!("{} {e}", "Error:".red().bold());
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    init_logging(args.verbose, args.quiet)?;

    let timeout = request_timeout(args.timeout)?;
    let catalog = catalog::load(&args.urls, args.targets_file.as_deref(), args.max_frequency)?;
    let config = ProbeConfig::default().with_request_timeout(timeout);
    let orchestrator = Arc::new(Orchestrator::new(catalog, &config)?);
    info!(
        targets = orchestrator.target_count(),
        max_frequency = args.max_frequency,
        "starting probes"
    );

    let token = CancellationToken::new();

    let engine = tokio::spawn({
        let orchestrator = orchestrator.clone();
        let token = token.clone();
        async move { orchestrator.run(token).await }
    });

    tokio::spawn({
        let token = token.clone();
        async move {
            wait_for_interrupt().await;
            info!("interrupt received, shutting down");
            token.cancel();
        }
    });

    let mut renderer = Renderer::new(args.plain);
    // an interval of zero panics, and anything shorter just burns cycles
    let mut ticker = tokio::time::interval(Duration::from_millis(args.refresh.max(50)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => renderer.render(&orchestrator.snapshot())?,
        }
    }

    let _ = engine.await;

    renderer.render(&orchestrator.snapshot())?;
    info!("shutdown complete");
    Ok(())
}

/// Validates `--timeout`, covering values whose conversion to a
/// [`Duration`] would overflow or round down to zero.
fn request_timeout(seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds)
        .ok()
        .filter(|timeout| !timeout.is_zero())
        .ok_or(CliError::InvalidTimeout(seconds))
}

/// Resolves when the process receives ctrl-c or, on unix, SIGTERM.
async fn wait_for_interrupt() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("ctrl-c handler unavailable: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("sigterm handler unavailable: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

fn init_logging(verbose: bool, quiet: bool) -> Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    // stderr so the board keeps stdout to itself
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(verbose)
                .with_writer(io::stderr),
        )
        .init();
    Ok(())
}
