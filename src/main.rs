mod cli;
mod error;
mod harvest;
mod models;
mod normalize;
mod scrapers;
mod sink;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use harvest::{Harvester, StopReason};
use scrapers::RealtySource;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let params = cli.search_params()?;
    let source = RealtySource::new(cli.source_config()?)?;

    info!("🏠 Realty Harvester");
    info!(
        output = %cli.output_file.display(),
        format = ?cli.output_format(),
        "Opening output"
    );

    let sink = sink::open(&cli.output_file, cli.output_format())
        .with_context(|| format!("Failed to open {}", cli.output_file.display()))?;

    let cancel = CancellationToken::new();
    tokio::spawn(watch_interrupts(cancel.clone(), tokio::signal::ctrl_c, || {
        std::process::exit(130)
    }));

    let summary = Harvester::new(source, params, cancel)
        .run(sink)
        .await
        .context("Harvest aborted")?;

    match summary.reason {
        StopReason::EndOfResults => info!(
            "✅ Reached end of results: {} records from {} pages",
            summary.records, summary.pages
        ),
        StopReason::Interrupted => info!(
            "Interrupted: {} records from {} pages, resume with --page-number {}",
            summary.records, summary.pages, summary.next_page
        ),
    }

    Ok(())
}

/// First interrupt cancels the harvest cooperatively; a second one calls `force_exit`.
async fn watch_interrupts<S, Fut, X>(cancel: CancellationToken, mut interrupt: S, force_exit: X)
where
    S: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
    X: FnOnce(),
{
    if interrupt().await.is_err() {
        return;
    }
    warn!("Received interrupt, finishing after the current page (press Ctrl-C again to exit now)");
    cancel.cancel();

    if interrupt().await.is_ok() {
        warn!("Received second interrupt, exiting immediately");
        force_exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn first_interrupt_cancels_second_forces_exit() {
        let notify = Arc::new(Notify::new());
        let cancel = CancellationToken::new();
        let exited = Arc::new(AtomicBool::new(false));

        let presses = notify.clone();
        let flag = exited.clone();
        let watcher = tokio::spawn(watch_interrupts(
            cancel.clone(),
            move || {
                let presses = presses.clone();
                async move {
                    presses.notified().await;
                    Ok::<(), std::io::Error>(())
                }
            },
            move || flag.store(true, Ordering::SeqCst),
        ));

        notify.notify_one();
        cancel.cancelled().await;
        assert!(!exited.load(Ordering::SeqCst));

        notify.notify_one();
        watcher.await.unwrap();
        assert!(exited.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn failed_signal_registration_neither_cancels_nor_exits() {
        let cancel = CancellationToken::new();
        let exited = Arc::new(AtomicBool::new(false));
        let flag = exited.clone();

        watch_interrupts(
            cancel.clone(),
            || async {
                Err::<(), _>(std::io::Error::new(std::io::ErrorKind::Other, "no signal handler"))
            },
            move || flag.store(true, Ordering::SeqCst),
        )
        .await;

        assert!(!cancel.is_cancelled());
        assert!(!exited.load(Ordering::SeqCst));
    }
}
