//! Pagination-driven harvesting loop.
//!
//! The loop owns the page cursor and is the only place that recovers from
//! failures. A cycle fetches the page at the cursor, normalizes it, writes
//! every record to the sink, advances the cursor and waits the configured
//! delay. A failed cycle waits the backoff duration and retries the same
//! page, forever. Only the upstream `error` marker or cancellation stop it.

use crate::error::{NormalizeError, SinkError, SourceError};
use crate::normalize;
use crate::scrapers::{ListingsSource, SearchParams};
use crate::sink::RecordSink;
use chrono::Utc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestState {
    Running,
    Backoff,
    Stopped(StopReason),
}

/// Why the loop stopped. Neither is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The upstream answered with its `error` marker
    EndOfResults,
    /// Cancellation was requested
    Interrupted,
}

/// Failure of one cycle. Everything but `Sink` is retried after a backoff.
#[derive(Debug, thiserror::Error)]
enum CycleError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

enum CycleOutcome {
    Exhausted,
    Written(usize),
}

/// Counters reported when the run ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestSummary {
    pub reason: StopReason,
    /// Pages fully processed
    pub pages: u32,
    pub records: usize,
    /// Failed cycles (each one followed by a backoff)
    pub failures: u32,
    /// Cursor value when the loop stopped: the next page that would be requested
    pub next_page: u32,
}

pub struct Harvester<S> {
    source: S,
    params: SearchParams,
    cancel: CancellationToken,
}

impl<S: ListingsSource> Harvester<S> {
    pub fn new(source: S, params: SearchParams, cancel: CancellationToken) -> Self {
        Self {
            source,
            params,
            cancel,
        }
    }

    /// Drive pagination until end of results or cancellation, then close the sink.
    ///
    /// Sink failures are fatal: the sink is dropped (not closed) and the error returned.
    pub async fn run(&self, mut sink: Box<dyn RecordSink>) -> Result<HarvestSummary, SinkError> {
        let mut cursor = self.params.start_page;
        let mut pages = 0u32;
        let mut records = 0usize;
        let mut failures = 0u32;
        let mut state = HarvestState::Running;

        info!(
            source = self.source.source_name(),
            rgid = self.params.region_id,
            kind = %self.params.transaction,
            category = %self.params.category,
            start_page = cursor,
            "Starting harvest"
        );

        let reason = loop {
            state = match state {
                HarvestState::Stopped(reason) => break reason,
                _ if self.cancel.is_cancelled() => HarvestState::Stopped(StopReason::Interrupted),
                HarvestState::Running => {
                    info!(page = cursor, "Processing page");

                    match self.cycle(cursor, sink.as_mut()).await {
                        Ok(CycleOutcome::Exhausted) => {
                            info!(page = cursor, "Upstream reported end of results");
                            HarvestState::Stopped(StopReason::EndOfResults)
                        }
                        Ok(CycleOutcome::Written(written)) => {
                            debug!(page = cursor, records = written, "Page written");
                            pages += 1;
                            records += written;
                            match cursor.checked_add(1) {
                                Some(next) => {
                                    cursor = next;
                                    self.pause(self.params.delay, HarvestState::Running).await
                                }
                                None => {
                                    warn!(page = cursor, "Page counter exhausted, stopping");
                                    HarvestState::Stopped(StopReason::EndOfResults)
                                }
                            }
                        }
                        Err(CycleError::Sink(e)) => {
                            error!(page = cursor, error = %e, "Failed to write records, aborting");
                            return Err(e);
                        }
                        Err(e) => {
                            failures += 1;
                            error!(page = cursor, error = %e, "Cycle failed");
                            HarvestState::Backoff
                        }
                    }
                }
                HarvestState::Backoff => {
                    warn!(
                        page = cursor,
                        failures,
                        backoff_secs = self.params.backoff.as_secs_f64(),
                        "Unknown failure, waiting before retrying the same page"
                    );
                    self.pause(self.params.backoff, HarvestState::Running).await
                }
            };
        };

        if reason == StopReason::Interrupted {
            info!(page = cursor, "Finishing...");
        }

        sink.close()?;

        let summary = HarvestSummary {
            reason,
            pages,
            records,
            failures,
            next_page: cursor,
        };
        info!(?summary, "Done");
        Ok(summary)
    }

    /// One fetch → normalize → write pass for `page`
    async fn cycle(
        &self,
        page: u32,
        sink: &mut dyn RecordSink,
    ) -> Result<CycleOutcome, CycleError> {
        let raw = self.source.fetch(&self.params, page).await?;

        if raw.is_exhausted() {
            return Ok(CycleOutcome::Exhausted);
        }

        // One stamp per page
        let harvested_at = Utc::now();
        let mut written = 0;
        for record in normalize::normalize(&raw, harvested_at)? {
            sink.write(&record)?;
            written += 1;
        }

        Ok(CycleOutcome::Written(written))
    }

    /// Sleep for `duration` unless cancelled first
    async fn pause(&self, duration: Duration, next: HarvestState) -> HarvestState {
        tokio::select! {
            _ = self.cancel.cancelled() => HarvestState::Stopped(StopReason::Interrupted),
            _ = tokio::time::sleep(duration) => next,
        }
    }
}
