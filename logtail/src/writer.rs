//! Periodic record producer.
//!
//! The [`Writer`] stands in for any external process appending to the log:
//! once per interval it opens the file in append mode, writes one
//! newline-terminated timestamp record, and closes the handle again.
//! Failures are logged and counted, and the next tick tries again.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use prometheus_client::metrics::counter::Counter;
use prometheus_client::registry::Registry;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::error::{Error, Result};

/// Appends one timestamp record to the log file per interval.
pub struct Writer {
    path: PathBuf,
    interval: Duration,
    clock: Arc<dyn Clock>,
    records_total: Counter,
    errors_total: Counter,
}

impl Writer {
    pub fn new(path: impl Into<PathBuf>, interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            interval,
            clock,
            records_total: Counter::default(),
            errors_total: Counter::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Registers the writer's counters with a Prometheus registry.
    pub fn register_metrics(&self, registry: &mut Registry) {
        registry.register(
            "logtail_writer_records",
            "Total number of records appended by the writer",
            self.records_total.clone(),
        );
        registry.register(
            "logtail_writer_errors",
            "Total number of failed writer appends",
            self.errors_total.clone(),
        );
    }

    /// Appends a single record stamped with the current time.
    ///
    /// The file is created if absent and the handle is closed before
    /// returning. The record and its newline go out in one write so readers
    /// never observe a line assembled from two producer calls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the file cannot be opened or written.
    pub async fn append_record(&self) -> Result<()> {
        let mut record = self.clock.timestamp();
        record.push('\n');

        let to_error = |source: std::io::Error| Error::Write {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(to_error)?;
        file.write_all(record.as_bytes()).await.map_err(to_error)?;
        file.flush().await.map_err(to_error)?;
        Ok(())
    }

    /// Runs until `cancel` fires, appending one record per interval.
    ///
    /// The first record is written one interval after start.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        tracing::info!(path = %self.path.display(), interval = ?self.interval, "writer started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            match self.append_record().await {
                Ok(()) => {
                    self.records_total.inc();
                }
                Err(err) => {
                    self.errors_total.inc();
                    tracing::error!(error = %err, "writer failed to append record, retrying next interval");
                }
            }
        }
        tracing::info!("writer stopped");
    }
}
