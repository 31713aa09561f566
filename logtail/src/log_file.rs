//! The [`LogFile`] entry point tying readers and the producer to one path.

use std::path::Path;
use std::sync::Arc;

use crate::clock::Clock;
use crate::config::Config;
use crate::error::Result;
use crate::follow::Follower;
use crate::tail::tail;
use crate::writer::Writer;

/// An append-only log file and the operations available on it.
///
/// `LogFile` holds no open handles. Every read session opens its own handle
/// and cursor, so any number of tails and followers can run concurrently
/// with the single writer without coordinating with each other.
///
/// # Example
///
/// ```ignore
/// use logtail::{Config, LogFile};
/// use tokio_util::sync::CancellationToken;
///
/// let log = LogFile::new(Config::default());
///
/// for line in log.tail(10).await? {
///     println!("{line}");
/// }
///
/// let cancel = CancellationToken::new();
/// let mut follower = log.follow().await?;
/// while let Some(line) = follower.next_line(&cancel).await? {
///     println!("{line}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LogFile {
    config: Config,
}

impl LogFile {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.config.log_path
    }

    /// Returns the last `n` complete lines, oldest first.
    ///
    /// See [`tail`](crate::tail) for the exact semantics.
    pub async fn tail(&self, n: usize) -> Result<Vec<String>> {
        tail(&self.config.log_path, n).await
    }

    /// Starts a live follower at the current end of the file.
    pub async fn follow(&self) -> Result<Follower> {
        Follower::open(&self.config.log_path, self.config.poll_interval).await
    }

    /// Creates the periodic producer for this file.
    pub fn writer(&self, clock: Arc<dyn Clock>) -> Writer {
        Writer::new(
            self.config.log_path.clone(),
            self.config.write_interval,
            clock,
        )
    }
}
