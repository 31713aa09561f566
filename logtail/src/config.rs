//! Configuration for the tailed log file.

use std::path::PathBuf;
use std::time::Duration;

/// Default location of the log file, relative to the working directory.
pub const DEFAULT_LOG_PATH: &str = "logs.log";

/// Default delay between read attempts while a follower waits for new data.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default cadence of the built-in record producer.
pub const DEFAULT_WRITE_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration for opening a [`LogFile`](crate::LogFile).
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use logtail::{Config, LogFile};
///
/// let log = LogFile::new(Config {
///     log_path: "/var/log/app.log".into(),
///     poll_interval: Duration::from_millis(50),
///     ..Default::default()
/// });
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the append-only log file.
    pub log_path: PathBuf,

    /// How long a follower sleeps after finding no complete line.
    ///
    /// This bounds both the delivery latency of new lines and how quickly
    /// a cancelled follower notices it should stop.
    pub poll_interval: Duration,

    /// How often the built-in [`Writer`](crate::Writer) appends a record.
    pub write_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            poll_interval: DEFAULT_POLL_INTERVAL,
            write_interval: DEFAULT_WRITE_INTERVAL,
        }
    }
}
