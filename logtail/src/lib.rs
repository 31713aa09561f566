//! Logtail - an append-only log file with a live tail.
//!
//! A single producer appends newline-terminated records to a file while any
//! number of readers consume it: one-shot [`tail`] calls return the most
//! recent lines, and [`Follower`]s stream every complete line appended after
//! they start. Readers never share handles or cursors; the file itself is
//! the only coordination point.
//!
//! # Key Concepts
//!
//! - **LogFile**: Entry point bound to one path, handing out tails, followers
//!   and the producer.
//! - **Follower**: A live session positioned at end-of-file when opened. It
//!   emits only complete lines, in append order, and stops promptly when its
//!   cancellation token fires.
//! - **Writer**: The periodic producer appending one timestamp per interval.
//!
//! With the `http-server` feature (on by default), the [`server`] module
//! exposes followers as long-lived HTTP streams.

mod clock;
mod config;
mod counter;
mod error;
mod follow;
mod log_file;
#[cfg(feature = "http-server")]
pub mod server;
mod tail;
mod writer;

pub use clock::{Clock, MockClock, SystemClock, format_timestamp};
pub use config::{Config, DEFAULT_LOG_PATH, DEFAULT_POLL_INTERVAL, DEFAULT_WRITE_INTERVAL};
pub use counter::{COUNT_BUFFER_SIZE, count_lines};
pub use error::{Error, Result};
pub use follow::Follower;
pub use log_file::LogFile;
pub use tail::tail;
pub use writer::Writer;
