//! HTTP surface for the tailed log.
//!
//! Serves a long-lived line stream per subscriber, a one-shot tail endpoint,
//! Prometheus metrics and health checks. Also hosts the command-line client
//! that prints the backlog and then the live stream.

pub mod client;
pub mod config;
mod error;
pub mod handlers;
mod http;
pub mod metrics;
mod middleware;
pub mod request;
pub mod response;
mod stream;

pub use client::{ClientError, LineSplitter, run_client};
pub use config::{CliArgs, Command, FollowArgs, LogTailServerConfig, ServeArgs};
pub use error::ApiError;
pub use http::{LogTailServer, router};
