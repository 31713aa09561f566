//! Command-line configuration for the server and client.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::{Config, DEFAULT_LOG_PATH};

/// Default path of the streaming endpoint.
pub const DEFAULT_STREAM_PATH: &str = "/stream_logs";

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "logtail")]
#[command(about = "Append-only log writer with a live HTTP tail")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the producer and serve the live stream over HTTP.
    Serve(ServeArgs),
    /// Print the recent backlog, then every line streamed by a server.
    Follow(FollowArgs),
}

/// Arguments for `logtail serve`.
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "LOGTAIL_PORT")]
    pub port: u16,

    /// Path of the log file to append to and stream from
    #[arg(short, long, default_value = DEFAULT_LOG_PATH, env = "LOGTAIL_LOG_PATH")]
    pub log_path: PathBuf,

    /// Route serving the live stream
    #[arg(long, default_value = DEFAULT_STREAM_PATH, env = "LOGTAIL_ENDPOINT")]
    pub endpoint: String,

    /// Delay between read attempts while a stream waits for new lines
    #[arg(long, default_value = "100", env = "LOGTAIL_POLL_INTERVAL_MS")]
    pub poll_interval_ms: u64,

    /// Interval between records appended by the built-in writer
    #[arg(long, default_value = "1000", env = "LOGTAIL_WRITE_INTERVAL_MS")]
    pub write_interval_ms: u64,

    /// Do not run the built-in writer; stream a file produced elsewhere
    #[arg(long, env = "LOGTAIL_NO_WRITER")]
    pub no_writer: bool,
}

impl ServeArgs {
    /// Builds the log file configuration from these arguments.
    pub fn to_log_config(&self) -> Config {
        Config {
            log_path: self.log_path.clone(),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            write_interval: Duration::from_millis(self.write_interval_ms),
        }
    }
}

/// Arguments for `logtail follow`.
#[derive(Args, Debug, Clone)]
pub struct FollowArgs {
    /// URL of the streaming endpoint
    #[arg(
        short,
        long,
        default_value = "http://127.0.0.1:8080/stream_logs",
        env = "LOGTAIL_URL"
    )]
    pub url: String,

    /// Log file read directly for the backlog
    #[arg(short, long, default_value = DEFAULT_LOG_PATH, env = "LOGTAIL_LOG_PATH")]
    pub log_path: PathBuf,

    /// Number of backlog lines printed before streaming
    #[arg(short = 'n', long, default_value = "10")]
    pub lines: usize,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct LogTailServerConfig {
    pub port: u16,
    pub stream_path: String,
    pub writer_enabled: bool,
}

impl Default for LogTailServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            stream_path: DEFAULT_STREAM_PATH.to_string(),
            writer_enabled: true,
        }
    }
}

impl From<&ServeArgs> for LogTailServerConfig {
    fn from(args: &ServeArgs) -> Self {
        Self {
            port: args.port,
            stream_path: args.endpoint.clone(),
            writer_enabled: !args.no_writer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_serve_defaults() {
        // given/when
        let args = CliArgs::parse_from(["logtail", "serve"]);

        // then
        let Command::Serve(serve) = args.command else {
            panic!("expected serve command");
        };
        let config = serve.to_log_config();
        let server = LogTailServerConfig::from(&serve);
        assert_eq!(config.log_path, PathBuf::from("logs.log"));
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(config.write_interval, Duration::from_secs(1));
        assert_eq!(server.port, 8080);
        assert_eq!(server.stream_path, "/stream_logs");
        assert!(server.writer_enabled);
    }

    #[test]
    fn should_parse_serve_overrides() {
        // given/when
        let args = CliArgs::parse_from([
            "logtail",
            "serve",
            "--port",
            "9000",
            "--log-path",
            "/tmp/app.log",
            "--poll-interval-ms",
            "25",
            "--no-writer",
        ]);

        // then
        let Command::Serve(serve) = args.command else {
            panic!("expected serve command");
        };
        assert_eq!(serve.port, 9000);
        assert_eq!(serve.to_log_config().poll_interval, Duration::from_millis(25));
        assert!(!LogTailServerConfig::from(&serve).writer_enabled);
    }

    #[test]
    fn should_parse_follow_args() {
        // given/when
        let args = CliArgs::parse_from(["logtail", "follow", "-n", "5"]);

        // then
        let Command::Follow(follow) = args.command else {
            panic!("expected follow command");
        };
        assert_eq!(follow.lines, 5);
        assert_eq!(follow.url, "http://127.0.0.1:8080/stream_logs");
    }
}
