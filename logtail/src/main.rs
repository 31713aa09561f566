//! Logtail binary entry point.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use logtail::LogFile;
use logtail::server::{CliArgs, Command, LogTailServer, LogTailServerConfig, run_client};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    match args.command {
        Command::Serve(args) => {
            let log_config = args.to_log_config();
            let server_config = LogTailServerConfig::from(&args);
            tracing::info!("Serving log with config: {:?}", log_config);

            let server = LogTailServer::new(Arc::new(LogFile::new(log_config)), server_config);
            if let Err(e) = server.run().await {
                tracing::error!("Server failed: {}", e);
                std::process::exit(1);
            }
        }
        Command::Follow(args) => {
            tokio::select! {
                result = run_client(&args) => {
                    if let Err(e) = result {
                        tracing::error!("Client failed: {}", e);
                        std::process::exit(1);
                    }
                }
                _ = tokio::signal::ctrl_c() => {}
            }
        }
    }
}
