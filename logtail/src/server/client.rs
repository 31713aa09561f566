//! Command-line client: prints the recent backlog, then the live stream.

use std::io::{self, Write};

use bytes::Bytes;
use futures::{Stream, StreamExt};

use super::config::FollowArgs;
use crate::counter::decode_line;
use crate::tail;

/// Errors that end a client session.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("stream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Connects to the stream, prints the backlog, then prints every streamed
/// line until the server closes the stream.
///
/// The stream is opened before the backlog is read so no line falls in the
/// gap between the two; a line appended in that window may appear twice.
/// A backlog that cannot be read is logged and skipped.
pub async fn run_client(args: &FollowArgs) -> Result<(), ClientError> {
    tracing::info!(url = %args.url, "connecting to log stream");
    let response = reqwest::get(&args.url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(rejected(status, response.text().await));
    }

    let mut stdout = io::stdout();
    match tail(&args.log_path, args.lines).await {
        Ok(backlog) => {
            for line in backlog {
                writeln!(stdout, "{line}")?;
            }
            stdout.flush()?;
        }
        Err(err) => tracing::warn!(error = %err, "skipping backlog"),
    }

    forward_lines(response.bytes_stream(), &mut stdout).await
}

/// Writes each complete line received on `stream` to `out`.
///
/// Chunk boundaries are not line boundaries: several lines may arrive in
/// one chunk and one line may span chunks. Output is flushed per chunk.
pub async fn forward_lines<S, E, W>(stream: S, out: &mut W) -> Result<(), ClientError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<ClientError>,
    W: Write,
{
    let mut splitter = LineSplitter::default();
    let mut stream = std::pin::pin!(stream);

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(Into::into)?;
        for line in splitter.push(&chunk) {
            writeln!(out, "{line}")?;
        }
        out.flush()?;
    }

    if let Some(rest) = splitter.finish() {
        writeln!(out, "{rest}")?;
        out.flush()?;
    }
    Ok(())
}

/// Reassembles newline-delimited lines from arbitrary byte chunks.
#[derive(Debug, Default)]
pub struct LineSplitter {
    partial: Vec<u8>,
}

impl LineSplitter {
    /// Adds a chunk and returns the lines it completed, without terminators.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.partial.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.partial.iter().position(|&b| b == b'\n') {
            let rest = self.partial.split_off(pos + 1);
            let raw = std::mem::replace(&mut self.partial, rest);
            lines.push(decode_line(&raw));
        }
        lines
    }

    /// Returns any unterminated remainder.
    pub fn finish(self) -> Option<String> {
        if self.partial.is_empty() {
            None
        } else {
            Some(decode_line(&self.partial))
        }
    }
}

/// Error for a non-success response; a body that cannot be read surfaces
/// as the transport error instead of an empty message.
fn rejected(status: reqwest::StatusCode, body: reqwest::Result<String>) -> ClientError {
    match body {
        Ok(body) => ClientError::Status { status, body },
        Err(err) => {
            tracing::warn!(%status, error = %err, "failed to read error response body");
            ClientError::Http(err)
        }
    }
}
