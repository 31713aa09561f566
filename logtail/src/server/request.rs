//! HTTP request types for the log tail server.

use serde::Deserialize;

/// Backlog size used when a tail request does not specify one.
pub const DEFAULT_TAIL_LINES: usize = 10;

/// Upper bound on lines returned by a single tail request.
pub const MAX_TAIL_LINES: usize = 10_000;

/// Query parameters for tail requests.
#[derive(Debug, Default, Deserialize)]
pub struct TailParams {
    /// Number of trailing lines to return.
    pub lines: Option<usize>,
}

impl TailParams {
    /// Requested line count, defaulted and capped.
    pub fn lines(&self) -> usize {
        self.lines.unwrap_or(DEFAULT_TAIL_LINES).min(MAX_TAIL_LINES)
    }
}
