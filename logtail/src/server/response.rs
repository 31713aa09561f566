//! HTTP response types for the log tail server.

use serde::Serialize;

/// Body of a successful tail request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailResponse {
    pub status: &'static str,
    pub lines: Vec<String>,
}

impl TailResponse {
    pub fn success(lines: Vec<String>) -> Self {
        Self {
            status: "success",
            lines,
        }
    }
}
