//! Analysis struct - everything learned about one page.

use crate::agent::AgentError;
use crate::clues::Clues;
use serde::Serialize;

/// Outcome of the summarization stage.
#[derive(Debug, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum Report {
    /// The model's reply
    Ok(String),
    /// Why no reply is available
    Error(String),
    /// Summarization was not requested
    Skipped,
}

impl From<Result<String, AgentError>> for Report {
    fn from(result: Result<String, AgentError>) -> Self {
        match result {
            Ok(text) => Report::Ok(text),
            Err(e) => Report::Error(e.to_string()),
        }
    }
}

/// Result of analyzing a single page.
#[derive(Debug, Serialize)]
pub struct Analysis {
    /// The URL that was fetched
    pub url: String,
    pub title: Option<String>,
    /// Heuristic findings, all categories present
    pub clues: Clues,
    pub report: Report,
}
