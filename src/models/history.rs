//! Saved review records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::result::ReviewResult;

/// Maximum length of the stored code preview, in characters.
const PREVIEW_LEN: usize = 200;

/// One saved review. Created on explicit save, never mutated afterwards,
/// removed only by a full history clear.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub language: String,
    /// Truncated preview of the reviewed code, not the full text.
    #[serde(rename = "codeSnippet")]
    pub code_snippet: String,
    pub result: ReviewResult,
}

impl HistoryRecord {
    /// Build a record from the session's current state, truncating the
    /// code to a short preview.
    pub fn new(code: &str, language: impl Into<String>, result: ReviewResult) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            language: language.into(),
            code_snippet: truncate_chars(code, PREVIEW_LEN),
            result,
        }
    }
}

/// Truncate to at most `max` characters on a char boundary.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
