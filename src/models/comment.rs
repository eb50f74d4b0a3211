//! Review comment entity for the client-only comment thread.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment attached to a review, optionally pinned to a line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl Comment {
    pub fn new(author: impl Into<String>, text: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            author: author.into(),
            text: text.into(),
            timestamp: Utc::now(),
            line,
        }
    }
}
