//! Shared types used across all modules.
//!
//! This module defines the core data structures for review results, chat
//! messages, history records, snippets and comments. Other modules import
//! from here rather than reaching into each other's internals.

pub mod chat;
pub mod comment;
pub mod history;
pub mod result;
pub mod snippet;

pub use chat::{ChatMessage, Role};
pub use comment::Comment;
pub use history::HistoryRecord;
pub use result::{RefactoringSuggestion, ReviewResult, ScoreBand, Severity};
pub use snippet::{NewSnippet, Snippet};

/// Language labels offered by the editor. The review API accepts any
/// string; this list only drives display and validation hints.
pub const LANGUAGE_OPTIONS: &[&str] = &[
    "javascript",
    "typescript",
    "python",
    "java",
    "cpp",
    "go",
    "rust",
    "php",
    "ruby",
];
