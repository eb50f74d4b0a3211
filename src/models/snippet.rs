//! Reusable code snippet entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::history::truncate_chars;

/// Maximum characters of the description used in a promoted snippet title.
const TITLE_DESC_LEN: usize = 50;

/// A saved code fragment in the snippet catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: String,
    pub title: String,
    pub code: String,
    pub language: String,
    pub tags: Vec<String>,
    pub description: String,
    /// What problem this snippet fixes, free text. May be empty.
    pub fixes: String,
    /// Incremented once per successful copy action. Never decreases.
    pub usage_count: u64,
    pub created_at: DateTime<Utc>,
    pub is_favorite: bool,
}

/// Fields supplied by the user when creating a snippet; id, usage count
/// and creation time are assigned by the catalog.
#[derive(Debug, Clone, Default)]
pub struct NewSnippet {
    pub title: String,
    pub code: String,
    pub language: String,
    pub tags: Vec<String>,
    pub description: String,
    pub fixes: String,
    pub is_favorite: bool,
}

impl NewSnippet {
    /// Build a snippet draft from a review's refactoring suggestion.
    /// The title is derived from the language and a short description
    /// prefix, matching how promoted snippets are labelled.
    pub fn from_review(
        code: impl Into<String>,
        language: impl Into<String>,
        description: impl Into<String>,
        fixes: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        let language = language.into();
        let description = description.into();
        Self {
            title: format!("{language} - {}", truncate_chars(&description, TITLE_DESC_LEN)),
            code: code.into(),
            language,
            tags,
            description,
            fixes: fixes.into(),
            is_favorite: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_review_builds_title_from_language_and_description() {
        let draft = NewSnippet::from_review(
            "let x = items.iter().sum();",
            "rust",
            "Sum with an iterator instead of a manual loop",
            "manual index loop",
            vec!["iterators".into()],
        );
        assert_eq!(draft.title, "rust - Sum with an iterator instead of a manual loop");
        assert!(!draft.is_favorite);
    }

    #[test]
    fn from_review_truncates_long_descriptions() {
        let long = "d".repeat(120);
        let draft = NewSnippet::from_review("c", "go", long, "", vec![]);
        assert_eq!(draft.title, format!("go - {}", "d".repeat(50)));
    }

    #[test]
    fn snippet_serde_uses_camel_case() {
        let snippet = Snippet {
            id: "1".into(),
            title: "t".into(),
            code: "c".into(),
            language: "python".into(),
            tags: vec![],
            description: "d".into(),
            fixes: String::new(),
            usage_count: 2,
            created_at: Utc::now(),
            is_favorite: true,
        };
        let json = serde_json::to_value(&snippet).unwrap();
        assert_eq!(json["usageCount"], 2);
        assert_eq!(json["isFavorite"], true);
        assert!(json.get("createdAt").is_some());
    }
}
