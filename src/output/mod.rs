//! Output renderers: terminal and JSON.

pub mod json;
pub mod terminal;

use crate::models::ReviewResult;

/// Trait for rendering a review result to an output format.
pub trait OutputRenderer {
    /// Render a result to a string.
    fn render(&self, result: &ReviewResult) -> String;
}
