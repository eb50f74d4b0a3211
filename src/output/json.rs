//! JSON output renderer.
//!
//! Outputs `{"result": {...}, "band": "...", "issue_count": N}`.

use crate::models::ReviewResult;
use crate::output::OutputRenderer;

/// JSON output renderer.
pub struct JsonRenderer;

impl OutputRenderer for JsonRenderer {
    fn render(&self, result: &ReviewResult) -> String {
        let output = serde_json::json!({
            "result": result,
            "band": result.band().to_string(),
            "issue_count": result.issue_count(),
        });

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn render_json() {
        let result = ReviewResult::from_json(json!({
            "overall_score": 85,
            "summary": "Good.",
            "strengths": ["tested"],
            "bugs": [{"description": "minor"}],
        }))
        .unwrap();

        let output = JsonRenderer.render(&result);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["result"]["overall_score"], 85);
        assert_eq!(parsed["band"], "excellent");
        assert_eq!(parsed["issue_count"], 1);
    }
}
