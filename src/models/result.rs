//! Review result types and validation.
//!
//! The AI service returns an untyped JSON body; [`ReviewResult::from_json`]
//! is the single place where that body is validated and defaulted so every
//! downstream consumer can assume presence of all fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors produced while validating a raw review response.
#[derive(Error, Debug)]
pub enum ResultError {
    /// `overall_score` is absent, not an integer, or outside 0–100.
    #[error("malformed review result: {0}")]
    MalformedScore(String),

    #[error("malformed review result: {0}")]
    InvalidShape(#[from] serde_json::Error),
}

/// Severity tier of a bug or security issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Unspecified,
    Low,
    Medium,
    High,
    /// Must be fixed before the code ships.
    Critical,
}

/// Custom deserializer that accepts common LLM variations.
///
/// Models sometimes return "Major", "Severe", "Blocker" and friends instead
/// of the four documented tiers. Unknown or missing values normalise to
/// `Unspecified` rather than failing the whole result.
impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(match s.to_lowercase().as_str() {
            "critical" | "blocker" | "severe" | "fatal" => Severity::Critical,
            "high" | "major" => Severity::High,
            "medium" | "moderate" => Severity::Medium,
            "low" | "minor" | "trivial" | "info" => Severity::Low,
            _ => Severity::Unspecified,
        })
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::High => write!(f, "high"),
            Severity::Medium => write!(f, "medium"),
            Severity::Low => write!(f, "low"),
            Severity::Unspecified => write!(f, "unspecified"),
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Unspecified
    }
}

/// A bug detected by the reviewer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bug {
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub severity: Severity,
    pub description: String,
    #[serde(default)]
    pub suggestion: String,
}

/// A security vulnerability detected by the reviewer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityIssue {
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub severity: Severity,
    pub description: String,
    #[serde(default)]
    pub recommendation: String,
}

/// A performance concern with a suggested optimization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceTip {
    #[serde(default)]
    pub line: Option<u32>,
    pub description: String,
    #[serde(default)]
    pub optimization: String,
}

/// A refactoring suggestion with before/after code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefactoringSuggestion {
    /// Line range like "10-15". Free text — the model is not consistent.
    #[serde(default)]
    pub line_range: String,
    pub description: String,
    #[serde(default)]
    pub current_code: String,
    #[serde(default)]
    pub improved_code: String,
}

/// Big-O analysis of the reviewed code. Optional — not every model
/// populates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplexityAnalysis {
    pub time_complexity: String,
    pub space_complexity: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub optimization_potential: String,
}

/// Quality band derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// 80 and above.
    Excellent,
    /// 60–79.
    Good,
    /// Below 60.
    NeedsImprovement,
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreBand::Excellent => write!(f, "excellent"),
            ScoreBand::Good => write!(f, "good"),
            ScoreBand::NeedsImprovement => write!(f, "needs improvement"),
        }
    }
}

/// One complete AI review response. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewResult {
    /// Overall code quality score, validated to 0–100.
    pub overall_score: u8,
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub bugs: Vec<Bug>,
    #[serde(default)]
    pub security_issues: Vec<SecurityIssue>,
    #[serde(default)]
    pub performance_tips: Vec<PerformanceTip>,
    #[serde(default)]
    pub refactoring_suggestions: Vec<RefactoringSuggestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity_analysis: Option<ComplexityAnalysis>,
}

impl ReviewResult {
    /// Validate a raw response body into a `ReviewResult`.
    ///
    /// Missing optional arrays default to empty; missing severities become
    /// `Unspecified`. An absent, non-integer or out-of-range
    /// `overall_score` is a [`ResultError::MalformedScore`] — callers
    /// surface this as a failed review, never a crash.
    pub fn from_json(body: serde_json::Value) -> Result<Self, ResultError> {
        let score = body
            .get("overall_score")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| {
                ResultError::MalformedScore("overall_score is missing or not an integer".into())
            })?;
        if !(0..=100).contains(&score) {
            return Err(ResultError::MalformedScore(format!(
                "overall_score {score} is outside 0-100"
            )));
        }
        Ok(serde_json::from_value(body)?)
    }

    /// Quality band for display grouping.
    pub fn band(&self) -> ScoreBand {
        match self.overall_score {
            80..=100 => ScoreBand::Excellent,
            60..=79 => ScoreBand::Good,
            _ => ScoreBand::NeedsImprovement,
        }
    }

    /// Total number of findings across all categories.
    pub fn issue_count(&self) -> usize {
        self.bugs.len()
            + self.security_issues.len()
            + self.performance_tips.len()
            + self.refactoring_suggestions.len()
    }
}

/// Render an optional line number, with the "N/A" sentinel for absence.
pub fn display_line(line: Option<u32>) -> String {
    match line {
        Some(n) => n.to_string(),
        None => "N/A".to_string(),
    }
}
