//! Terminal renderer: styled flowing text grouped by finding category.

use colored::Colorize;

use crate::diff::SideBySide;
use crate::models::result::{display_line, ScoreBand, Severity};
use crate::models::ReviewResult;
use crate::output::OutputRenderer;

/// Terminal output renderer with colored, flowing text.
pub struct TerminalRenderer;

impl TerminalRenderer {
    fn severity_tag(severity: Severity) -> String {
        match severity {
            Severity::Critical => "critical".red().bold().to_string(),
            Severity::High => "high".red().to_string(),
            Severity::Medium => "medium".yellow().to_string(),
            Severity::Low => "low".blue().to_string(),
            Severity::Unspecified => "unspecified".dimmed().to_string(),
        }
    }
}

impl OutputRenderer for TerminalRenderer {
    fn render(&self, result: &ReviewResult) -> String {
        let mut output = String::new();

        let score = format!("{}/100", result.overall_score);
        let score_styled = match result.band() {
            ScoreBand::Excellent => score.green().bold().to_string(),
            ScoreBand::Good => score.yellow().bold().to_string(),
            ScoreBand::NeedsImprovement => score.red().bold().to_string(),
        };
        output.push_str(&format!(
            " {} {} ({})\n\n",
            "Score:".bold(),
            score_styled,
            result.band()
        ));
        output.push_str(&format!(" {}\n", result.summary));

        if !result.strengths.is_empty() {
            output.push_str(&format!("\n {}\n", "Strengths".green().bold()));
            for strength in &result.strengths {
                output.push_str(&format!("   {} {strength}\n", "✔".green()));
            }
        }

        if !result.bugs.is_empty() {
            output.push_str(&format!("\n {}\n", "Bugs".red().bold()));
            for bug in &result.bugs {
                output.push_str(&format!(
                    "   {} line {} [{}] {}\n",
                    "✖".red().bold(),
                    display_line(bug.line).bold(),
                    Self::severity_tag(bug.severity),
                    bug.description
                ));
                if !bug.suggestion.is_empty() {
                    output.push_str(&format!("     {} {}\n", "→".cyan(), bug.suggestion));
                }
            }
        }

        if !result.security_issues.is_empty() {
            output.push_str(&format!("\n {}\n", "Security".red().bold()));
            for issue in &result.security_issues {
                output.push_str(&format!(
                    "   {} line {} [{}] {}\n",
                    "⚠".yellow().bold(),
                    display_line(issue.line).bold(),
                    Self::severity_tag(issue.severity),
                    issue.description
                ));
                if !issue.recommendation.is_empty() {
                    output.push_str(&format!("     {} {}\n", "→".cyan(), issue.recommendation));
                }
            }
        }

        if !result.performance_tips.is_empty() {
            output.push_str(&format!("\n {}\n", "Performance".yellow().bold()));
            for tip in &result.performance_tips {
                output.push_str(&format!(
                    "   {} line {} {}\n",
                    "ℹ".blue().bold(),
                    display_line(tip.line).bold(),
                    tip.description
                ));
                if !tip.optimization.is_empty() {
                    output.push_str(&format!("     {} {}\n", "→".cyan(), tip.optimization));
                }
            }
        }

        if !result.refactoring_suggestions.is_empty() {
            output.push_str(&format!("\n {}\n", "Refactoring".cyan().bold()));
            for suggestion in &result.refactoring_suggestions {
                let range = if suggestion.line_range.is_empty() {
                    "N/A"
                } else {
                    &suggestion.line_range
                };
                output.push_str(&format!(
                    "   {} lines {} {}\n",
                    "↺".cyan(),
                    range.bold(),
                    suggestion.description
                ));
                if !suggestion.current_code.is_empty() && !suggestion.improved_code.is_empty() {
                    let pair = SideBySide::pair(&suggestion.current_code, &suggestion.improved_code);
                    for row in 0..pair.rows() {
                        let left = pair.original.get(row).map(String::as_str).unwrap_or("");
                        let right = pair.improved.get(row).map(String::as_str).unwrap_or("");
                        output.push_str(&format!(
                            "     {} {:<38} {} {}\n",
                            "-".red(),
                            left,
                            "+".green(),
                            right
                        ));
                    }
                }
            }
        }

        if let Some(ref complexity) = result.complexity_analysis {
            output.push_str(&format!("\n {}\n", "Complexity".bold()));
            output.push_str(&format!(
                "   time {} space {}\n",
                complexity.time_complexity.bold(),
                complexity.space_complexity.bold()
            ));
            if !complexity.explanation.is_empty() {
                output.push_str(&format!("   {}\n", complexity.explanation));
            }
        }

        output.push_str(&format!(
            "\n{}\n",
            "───────────────────────────────────".dimmed()
        ));
        let count = result.issue_count();
        output.push_str(&format!(
            " {} {}\n",
            count.to_string().bold(),
            if count == 1 { "finding" } else { "findings" },
        ));

        output
    }
}
