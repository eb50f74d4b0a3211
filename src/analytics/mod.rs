//! Aggregate analytics over saved review history.
//!
//! The history list is stored newest-first; the trend comparison uses two
//! fixed five-record windows over that ordering. This is a coarse
//! heuristic — no weighting, fixed window size — kept as-is to preserve
//! observable behavior.

use std::fmt;

use crate::models::HistoryRecord;

/// Number of records in each trend comparison window.
const TREND_WINDOW: usize = 5;

/// Score trajectory over the two comparison windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    /// Not enough history to compare.
    Neutral,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Improving => write!(f, "improving"),
            Trend::Declining => write!(f, "declining"),
            Trend::Stable => write!(f, "stable"),
            Trend::Neutral => write!(f, "neutral"),
        }
    }
}

/// Mean of all overall scores, rounded half-up. Zero for an empty list.
pub fn average_score(history: &[HistoryRecord]) -> u32 {
    if history.is_empty() {
        return 0;
    }
    let sum: u64 = history.iter().map(|r| r.result.overall_score as u64).sum();
    (sum as f64 / history.len() as f64).round() as u32
}

/// Classify the score trajectory.
///
/// `history` must be newest-first. The recent window is the first five
/// records, the older window the next five. With fewer than two records,
/// or nothing in the older window, there is no basis for comparison.
pub fn trend(history: &[HistoryRecord]) -> Trend {
    if history.len() < 2 {
        return Trend::Neutral;
    }
    let recent = &history[..history.len().min(TREND_WINDOW)];
    let older_end = history.len().min(TREND_WINDOW * 2);
    let older = if history.len() > TREND_WINDOW {
        &history[TREND_WINDOW..older_end]
    } else {
        &[]
    };
    if older.is_empty() {
        return Trend::Neutral;
    }

    let mean = |records: &[HistoryRecord]| -> f64 {
        records
            .iter()
            .map(|r| r.result.overall_score as f64)
            .sum::<f64>()
            / records.len() as f64
    };
    let recent_avg = mean(recent);
    let older_avg = mean(older);

    if recent_avg > older_avg {
        Trend::Improving
    } else if recent_avg < older_avg {
        Trend::Declining
    } else {
        Trend::Stable
    }
}
