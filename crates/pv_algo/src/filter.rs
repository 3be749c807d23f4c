//! Placeholder detection.
//!
//! Score runs emit a row for every party even when nothing was found; those
//! rows look like `not_mentioned / 0 / 0` with a canned rationale or no
//! sourced evidence. A genuine `not_mentioned` with evidence or confidence
//! still counts.

use pv_core::{ScoreItem, StanceLabel};

/// Rationale phrases written for rows that were never scored.
pub const NO_SCORE_MARKERS: [&str; 2] = ["スコア未作成", "スコアがありません"];

/// True when `item` is a placeholder and must be left out of every aggregate.
pub fn is_missing(item: &ScoreItem) -> bool {
    if item.stance_label != StanceLabel::NotMentioned
        || item.stance_score != 0
        || item.confidence != 0.0
    {
        return false;
    }
    let marked = NO_SCORE_MARKERS.iter().any(|m| item.rationale.contains(m));
    let sourced = item.evidence.iter().any(|e| e.has_url());
    marked || !sourced
}
