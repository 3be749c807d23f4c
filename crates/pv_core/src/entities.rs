//! Snapshot entities: topics, score items and their evidence.
//!
//! Field shapes mirror the public API payloads. Deserialization is lenient on
//! purpose: absent or `null` numbers read as 0, absent text as empty, absent
//! evidence as `[]`, so a partially filled snapshot degrades to empty
//! aggregates instead of failing to load.

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::{EntityId, TopicId};

/// A policy question parties are scored against.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Topic {
    pub topic_id: TopicId,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "de_string_or_null"))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub is_active: Option<bool>,
}

impl Topic {
    /// Topics without an explicit flag are active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(true)
    }
}

/// Stance label assigned by the scorer. Unknown tokens read as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StanceLabel {
    Support,
    Oppose,
    Neutral,
    Conditional,
    #[default]
    Unknown,
    NotMentioned,
    #[cfg_attr(feature = "serde", serde(other))]
    Other,
}

/// One quoted source backing a score.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Evidence {
    #[cfg_attr(feature = "serde", serde(default, alias = "evidence_url", deserialize_with = "de_string_or_null"))]
    pub url: String,
    #[cfg_attr(feature = "serde", serde(default, alias = "evidence_quote", deserialize_with = "de_string_or_null"))]
    pub quote: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub fetched_at: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub quote_start: Option<i64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub quote_end: Option<i64>,
}

impl Evidence {
    #[inline]
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// Versioning echo attached by the backend.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoreMeta {
    #[cfg_attr(feature = "serde", serde(default))]
    pub topic_version: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub calc_version: String,
}

/// One party's evaluation on one topic.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoreItem {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub entity_type: Option<String>,
    pub entity_id: EntityId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub entity_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub topic_id: Option<TopicId>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub mode: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "de_score"))]
    pub stance_score: i32,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "de_label"))]
    pub stance_label: StanceLabel,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "de_confidence"))]
    pub confidence: f64,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "de_string_or_null"))]
    pub rationale: String,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "de_evidence"))]
    pub evidence: Vec<Evidence>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub meta: Option<ScoreMeta>,
}

impl ScoreItem {
    /// Bare item with the given id and score; everything else empty.
    pub fn new(entity_id: EntityId, stance_label: StanceLabel, stance_score: i32) -> Self {
        Self {
            entity_type: None,
            entity_id,
            entity_name: None,
            topic_id: None,
            mode: None,
            stance_score,
            stance_label,
            confidence: 0.0,
            rationale: String::new(),
            evidence: Vec::new(),
            meta: None,
        }
    }

    /// First non-blank evidence quote, if any (raw, not normalized).
    pub fn first_quote(&self) -> Option<&str> {
        self.evidence
            .iter()
            .map(|e| e.quote.as_str())
            .find(|q| !q.trim().is_empty())
    }
}

/* ------------------------------ lenient readers ------------------------------ */

#[cfg(feature = "serde")]
fn de_string_or_null<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

#[cfg(feature = "serde")]
fn de_label<'de, D: Deserializer<'de>>(d: D) -> Result<StanceLabel, D::Error> {
    Ok(Option::<StanceLabel>::deserialize(d)?.unwrap_or_default())
}

#[cfg(feature = "serde")]
fn de_evidence<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Evidence>, D::Error> {
    Ok(Option::<Vec<Evidence>>::deserialize(d)?.unwrap_or_default())
}

/// Integer score; floats are rounded, `null` reads as 0, result clamped to [-100, 100].
#[cfg(feature = "serde")]
fn de_score<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    let v = Option::<f64>::deserialize(d)?.unwrap_or(0.0);
    if !v.is_finite() {
        return Ok(0);
    }
    Ok(v.round().clamp(-100.0, 100.0) as i32)
}

#[cfg(feature = "serde")]
fn de_confidence<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let v = Option::<f64>::deserialize(d)?.unwrap_or(0.0);
    Ok(if v.is_finite() { v } else { 0.0 })
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn full_item_reads() {
        let raw = r#"{
            "entity_type": "party",
            "entity_id": "party-lp",
            "entity_name": "自由党",
            "topic_id": "tax",
            "mode": "claim",
            "stance_label": "conditional",
            "stance_score": 35,
            "confidence": 0.72,
            "rationale": "根拠抜粋に基づく要約",
            "evidence": [{
                "url": "https://example.jp/policy",
                "fetched_at": "2025-12-12T03:00:00Z",
                "quote": "…抜粋…",
                "quote_start": 1234,
                "quote_end": 1301
            }],
            "meta": {"topic_version": "2025-12-01", "calc_version": "2025-12-12T03:30:00Z"}
        }"#;
        let s: ScoreItem = serde_json::from_str(raw).unwrap();
        assert_eq!(s.entity_id.as_str(), "party-lp");
        assert_eq!(s.stance_label, StanceLabel::Conditional);
        assert_eq!(s.stance_score, 35);
        assert_eq!(s.evidence.len(), 1);
        assert!(s.evidence[0].has_url());
        assert_eq!(s.first_quote(), Some("…抜粋…"));
    }

    #[test]
    fn sparse_item_degrades_to_defaults() {
        let raw = r#"{"entity_id":"p1","stance_score":null,"confidence":null,"rationale":null,"evidence":null}"#;
        let s: ScoreItem = serde_json::from_str(raw).unwrap();
        assert_eq!(s.stance_score, 0);
        assert_eq!(s.confidence, 0.0);
        assert_eq!(s.stance_label, StanceLabel::Unknown);
        assert!(s.rationale.is_empty());
        assert!(s.evidence.is_empty());
    }

    #[test]
    fn unknown_label_and_float_score() {
        let raw = r#"{"entity_id":"p1","stance_label":"ambivalent","stance_score":12.6}"#;
        let s: ScoreItem = serde_json::from_str(raw).unwrap();
        assert_eq!(s.stance_label, StanceLabel::Other);
        assert_eq!(s.stance_score, 13);
    }

    #[test]
    fn legacy_evidence_keys() {
        let raw = r#"{"evidence_url":"https://a.example","evidence_quote":"q"}"#;
        let e: Evidence = serde_json::from_str(raw).unwrap();
        assert_eq!(e.url, "https://a.example");
        assert_eq!(e.quote, "q");
    }

    #[test]
    fn topic_active_defaults_true() {
        let t: Topic = serde_json::from_str(r#"{"topic_id":"tax","name":"税制"}"#).unwrap();
        assert!(t.is_active());
        let t: Topic = serde_json::from_str(r#"{"topic_id":"x","name":"x","is_active":false}"#).unwrap();
        assert!(!t.is_active());
    }
}
