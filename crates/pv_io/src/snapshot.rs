//! Typed snapshot document.
//!
//! The static snapshot carries everything the public view needs without a
//! live backend: the topic list, per-topic positions for each scope, and the
//! rubrics that define each topic's axis. Every collection is optional on the
//! wire; absent or `null` reads as empty.

use std::collections::BTreeMap;

use pv_core::{Generation, Scope, Topic, TopicId};
use pv_core::entities::ScoreItem;
use serde::{Deserialize, Deserializer, Serialize};

use crate::hasher::{self, HashError};

/// Positions block for one topic in one scope
/// (same shape as `GET /topics/{id}/positions`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicPositions {
    pub topic: Topic,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric_version: Option<i64>,
    #[serde(default)]
    pub axis_a_label: Option<String>,
    #[serde(default)]
    pub axis_b_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_scope: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub scores: Vec<ScoreItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricStep {
    pub score: i32,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub criteria: String,
}

/// Axis definition for a topic (A at -100, B at +100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    #[serde(default)]
    pub axis_a_label: String,
    #[serde(default)]
    pub axis_b_label: String,
    #[serde(default, deserialize_with = "null_default")]
    pub steps: Vec<RubricStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Rubric {
    /// Axis end labels: the lowest and highest scored steps win over the
    /// declared axis labels when they carry text.
    pub fn axis_labels(&self) -> (String, String) {
        let mut steps: Vec<&RubricStep> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.score);
        let pick = |step: Option<&&RubricStep>, fallback: &str| {
            step.map(|s| s.label.trim())
                .filter(|l| !l.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };
        (pick(steps.first(), &self.axis_a_label), pick(steps.last(), &self.axis_b_label))
    }
}

/// Wire document as exported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub topics: Vec<Topic>,
    #[serde(default, deserialize_with = "null_default")]
    pub positions: BTreeMap<TopicId, TopicPositions>,
    #[serde(default, deserialize_with = "null_default")]
    pub positions_mixed: BTreeMap<TopicId, TopicPositions>,
    #[serde(default, deserialize_with = "null_default")]
    pub rubrics: BTreeMap<TopicId, Rubric>,
    #[serde(default, deserialize_with = "null_default")]
    pub runs: BTreeMap<TopicId, serde_json::Value>,
}

/// A loaded snapshot together with its content generation.
#[derive(Debug, Clone)]
pub struct Snapshot {
    doc: SnapshotDoc,
    generation: Generation,
}

impl Snapshot {
    pub fn from_doc(doc: SnapshotDoc) -> Result<Self, HashError> {
        let generation = hasher::generation_of(&doc)?;
        Ok(Self { doc, generation })
    }

    #[inline] pub fn doc(&self) -> &SnapshotDoc { &self.doc }
    #[inline] pub fn generation(&self) -> &Generation { &self.generation }

    /// Active topics in document order.
    pub fn active_topics(&self) -> impl Iterator<Item = &Topic> {
        self.doc.topics.iter().filter(|t| t.is_active())
    }

    /// Any listed topic, active or not.
    pub fn topic(&self, topic_id: &TopicId) -> Option<&Topic> {
        self.doc.topics.iter().find(|t| &t.topic_id == topic_id)
    }

    /// Positions block for a topic in exactly `scope` (no fallback).
    pub fn positions(&self, topic_id: &TopicId, scope: Scope) -> Option<&TopicPositions> {
        match scope {
            Scope::Official => self.doc.positions.get(topic_id),
            Scope::Mixed => self.doc.positions_mixed.get(topic_id),
        }
    }

    pub fn rubric(&self, topic_id: &TopicId) -> Option<&Rubric> {
        self.doc.rubrics.get(topic_id)
    }
}

/// `null` reads as `T::default()`.
pub(crate) fn null_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}
