//! Live positions feed.
//!
//! Assembles the same data a snapshot carries from recorded API responses:
//! one topics listing plus one positions response per topic and scope.
//! Aggregation over a feed and over the equivalent snapshot yields identical
//! results; only the generation token may differ.

use std::collections::BTreeMap;

use pv_core::{Generation, Scope, Topic, TopicId};
use serde::{Deserialize, Serialize};

use crate::hasher::{self, HashError};
use crate::snapshot::{null_default, TopicPositions};

/// Body of `GET /topics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicsResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub topics: Vec<Topic>,
}

/// Recorded responses as stored on disk: the topics listing plus the
/// positions responses grouped by the scope they were fetched with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedBundle {
    #[serde(default, deserialize_with = "null_default")]
    pub topics: Vec<Topic>,
    #[serde(default, deserialize_with = "null_default")]
    pub positions: Vec<TopicPositions>,
    #[serde(default, deserialize_with = "null_default")]
    pub positions_mixed: Vec<TopicPositions>,
}

#[derive(Debug, Clone)]
pub struct PositionsFeed {
    topics: Vec<Topic>,
    official: BTreeMap<TopicId, TopicPositions>,
    mixed: BTreeMap<TopicId, TopicPositions>,
    generation: Generation,
}

impl PositionsFeed {
    /// Index the responses by their topic id. A later response for the same
    /// topic and scope replaces an earlier one.
    pub fn from_responses(
        topics: TopicsResponse,
        official: Vec<TopicPositions>,
        mixed: Vec<TopicPositions>,
    ) -> Result<Self, HashError> {
        let index = |rs: Vec<TopicPositions>| {
            rs.into_iter()
                .map(|p| (p.topic.topic_id.clone(), p))
                .collect::<BTreeMap<_, _>>()
        };
        let official = index(official);
        let mixed = index(mixed);

        #[derive(Serialize)]
        struct View<'a> {
            topics: &'a [Topic],
            positions: &'a BTreeMap<TopicId, TopicPositions>,
            positions_mixed: &'a BTreeMap<TopicId, TopicPositions>,
        }
        let generation = hasher::generation_of(&View {
            topics: &topics.topics,
            positions: &official,
            positions_mixed: &mixed,
        })?;

        Ok(Self { topics: topics.topics, official, mixed, generation })
    }

    pub fn from_bundle(bundle: FeedBundle) -> Result<Self, HashError> {
        Self::from_responses(TopicsResponse { topics: bundle.topics }, bundle.positions, bundle.positions_mixed)
    }

    #[inline] pub fn generation(&self) -> &Generation { &self.generation }

    pub fn active_topics(&self) -> impl Iterator<Item = &Topic> {
        self.topics.iter().filter(|t| t.is_active())
    }

    pub fn topic(&self, topic_id: &TopicId) -> Option<&Topic> {
        self.topics.iter().find(|t| &t.topic_id == topic_id)
    }

    pub fn positions(&self, topic_id: &TopicId, scope: Scope) -> Option<&TopicPositions> {
        match scope {
            Scope::Official => self.official.get(topic_id),
            Scope::Mixed => self.mixed.get(topic_id),
        }
    }
}
