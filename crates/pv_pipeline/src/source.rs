//! Score sources.
//!
//! The provider reads topics and per-scope score lists through this trait so
//! a static snapshot and a feed assembled from live responses are
//! interchangeable. Nothing downstream can tell them apart except by
//! generation.

use pv_core::{Generation, Scope, Topic, TopicId};
use pv_io::{PositionsFeed, Rubric, Snapshot, TopicPositions};

pub trait ScoreSource {
    /// Content token used to key cached summaries.
    fn generation(&self) -> &Generation;

    /// Active topics in publication order.
    fn active_topics(&self) -> Vec<&Topic>;

    /// Any listed topic, active or not.
    fn topic(&self, topic_id: &TopicId) -> Option<&Topic>;

    /// Positions block for exactly `scope`.
    fn positions(&self, topic_id: &TopicId, scope: Scope) -> Option<&TopicPositions>;

    fn rubric(&self, _topic_id: &TopicId) -> Option<&Rubric> {
        None
    }
}

impl ScoreSource for Snapshot {
    fn generation(&self) -> &Generation {
        Snapshot::generation(self)
    }

    fn active_topics(&self) -> Vec<&Topic> {
        Snapshot::active_topics(self).collect()
    }

    fn topic(&self, topic_id: &TopicId) -> Option<&Topic> {
        Snapshot::topic(self, topic_id)
    }

    fn positions(&self, topic_id: &TopicId, scope: Scope) -> Option<&TopicPositions> {
        Snapshot::positions(self, topic_id, scope)
    }

    fn rubric(&self, topic_id: &TopicId) -> Option<&Rubric> {
        Snapshot::rubric(self, topic_id)
    }
}

impl ScoreSource for PositionsFeed {
    fn generation(&self) -> &Generation {
        PositionsFeed::generation(self)
    }

    fn active_topics(&self) -> Vec<&Topic> {
        PositionsFeed::active_topics(self).collect()
    }

    fn topic(&self, topic_id: &TopicId) -> Option<&Topic> {
        PositionsFeed::topic(self, topic_id)
    }

    fn positions(&self, topic_id: &TopicId, scope: Scope) -> Option<&TopicPositions> {
        PositionsFeed::positions(self, topic_id, scope)
    }
}
