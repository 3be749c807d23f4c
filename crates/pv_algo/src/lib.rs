// crates/pv_algo/src/lib.rs
//! Algorithm layer for the PartyViz engine.
//!
//! Everything here is pure: inputs are borrowed topic columns (one active
//! topic plus the score list of the requested scope), outputs are plain
//! owned values ready for serialization. No I/O, no clocks, no hashing.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use pv_core::{determinism::FirstSeen, EntityId, ScoreItem, Topic};

pub mod aggregate;
pub mod categorize;
pub mod distance;
pub mod filter;
pub mod stats;
pub mod summary;

pub use aggregate::{aggregate, CategorySummary, RadarOptions, RadarResult, TopicContribution};
pub use categorize::{categorize, Categorizer};
pub use distance::{distance, neighbours, Neighbours, TopicStat, ZTable};
pub use filter::is_missing;
pub use summary::{summarize_parties, PartySummary};

// ----------------------------- Shared inputs -----------------------------

/// One active topic and the score list published for it in the requested
/// scope. `items` is empty when the topic has no run in that scope.
#[derive(Clone, Copy, Debug)]
pub struct TopicColumn<'a> {
    pub topic: &'a Topic,
    pub items: &'a [ScoreItem],
}

impl<'a> TopicColumn<'a> {
    pub fn new(topic: &'a Topic, items: &'a [ScoreItem]) -> Self {
        Self { topic, items }
    }

    /// First item for `entity_id`, placeholder or not.
    pub fn item_for(&self, entity_id: &EntityId) -> Option<&'a ScoreItem> {
        self.items.iter().find(|s| &s.entity_id == entity_id)
    }

    /// First item for `entity_id` that carries a real score.
    pub fn scored_item_for(&self, entity_id: &EntityId) -> Option<&'a ScoreItem> {
        self.item_for(entity_id).filter(|s| !is_missing(s))
    }
}

/// A party as discovered in the score lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Party {
    pub entity_id: EntityId,
    pub entity_name: Option<String>,
}

impl Party {
    /// Display name, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.entity_name.as_deref().unwrap_or(self.entity_id.as_str())
    }
}

/// Parties in discovery order: topics in order, score lists in order, first
/// appearance wins. Placeholder items count. The name is the first non-blank
/// `entity_name` seen for that id.
pub fn discover_parties(columns: &[TopicColumn<'_>]) -> Vec<Party> {
    let mut order: FirstSeen<EntityId> = FirstSeen::new();
    let mut names: BTreeMap<EntityId, String> = BTreeMap::new();

    for item in columns.iter().flat_map(|c| c.items) {
        order.insert(&item.entity_id);
        let name = item.entity_name.as_deref().map(str::trim).filter(|n| !n.is_empty());
        if let Some(n) = name {
            names.entry(item.entity_id.clone()).or_insert_with(|| n.to_owned());
        }
    }

    order
        .into_vec()
        .into_iter()
        .map(|entity_id| Party { entity_name: names.remove(&entity_id), entity_id })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pv_core::StanceLabel;

    fn topic(id: &str) -> Topic {
        Topic { topic_id: id.parse().unwrap(), name: id.into(), description: None, is_active: None }
    }

    fn item(id: &str, name: Option<&str>) -> ScoreItem {
        let mut s = ScoreItem::new(id.parse().unwrap(), StanceLabel::NotMentioned, 0);
        s.entity_name = name.map(Into::into);
        s
    }

    #[test]
    fn discovery_is_first_seen_and_fills_names() {
        let (t1, t2) = (topic("t1"), topic("t2"));
        let a = [item("b", None), item("a", Some("A党"))];
        let b = [item("a", Some("別名")), item("c", Some("  ")), item("b", Some("B党"))];
        let cols = [TopicColumn::new(&t1, &a), TopicColumn::new(&t2, &b)];

        let parties = discover_parties(&cols);
        let ids: Vec<&str> = parties.iter().map(|p| p.entity_id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
        assert_eq!(parties[0].display_name(), "B党");
        assert_eq!(parties[1].display_name(), "A党");
        assert_eq!(parties[2].display_name(), "c");
    }

    #[test]
    fn item_lookup_takes_first_match() {
        let t = topic("t");
        let mut first = item("a", None);
        first.stance_label = StanceLabel::Support;
        first.stance_score = 40;
        let items = [first, item("a", Some("dup"))];
        let col = TopicColumn::new(&t, &items);
        let id: EntityId = "a".parse().unwrap();
        assert_eq!(col.item_for(&id).unwrap().stance_score, 40);
        assert!(col.scored_item_for(&id).is_some());
        assert!(col.item_for(&"z".parse().unwrap()).is_none());
    }
}
