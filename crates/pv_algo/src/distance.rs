//! Cross-party distance engine.
//!
//! Scores are normalized per topic across parties (population z-scores),
//! then two parties are compared by the mean squared z difference over the
//! topics both have scores for. Fewer than two shared topics leaves the
//! distance undefined.

use std::collections::BTreeMap;

use pv_core::determinism::sort_by_value_asc;
use pv_core::{EntityId, TopicId};

use crate::stats;
use crate::{Party, TopicColumn};

/// Fewest shared topics for a defined distance.
pub const MIN_SHARED_TOPICS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TopicStat {
    pub mean: f64,
    pub std: f64,
}

impl TopicStat {
    pub fn of(scores: &[i32]) -> Option<Self> {
        Some(Self { mean: stats::mean(scores)?, std: stats::pstdev(scores)? })
    }

    /// Zero when every party agrees.
    pub fn z(&self, score: i32) -> f64 {
        if self.std == 0.0 {
            0.0
        } else {
            (f64::from(score) - self.mean) / self.std
        }
    }
}

#[derive(Clone, Debug)]
struct PartyRow {
    entity_id: EntityId,
    /// Topic order.
    ordered: Vec<(TopicId, f64)>,
    by_topic: BTreeMap<TopicId, f64>,
}

/// Per-party z-scores for every topic the party has a real score on.
#[derive(Clone, Debug, Default)]
pub struct ZTable {
    stats: BTreeMap<TopicId, TopicStat>,
    rows: Vec<PartyRow>,
}

impl ZTable {
    /// Placeholders are excluded; a party contributes at most its first item per topic.
    pub fn build(parties: &[Party], columns: &[TopicColumn<'_>]) -> Self {
        let mut rows: Vec<PartyRow> = parties
            .iter()
            .map(|p| PartyRow {
                entity_id: p.entity_id.clone(),
                ordered: Vec::new(),
                by_topic: BTreeMap::new(),
            })
            .collect();
        let mut stats = BTreeMap::new();

        for col in columns {
            let scored: Vec<(usize, i32)> = parties
                .iter()
                .enumerate()
                .filter_map(|(i, p)| col.scored_item_for(&p.entity_id).map(|s| (i, s.stance_score)))
                .collect();
            let values: Vec<i32> = scored.iter().map(|&(_, v)| v).collect();
            let Some(stat) = TopicStat::of(&values) else { continue };

            let topic_id = &col.topic.topic_id;
            for (i, v) in scored {
                let z = stat.z(v);
                rows[i].ordered.push((topic_id.clone(), z));
                rows[i].by_topic.insert(topic_id.clone(), z);
            }
            stats.insert(topic_id.clone(), stat);
        }

        Self { stats, rows }
    }

    fn row(&self, entity_id: &EntityId) -> Option<&PartyRow> {
        self.rows.iter().find(|r| &r.entity_id == entity_id)
    }

    pub fn topic_stat(&self, topic_id: &TopicId) -> Option<&TopicStat> {
        self.stats.get(topic_id)
    }

    /// z-scores of one party in topic order; empty for an unknown party.
    pub fn z_scores(&self, entity_id: &EntityId) -> &[(TopicId, f64)] {
        self.row(entity_id).map(|r| r.ordered.as_slice()).unwrap_or(&[])
    }

    pub fn z(&self, entity_id: &EntityId, topic_id: &TopicId) -> Option<f64> {
        self.row(entity_id)?.by_topic.get(topic_id).copied()
    }

    /// Number of topics the party has a real score on.
    pub fn scored_count(&self, entity_id: &EntityId) -> usize {
        self.z_scores(entity_id).len()
    }

    pub fn distance_between(&self, a: &EntityId, b: &EntityId) -> Option<f64> {
        distance(&self.row(a)?.by_topic, &self.row(b)?.by_topic)
    }
}

/// Mean squared z difference over shared topics (not rooted).
pub fn distance(a: &BTreeMap<TopicId, f64>, b: &BTreeMap<TopicId, f64>) -> Option<f64> {
    let diffs: Vec<f64> = a
        .iter()
        .filter_map(|(k, za)| b.get(k).map(|zb| (za - zb) * (za - zb)))
        .collect();
    if diffs.len() < MIN_SHARED_TOPICS {
        return None;
    }
    Some(diffs.iter().sum::<f64>() / diffs.len() as f64)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Neighbours {
    pub near: Option<EntityId>,
    pub far: Option<EntityId>,
}

/// Nearest and farthest party by defined distance. Ties resolve to the
/// earlier party for `near` and the later one for `far`.
pub fn neighbours(table: &ZTable, entity_id: &EntityId) -> Neighbours {
    let mut dists: Vec<(&EntityId, f64)> = table
        .rows
        .iter()
        .filter(|r| &r.entity_id != entity_id)
        .filter_map(|r| table.distance_between(entity_id, &r.entity_id).map(|d| (&r.entity_id, d)))
        .collect();
    sort_by_value_asc(&mut dists);
    Neighbours {
        near: dists.first().map(|(id, _)| (*id).clone()),
        far: dists.last().map(|(id, _)| (*id).clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use pv_core::{ScoreItem, StanceLabel, Topic};

    fn topic(id: &str) -> Topic {
        Topic { topic_id: id.parse().unwrap(), name: id.into(), description: None, is_active: None }
    }

    fn party(id: &str) -> Party {
        Party { entity_id: id.parse().unwrap(), entity_name: None }
    }

    fn s(p: &str, v: i32) -> ScoreItem {
        ScoreItem::new(p.parse().unwrap(), StanceLabel::Support, v)
    }

    fn id(x: &str) -> EntityId {
        x.parse().unwrap()
    }

    #[test]
    fn two_party_example() {
        let (t1, t2) = (topic("t1"), topic("t2"));
        let c1 = [s("a", 60), s("b", -40)];
        let c2 = [s("a", -20), s("b", 80)];
        let cols = [TopicColumn::new(&t1, &c1), TopicColumn::new(&t2, &c2)];
        let parties = [party("a"), party("b")];
        let z = ZTable::build(&parties, &cols);

        let st = z.topic_stat(&"t1".parse().unwrap()).unwrap();
        assert_eq!((st.mean, st.std), (10.0, 50.0));
        assert_eq!(z.z(&id("a"), &"t1".parse().unwrap()), Some(1.0));
        assert_eq!(z.z(&id("b"), &"t2".parse().unwrap()), Some(1.0));
        assert_eq!(z.distance_between(&id("a"), &id("b")), Some(4.0));

        let n = neighbours(&z, &id("a"));
        assert_eq!(n.near, Some(id("b")));
        assert_eq!(n.far, Some(id("b")));
    }

    #[test]
    fn single_score_topic_has_zero_z() {
        let t = topic("t");
        let c = [s("a", 70)];
        let z = ZTable::build(&[party("a")], &[TopicColumn::new(&t, &c)]);
        assert_eq!(z.z(&id("a"), &"t".parse().unwrap()), Some(0.0));
        assert_eq!(z.scored_count(&id("a")), 1);
    }

    #[test]
    fn under_two_shared_topics_is_undefined() {
        let (t1, t2) = (topic("t1"), topic("t2"));
        let c1 = [s("a", 10), s("b", 20), s("c", 0)];
        let c2 = [s("a", 30), s("c", 50)];
        let cols = [TopicColumn::new(&t1, &c1), TopicColumn::new(&t2, &c2)];
        let z = ZTable::build(&[party("a"), party("b"), party("c")], &cols);
        assert_eq!(z.distance_between(&id("a"), &id("b")), None);
        assert!(z.distance_between(&id("a"), &id("c")).is_some());

        // b has no defined distance to anyone
        assert_eq!(neighbours(&z, &id("b")), Neighbours::default());
        let n = neighbours(&z, &id("a"));
        assert_eq!((n.near, n.far), (Some(id("c")), Some(id("c"))));
    }

    #[test]
    fn ties_keep_party_order() {
        let (t1, t2) = (topic("t1"), topic("t2"));
        // b and c identical, so equidistant from a
        let c1 = [s("a", 100), s("b", 0), s("c", 0)];
        let c2 = [s("a", -100), s("b", 0), s("c", 0)];
        let cols = [TopicColumn::new(&t1, &c1), TopicColumn::new(&t2, &c2)];
        let z = ZTable::build(&[party("a"), party("b"), party("c")], &cols);
        let n = neighbours(&z, &id("a"));
        assert_eq!(n.near, Some(id("b")));
        assert_eq!(n.far, Some(id("c")));
    }

    #[test]
    fn lone_party_and_empty_roster() {
        let t = topic("t");
        let c = [s("a", 40)];
        let cols = [TopicColumn::new(&t, &c)];

        let z = ZTable::build(&[party("a")], &cols);
        assert_eq!(z.scored_count(&id("a")), 1);
        assert_eq!(neighbours(&z, &id("a")), Neighbours::default());

        let empty = ZTable::build(&[], &cols);
        assert!(empty.z_scores(&id("a")).is_empty());
        assert!(empty.topic_stat(&"t".parse().unwrap()).is_none());
        assert_eq!(neighbours(&empty, &id("a")), Neighbours::default());
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(
            a in proptest::collection::btree_map("[a-e]", -3.0f64..3.0, 0..5),
            b in proptest::collection::btree_map("[a-e]", -3.0f64..3.0, 0..5),
        ) {
            let conv = |m: BTreeMap<String, f64>| -> BTreeMap<TopicId, f64> {
                m.into_iter().map(|(k, v)| (k.parse().unwrap(), v)).collect()
            };
            let (a, b) = (conv(a), conv(b));
            prop_assert_eq!(distance(&a, &b), distance(&b, &a));
            let shared = a.keys().filter(|k| b.contains_key(*k)).count();
            prop_assert_eq!(distance(&a, &b).is_none(), shared < MIN_SHARED_TOPICS);
        }
    }
}
