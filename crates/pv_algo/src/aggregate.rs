//! Category aggregator: one party's radar over the six fixed axes.

#[cfg(feature = "serde")]
use serde::Serialize;

use pv_core::{Category, EngineParams, EntityId, Scope, StanceLabel, TopicId};

use crate::categorize::Categorizer;
use crate::stats;
use crate::{Party, TopicColumn};

/// One included topic inside a category bucket.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TopicContribution {
    pub topic_id: TopicId,
    pub topic_name: String,
    pub stance_score: i32,
    pub stance_label: StanceLabel,
    pub confidence: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CategorySummary {
    pub key: Category,
    pub label: String,
    pub count: usize,
    pub median: Option<f64>,
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub topics: Vec<TopicContribution>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RadarResult {
    pub entity_type: &'static str,
    pub entity_id: EntityId,
    pub entity_name: Option<String>,
    pub scope: Scope,
    pub topic_total: usize,
    pub topic_included: usize,
    pub categories: Vec<CategorySummary>,
}

impl RadarResult {
    pub fn category(&self, key: Category) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.key == key)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadarOptions {
    pub include_topics: bool,
    pub include_empty_categories: bool,
}

impl Default for RadarOptions {
    fn default() -> Self {
        Self { include_topics: false, include_empty_categories: true }
    }
}

impl From<&EngineParams> for RadarOptions {
    fn from(p: &EngineParams) -> Self {
        Self {
            include_topics: p.include_topics,
            include_empty_categories: p.include_empty_categories,
        }
    }
}

/// Build the radar for `party` over `columns` (every active topic, in order).
pub fn aggregate(
    party: &Party,
    columns: &[TopicColumn<'_>],
    scope: Scope,
    categorizer: &Categorizer,
    options: RadarOptions,
) -> RadarResult {
    let mut buckets: [Vec<TopicContribution>; 6] = Default::default();
    let mut included = 0usize;

    for col in columns {
        let Some(item) = col.scored_item_for(&party.entity_id) else { continue };
        let topic = col.topic;
        let cat = categorizer.categorize(topic.topic_id.as_str(), &topic.name);
        let topic_name = if topic.name.trim().is_empty() {
            topic.topic_id.to_string()
        } else {
            topic.name.clone()
        };
        buckets[cat.index()].push(TopicContribution {
            topic_id: topic.topic_id.clone(),
            topic_name,
            stance_score: item.stance_score,
            stance_label: item.stance_label,
            confidence: item.confidence,
        });
        included += 1;
    }

    let categories = Category::ALL
        .iter()
        .zip(buckets)
        .filter(|(_, pts)| options.include_empty_categories || !pts.is_empty())
        .map(|(&cat, mut pts)| summarize_bucket(cat, &mut pts, options.include_topics))
        .collect();

    RadarResult {
        entity_type: "party",
        entity_id: party.entity_id.clone(),
        entity_name: party.entity_name.clone(),
        scope,
        topic_total: columns.len(),
        topic_included: included,
        categories,
    }
}

fn summarize_bucket(cat: Category, pts: &mut Vec<TopicContribution>, include_topics: bool) -> CategorySummary {
    let scores: Vec<i32> = pts.iter().map(|p| p.stance_score).collect();
    let topics = if include_topics {
        pts.sort_by(|a, b| a.topic_id.cmp(&b.topic_id));
        std::mem::take(pts)
    } else {
        Vec::new()
    };
    CategorySummary {
        key: cat,
        label: cat.label().to_owned(),
        count: scores.len(),
        median: stats::median(&scores),
        min: scores.iter().copied().min(),
        max: scores.iter().copied().max(),
        topics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pv_core::{ScoreItem, Topic};

    fn topic(id: &str, name: &str) -> Topic {
        Topic { topic_id: id.parse().unwrap(), name: name.into(), description: None, is_active: None }
    }

    fn score(party: &str, v: i32) -> ScoreItem {
        ScoreItem::new(party.parse().unwrap(), StanceLabel::Support, v)
    }

    fn party(id: &str) -> Party {
        Party { entity_id: id.parse().unwrap(), entity_name: Some(format!("{id}党")) }
    }

    #[test]
    fn fixed_order_and_stats() {
        let ts = [topic("t1", "財政"), topic("t2", "消費税"), topic("t3", "賃金"), topic("t4", "防衛")];
        let s1 = [score("a", -50)];
        let s2 = [score("a", 50)];
        let s3 = [score("a", 0)];
        let s4 = [score("b", 10)];
        let cols = [
            TopicColumn::new(&ts[0], &s1),
            TopicColumn::new(&ts[1], &s2),
            TopicColumn::new(&ts[2], &s3),
            TopicColumn::new(&ts[3], &s4),
        ];
        let r = aggregate(&party("a"), &cols, Scope::Official, &Categorizer::new(), RadarOptions::default());

        let keys: Vec<Category> = r.categories.iter().map(|c| c.key).collect();
        assert_eq!(keys, Category::ALL.to_vec());
        assert_eq!(r.topic_total, 4);
        assert_eq!(r.topic_included, 3);

        let eco = r.category(Category::Economy).unwrap();
        assert_eq!((eco.count, eco.median, eco.min, eco.max), (3, Some(0.0), Some(-50), Some(50)));
        assert!(eco.topics.is_empty());

        let sec = r.category(Category::Security).unwrap();
        assert_eq!((sec.count, sec.median, sec.min, sec.max), (0, None, None, None));
    }

    #[test]
    fn even_count_median_is_midpoint() {
        let ts = [topic("t1", "財政"), topic("t2", "税")];
        let s1 = [score("a", -50)];
        let s2 = [score("a", 0)];
        let cols = [TopicColumn::new(&ts[0], &s1), TopicColumn::new(&ts[1], &s2)];
        let r = aggregate(&party("a"), &cols, Scope::Official, &Categorizer::new(), RadarOptions::default());
        assert_eq!(r.category(Category::Economy).unwrap().median, Some(-25.0));
    }

    #[test]
    fn placeholders_and_absent_rows_are_skipped() {
        let ts = [topic("t1", "財政"), topic("t2", "防衛")];
        let mut ph = ScoreItem::new("a".parse().unwrap(), StanceLabel::NotMentioned, 0);
        ph.rationale = "スコア未作成".into();
        let s1 = [ph];
        let cols = [TopicColumn::new(&ts[0], &s1), TopicColumn::new(&ts[1], &[])];
        let r = aggregate(&party("a"), &cols, Scope::Mixed, &Categorizer::new(), RadarOptions::default());
        assert_eq!(r.topic_included, 0);
        assert_eq!(r.categories.len(), 6);
        assert!(r.categories.iter().all(|c| c.count == 0 && c.median.is_none()));
        assert_eq!(r.scope, Scope::Mixed);
    }

    #[test]
    fn options_shape_output() {
        let ts = [topic("zz", "財政"), topic("aa", "税")];
        let s1 = [score("a", 10)];
        let s2 = [score("a", 20)];
        let cols = [TopicColumn::new(&ts[0], &s1), TopicColumn::new(&ts[1], &s2)];
        let opts = RadarOptions { include_topics: true, include_empty_categories: false };
        let r = aggregate(&party("a"), &cols, Scope::Official, &Categorizer::new(), opts);
        assert_eq!(r.categories.len(), 1);
        let ids: Vec<&str> = r.categories[0].topics.iter().map(|t| t.topic_id.as_str()).collect();
        assert_eq!(ids, ["aa", "zz"]);
    }

    #[test]
    fn serializes_with_wire_names() {
        let ts = [topic("t1", "財政")];
        let s1 = [score("a", 60)];
        let cols = [TopicColumn::new(&ts[0], &s1)];
        let r = aggregate(&party("a"), &cols, Scope::Official, &Categorizer::new(), RadarOptions::default());
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["entity_type"], "party");
        assert_eq!(v["scope"], "official");
        assert_eq!(v["categories"][0]["key"], "economy");
        assert_eq!(v["categories"][0]["label"], "経済・財政");
        assert_eq!(v["categories"][0]["median"], 60.0);
        assert!(v["categories"][1]["median"].is_null());
    }
}
