//! Topic categorizer.
//!
//! Maps a topic onto one of the six radar axes by keyword. The keyword sets
//! are tested in table order and the first set with any substring hit wins,
//! so a topic mentioning both 財政 and 防衛 lands in economy.

use std::collections::BTreeMap;

use pv_core::{Category, TopicId};

/// Ordered keyword table. Matching runs against the lower-cased text, so
/// latin keywords are written lower-case.
pub const RULES: &[(Category, &[&str])] = &[
    (
        Category::Economy,
        &["財政", "税", "消費税", "賃金", "物価", "成長", "産業", "経済", "金融", "最低賃金"],
    ),
    (
        Category::Welfare,
        &["社会保障", "年金", "医療", "介護", "子育て", "教育", "奨学", "保育"],
    ),
    (
        Category::Security,
        &["安全保障", "防衛", "外交", "自衛隊", "反撃", "日米", "中国", "北朝鮮"],
    ),
    (
        Category::Rights,
        &["人権", "ジェンダー", "夫婦別姓", "lgbt", "同性", "移民", "難民", "入管", "表現"],
    ),
    (
        Category::Digital,
        &["デジタル", "行政", "規制改革", "ai", "人工知能", "dx", "マイナン"],
    ),
];

/// Keyword-only categorization. Total: unmatched text is `Other`.
pub fn categorize(topic_id: &str, topic_name: &str) -> Category {
    let text = format!("{} {}", topic_id.trim(), topic_name.trim()).to_lowercase();
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(cat, _)| *cat)
        .unwrap_or(Category::Other)
}

/// Keyword categorizer with explicit per-topic overrides.
#[derive(Clone, Debug, Default)]
pub struct Categorizer {
    overrides: BTreeMap<String, Category>,
}

impl Categorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: &BTreeMap<TopicId, Category>) -> Self {
        let overrides = overrides
            .iter()
            .map(|(id, cat)| (id.as_str().trim().to_owned(), *cat))
            .collect();
        Self { overrides }
    }

    pub fn categorize(&self, topic_id: &str, topic_name: &str) -> Category {
        match self.overrides.get(topic_id.trim()) {
            Some(cat) => *cat,
            None => categorize(topic_id, topic_name),
        }
    }
}
