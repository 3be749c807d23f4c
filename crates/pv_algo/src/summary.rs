// crates/pv_algo/src/summary.rs
//! Party summary text.
//!
//! A fixed-template paragraph assembled from the party's z-scores:
//!   lead (strongest topics) → comparison (near/far party) → topic count →
//!   fiscal-axis note → supporting quote.
//! No randomness and no locale lookups: identical inputs give identical text.

#[cfg(feature = "serde")]
use serde::Serialize;

use pv_core::determinism::{sort_by_value_asc, sort_by_value_desc};
use pv_core::{EntityId, Scope, TopicId};

use crate::distance::{neighbours, ZTable};
use crate::{Party, TopicColumn};

pub const POSITIVE_TOPICS: usize = 3;
pub const NEGATIVE_TOPICS: usize = 2;

/// Topic-name fragments that mark the fiscal axis.
pub const FISCAL_KEYWORDS: [&str; 4] = ["財政", "財政規律", "財政再建", "積極財政"];

const NOTE_FISCAL_EXPANSION: &str = "財政軸はマイナス側が積極財政寄り。";
const NOTE_FISCAL_DISCIPLINE: &str = "財政軸はプラス側が財政規律寄り。";

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PartySummary {
    pub entity_id: EntityId,
    pub entity_name: Option<String>,
    pub scope: Scope,
    pub summary_text: String,
    pub positive_topics: Vec<String>,
    pub negative_topics: Vec<String>,
    pub near_party: Option<String>,
    pub far_party: Option<String>,
    pub near_party_id: Option<EntityId>,
    pub far_party_id: Option<EntityId>,
    pub evidence_quote: Option<String>,
}

/// Pieces the text is assembled from.
#[derive(Clone, Debug, Default)]
pub struct SummaryParts<'a> {
    pub positive: &'a [String],
    pub negative: &'a [String],
    pub near: Option<&'a str>,
    pub far: Option<&'a str>,
    pub topic_count: usize,
    pub fiscal_note: Option<&'a str>,
    pub quote: Option<&'a str>,
}

pub fn build_summary_text(p: &SummaryParts<'_>) -> String {
    let mut phrases: Vec<String> = Vec::with_capacity(2);
    let pos: Vec<&str> = p.positive.iter().take(2).map(String::as_str).collect();
    if !pos.is_empty() {
        phrases.push(format!("{}に積極的", pos.join("・")));
    }
    if let Some(neg) = p.negative.first() {
        phrases.push(format!("{neg}は慎重"));
    }

    let mut out = if phrases.is_empty() {
        "平均との差が小さい。".to_owned()
    } else {
        format!("平均より{}。", phrases.join("、"))
    };

    match (p.near, p.far) {
        (Some(near), Some(far)) => out.push_str(&format!("{near}に近く、{far}とは差が大きい。")),
        (Some(near), None) => out.push_str(&format!("{near}に近い傾向。")),
        _ => {}
    }
    if p.topic_count > 0 {
        out.push_str(&format!("対象{}件の相対評価。", p.topic_count));
    }
    if let Some(note) = p.fiscal_note {
        out.push_str(note);
    }
    if let Some(q) = p.quote.filter(|q| !q.is_empty()) {
        out.push_str(&format!("根拠:「{q}」"));
    }
    out
}

/// Top positive and negative topic ids by z (stable; ties keep topic order).
pub fn select_topics(z: &[(TopicId, f64)]) -> (Vec<TopicId>, Vec<TopicId>) {
    let mut desc = z.to_vec();
    sort_by_value_desc(&mut desc);
    let mut asc = z.to_vec();
    sort_by_value_asc(&mut asc);
    (
        desc.into_iter().take(POSITIVE_TOPICS).map(|(t, _)| t).collect(),
        asc.into_iter().take(NEGATIVE_TOPICS).map(|(t, _)| t).collect(),
    )
}

/// The first selected fiscal topic decides the note; a zero z gives none.
pub fn fiscal_note<'n>(
    selected: impl IntoIterator<Item = (&'n str, f64)>,
) -> Option<&'static str> {
    let (_, z) = selected
        .into_iter()
        .find(|(name, _)| FISCAL_KEYWORDS.iter().any(|k| name.contains(k)))?;
    if z < 0.0 {
        Some(NOTE_FISCAL_EXPANSION)
    } else if z > 0.0 {
        Some(NOTE_FISCAL_DISCIPLINE)
    } else {
        None
    }
}

/// Trim and collapse every whitespace run (newlines included) to one space.
pub fn clean_quote(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Summaries for every party, in `parties` order.
pub fn summarize_parties(parties: &[Party], columns: &[TopicColumn<'_>], scope: Scope) -> Vec<PartySummary> {
    let table = ZTable::build(parties, columns);
    parties
        .iter()
        .map(|p| summarize_one(p, parties, columns, &table, scope))
        .collect()
}

fn summarize_one(
    party: &Party,
    parties: &[Party],
    columns: &[TopicColumn<'_>],
    table: &ZTable,
    scope: Scope,
) -> PartySummary {
    let z = table.z_scores(&party.entity_id);
    let (pos_ids, neg_ids) = select_topics(z);

    let column = |tid: &TopicId| columns.iter().find(|c| &c.topic.topic_id == tid);
    let name_of = |tid: &TopicId| {
        column(tid)
            .map(|c| c.topic.name.as_str())
            .filter(|n| !n.trim().is_empty())
    };
    let names = |ids: &[TopicId]| -> Vec<String> {
        ids.iter().filter_map(|t| name_of(t)).map(str::to_owned).collect()
    };
    let positive_topics = names(&pos_ids);
    let negative_topics = names(&neg_ids);

    let selected: Vec<&TopicId> = pos_ids.iter().chain(neg_ids.iter()).collect();

    let note = fiscal_note(selected.iter().filter_map(|t| {
        let name = name_of(*t)?;
        Some((name, table.z(&party.entity_id, *t)?))
    }));

    let evidence_quote = selected
        .iter()
        .filter_map(|t| column(*t)?.scored_item_for(&party.entity_id)?.first_quote())
        .map(clean_quote)
        .find(|q| !q.is_empty());

    let nb = neighbours(table, &party.entity_id);
    let display = |id: &Option<EntityId>| -> Option<String> {
        let id = id.as_ref()?;
        let p = parties.iter().find(|p| &p.entity_id == id)?;
        Some(p.display_name().to_owned())
    };
    let near_party = display(&nb.near);
    let far_party = display(&nb.far);

    let summary_text = build_summary_text(&SummaryParts {
        positive: &positive_topics,
        negative: &negative_topics,
        near: near_party.as_deref(),
        far: far_party.as_deref(),
        topic_count: table.scored_count(&party.entity_id),
        fiscal_note: note,
        quote: evidence_quote.as_deref(),
    });

    PartySummary {
        entity_id: party.entity_id.clone(),
        entity_name: party.entity_name.clone(),
        scope,
        summary_text,
        positive_topics,
        negative_topics,
        near_party,
        far_party,
        near_party_id: nb.near,
        far_party_id: nb.far,
        evidence_quote,
    }
}
