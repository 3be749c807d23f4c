//! Radar data provider.
//!
//! Owns a score source, the engine parameters and the summary cache, and
//! answers the read operations of the public view: topics, one or all party
//! radars, party summaries, topic positions and single-score detail.
//!
//! The party universe of a source is discovered once per call from the
//! official score lists followed by the mixed ones, so the same parties are
//! listed in either scope.

use pv_algo::{
    aggregate, discover_parties, summarize_parties, Categorizer, Party, PartySummary,
    RadarOptions, RadarResult, TopicColumn,
};
use pv_core::{EngineParams, EntityId, Generation, Scope, ScoreItem, Topic, TopicId};
use pv_io::TopicPositions;
use serde::Serialize;
use tracing::{debug, info};

use crate::cache::{CacheStats, SummaryCache};
use crate::source::ScoreSource;
use crate::{NotFoundKind, PipelineError, PipelineResult};

/// Positions block as served, with the scope it actually came from
/// (`None` when the topic has no run in the requested scope).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PositionsResult {
    pub served_scope: Option<Scope>,
    #[serde(flatten)]
    pub positions: TopicPositions,
}

/// One party's score on one topic together with the axis it is read on.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopicDetail {
    pub topic: Topic,
    pub entity_id: EntityId,
    pub served_scope: Scope,
    pub rubric_version: Option<i64>,
    pub axis_a_label: Option<String>,
    pub axis_b_label: Option<String>,
    pub score: ScoreItem,
}

pub struct RadarProvider {
    source: Box<dyn ScoreSource>,
    params: EngineParams,
    categorizer: Categorizer,
    cache: SummaryCache,
}

impl RadarProvider {
    pub fn new<S: ScoreSource + 'static>(source: S, params: EngineParams) -> Self {
        let categorizer = Categorizer::with_overrides(&params.category_overrides);
        Self { source: Box::new(source), params, categorizer, cache: SummaryCache::new() }
    }

    pub fn generation(&self) -> &Generation {
        self.source.generation()
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Swap in new data. Cached summaries of other generations are dropped.
    pub fn replace_source<S: ScoreSource + 'static>(&mut self, source: S) {
        let previous = self.source.generation().clone();
        self.source = Box::new(source);
        let dropped = self.cache.retain_generation(self.source.generation());
        info!(
            from = %previous,
            to = %self.source.generation(),
            dropped,
            "score source replaced"
        );
    }

    // ---- read operations ----

    pub fn topics(&self) -> Vec<Topic> {
        self.source.active_topics().into_iter().cloned().collect()
    }

    /// Radar for one party. Category topic lists are always attached here;
    /// `include_topics` only gates them for `all_parties_radar`.
    pub fn radar(&self, entity_id: &EntityId, scope: Scope) -> PipelineResult<RadarResult> {
        let party = parties(self.source.as_ref())
            .into_iter()
            .find(|p| &p.entity_id == entity_id)
            .ok_or_else(|| PipelineError::not_found(NotFoundKind::Party, entity_id))?;
        let cols = columns(self.source.as_ref(), scope);
        let options = RadarOptions { include_topics: true, ..RadarOptions::from(&self.params) };
        Ok(aggregate(&party, &cols, scope, &self.categorizer, options))
    }

    pub fn all_parties_radar(&self, scope: Scope) -> Vec<RadarResult> {
        let cols = columns(self.source.as_ref(), scope);
        let options = RadarOptions::from(&self.params);
        parties(self.source.as_ref())
            .iter()
            .map(|p| aggregate(p, &cols, scope, &self.categorizer, options))
            .collect()
    }

    /// Summaries for every party, memoized per (generation, scope).
    pub fn party_summaries(&mut self, scope: Scope) -> &[PartySummary] {
        let generation = self.source.generation().clone();
        let cached = self.cache.contains(&generation, scope);
        debug!(%generation, %scope, cached, "party summaries");

        let source = self.source.as_ref();
        self.cache.get_or_insert_with(&generation, scope, || {
            summarize_parties(&parties(source), &columns(source, scope), scope)
        })
    }

    pub fn topic_positions(&self, topic_id: &TopicId, scope: Scope, fallback: bool) -> PipelineResult<PositionsResult> {
        let topic = self
            .source
            .topic(topic_id)
            .ok_or_else(|| PipelineError::not_found(NotFoundKind::Topic, topic_id))?;

        match self.resolve_positions(topic_id, scope, fallback) {
            Some((served, p)) => Ok(PositionsResult { served_scope: Some(served), positions: p.clone() }),
            None => Ok(PositionsResult {
                served_scope: None,
                positions: TopicPositions {
                    topic: topic.clone(),
                    mode: None,
                    entity: None,
                    rubric_version: None,
                    axis_a_label: None,
                    axis_b_label: None,
                    run_id: None,
                    run_created_at: None,
                    run_scope: None,
                    scores: Vec::new(),
                },
            }),
        }
    }

    pub fn entity_topic_detail(
        &self,
        entity_id: &EntityId,
        topic_id: &TopicId,
        scope: Scope,
        fallback: bool,
    ) -> PipelineResult<TopicDetail> {
        let topic = self
            .source
            .topic(topic_id)
            .ok_or_else(|| PipelineError::not_found(NotFoundKind::Topic, topic_id))?;
        let (served, block) = self
            .resolve_positions(topic_id, scope, fallback)
            .ok_or_else(|| PipelineError::not_found(NotFoundKind::Score, topic_id))?;
        let score = block
            .scores
            .iter()
            .find(|s| &s.entity_id == entity_id)
            .ok_or_else(|| PipelineError::not_found(NotFoundKind::Score, format!("{entity_id}/{topic_id}")))?;

        let rubric = self.source.rubric(topic_id);
        let (axis_a_label, axis_b_label) = match rubric {
            Some(r) => {
                let (a, b) = r.axis_labels();
                (Some(a), Some(b))
            }
            None => (block.axis_a_label.clone(), block.axis_b_label.clone()),
        };

        Ok(TopicDetail {
            topic: topic.clone(),
            entity_id: entity_id.clone(),
            served_scope: served,
            rubric_version: rubric.and_then(|r| r.version).or(block.rubric_version),
            axis_a_label,
            axis_b_label,
            score: score.clone(),
        })
    }

    /// With `fallback`, a mixed lookup without a mixed run is served from official.
    fn resolve_positions(&self, topic_id: &TopicId, scope: Scope, fallback: bool) -> Option<(Scope, &TopicPositions)> {
        if let Some(p) = self.source.positions(topic_id, scope) {
            return Some((scope, p));
        }
        if scope == Scope::Mixed && fallback {
            return self.source.positions(topic_id, Scope::Official).map(|p| (Scope::Official, p));
        }
        None
    }
}

// ---------------------------- columns / parties ----------------------------

/// One column per active topic; topics without a run in `scope` get an empty list.
fn columns(source: &dyn ScoreSource, scope: Scope) -> Vec<TopicColumn<'_>> {
    source
        .active_topics()
        .into_iter()
        .map(|t| {
            let items = source
                .positions(&t.topic_id, scope)
                .map(|p| p.scores.as_slice())
                .unwrap_or(&[]);
            TopicColumn::new(t, items)
        })
        .collect()
}

fn parties(source: &dyn ScoreSource) -> Vec<Party> {
    let mut cols = columns(source, Scope::Official);
    cols.extend(columns(source, Scope::Mixed));
    discover_parties(&cols)
}
