//! pv_pipeline — radar data provider for the PartyViz engine.
//!
//! Wires a score source (`source`) to the algorithms in `pv_algo` and keeps
//! the per-(generation, scope) summary cache (`cache`). The provider itself
//! lives in `provider`. File access is delegated to `pv_io`.

#![forbid(unsafe_code)]

use std::fmt;
use std::path::Path;

use pv_core::EngineParams;
use pv_io::IoError;
use thiserror::Error;

pub mod cache;
pub mod provider;
pub mod source;

pub use cache::{CacheStats, SummaryCache};
pub use provider::{PositionsResult, RadarProvider, TopicDetail};
pub use source::ScoreSource;

// ---------------------------- Errors ----------------------------

/// What a failed lookup was looking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotFoundKind {
    Party,
    Topic,
    Score,
}

impl fmt::Display for NotFoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NotFoundKind::Party => "party",
            NotFoundKind::Topic => "topic",
            NotFoundKind::Score => "score",
        })
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: NotFoundKind, id: String },

    #[error(transparent)]
    Io(#[from] IoError),
}

impl PipelineError {
    pub(crate) fn not_found(kind: NotFoundKind, id: impl fmt::Display) -> Self {
        PipelineError::NotFound { kind, id: id.to_string() }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

// ---------------------------- Entry points ----------------------------

/// Provider over a snapshot file.
pub fn open_snapshot(path: &Path, params: EngineParams) -> PipelineResult<RadarProvider> {
    let snap = pv_io::loader::load_snapshot(path)?;
    Ok(RadarProvider::new(snap, params))
}

/// Provider over recorded live responses.
pub fn open_feed(path: &Path, params: EngineParams) -> PipelineResult<RadarProvider> {
    let feed = pv_io::loader::load_feed(path)?;
    Ok(RadarProvider::new(feed, params))
}
