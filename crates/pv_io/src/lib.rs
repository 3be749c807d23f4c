//! pv_io — single-source-of-truth I/O crate for the PartyViz engine.
//!
//! - Typed snapshot document (`snapshot`) and live-payload feed (`feed`).
//! - Local file loaders with size limits (`loader`). No network I/O.
//! - Canonical JSON (`canonical_json`) and SHA-256 generation tokens (`hasher`).
//! - Shared error type (`IoError`) with `From` conversions used across modules.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for pv_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors.
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON deserialization errors with a location hint.
    #[error("json error at {pointer}: {msg}")]
    Json {
        pointer: String,
        msg: String,
    },

    /// Input exceeded the configured size limit.
    #[error("limit exceeded: {0}")]
    Limit(String),

    /// Canonicalization / hashing failures.
    #[error("hash error: {0}")]
    Hash(String),
}

pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json reports line/column rather than a pointer.
        IoError::Json {
            pointer: format!("line {} col {}", e.line(), e.column()),
            msg: e.to_string(),
        }
    }
}

impl From<hasher::HashError> for IoError {
    fn from(e: hasher::HashError) -> Self {
        IoError::Hash(e.to_string())
    }
}

/* ---------------- Public modules ---------------- */

pub mod canonical_json;
pub mod feed;
pub mod hasher;
pub mod loader;
pub mod snapshot;

pub use feed::PositionsFeed;
pub use snapshot::{Rubric, RubricStep, Snapshot, SnapshotDoc, TopicPositions};

pub mod prelude {
    pub use crate::{IoError, IoResult};
    pub use crate::canonical_json::to_canonical_json_bytes;
    pub use crate::hasher::{generation_of, sha256_hex};
    pub use crate::loader::{load_feed, load_params, load_snapshot, parse_snapshot};
    pub use crate::{PositionsFeed, Snapshot, SnapshotDoc, TopicPositions};
}
