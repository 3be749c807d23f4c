//! pv_core — Core types, domains and ordering helpers for the PartyViz engine.
//!
//! This crate is **I/O-free**. It defines stable types used across the
//! workspace (`pv_io`, `pv_algo`, `pv_pipeline`, `pv_cli`).
//!
//! - Identifiers: `EntityId`, `TopicId`, `Generation`
//! - Snapshot entities: `Topic`, `ScoreItem`, `Evidence`, `StanceLabel`
//! - Fixed radar axes: `Category` (six buckets, fixed order)
//! - Domains: `Scope`, `EngineParams`
//! - Deterministic ordering helpers (first-seen order, total f64 order)
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain parsing.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub enum CoreError {
        EmptyId,
        InvalidGeneration,
        UnknownScope(String),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::EmptyId => write!(f, "empty id"),
                CoreError::InvalidGeneration => write!(f, "invalid generation token"),
                CoreError::UnknownScope(k) => write!(f, "unknown scope: {k}"),
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub mod category;
pub mod determinism;
pub mod entities;
pub mod ids;
pub mod params;

pub use category::Category;
pub use entities::{Evidence, ScoreItem, ScoreMeta, StanceLabel, Topic};
pub use errors::CoreError;
pub use ids::{EntityId, Generation, TopicId};
pub use params::{EngineParams, Scope};
