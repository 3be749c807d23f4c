//! Loader: read local JSON artifacts (snapshot, recorded feed, engine params)
//! with a size cap, deserialize into typed documents and stamp the content
//! generation. No network I/O.

#![forbid(unsafe_code)]

use std::fs::File;
use std::io::Read;
use std::path::Path;

use pv_core::EngineParams;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::feed::{FeedBundle, PositionsFeed};
use crate::hasher;
use crate::snapshot::{Snapshot, SnapshotDoc};
use crate::{IoError, IoResult};

/// Snapshots are a few MiB in practice.
pub const MAX_SNAPSHOT_BYTES: u64 = 64 * 1024 * 1024;
pub const MAX_PARAMS_BYTES: u64 = 1024 * 1024;

// ----------------------------- Raw reads -----------------------------

/// Read at most `limit` bytes from `path`; a larger file is an error rather
/// than a silent truncation.
pub fn read_with_limit(path: &Path, limit: u64) -> IoResult<Vec<u8>> {
    let f = File::open(path).map_err(|e| IoError::Path(format!("{} ({e})", path.display())))?;
    let mut buf = Vec::new();
    f.take(limit + 1)
        .read_to_end(&mut buf)
        .map_err(|e| IoError::Path(format!("{} ({e})", path.display())))?;
    if buf.len() as u64 > limit {
        return Err(IoError::Limit(format!("{} exceeds {limit} bytes", path.display())));
    }
    debug!(path = %path.display(), bytes = buf.len(), sha256 = %hasher::sha256_hex(&buf), "read input");
    Ok(buf)
}

fn parse_json<T: DeserializeOwned>(bytes: &[u8]) -> IoResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}

// ----------------------------- Snapshot -----------------------------

/// Parse a snapshot document from bytes and compute its generation.
pub fn parse_snapshot(bytes: &[u8]) -> IoResult<Snapshot> {
    let doc: SnapshotDoc = parse_json(bytes)?;
    Ok(Snapshot::from_doc(doc)?)
}

pub fn load_snapshot(path: &Path) -> IoResult<Snapshot> {
    let bytes = read_with_limit(path, MAX_SNAPSHOT_BYTES)?;
    let snap = parse_snapshot(&bytes)?;
    info!(
        path = %path.display(),
        generation = %snap.generation(),
        topics = snap.doc().topics.len(),
        official = snap.doc().positions.len(),
        mixed = snap.doc().positions_mixed.len(),
        "snapshot loaded"
    );
    Ok(snap)
}

// ----------------------------- Feed -----------------------------

/// Load recorded API responses (`{"topics": [...], "positions": [...], "positions_mixed": [...]}`).
pub fn load_feed(path: &Path) -> IoResult<PositionsFeed> {
    let bytes = read_with_limit(path, MAX_SNAPSHOT_BYTES)?;
    let bundle: FeedBundle = parse_json(&bytes)?;
    let feed = PositionsFeed::from_bundle(bundle)?;
    info!(path = %path.display(), generation = %feed.generation(), "feed loaded");
    Ok(feed)
}

// ----------------------------- Params -----------------------------

/// Engine parameters; absent keys take their defaults, unknown keys are rejected.
pub fn load_params(path: &Path) -> IoResult<EngineParams> {
    let bytes = read_with_limit(path, MAX_PARAMS_BYTES)?;
    let params: EngineParams = parse_json(&bytes)?;
    debug!(
        path = %path.display(),
        include_topics = params.include_topics,
        include_empty_categories = params.include_empty_categories,
        mixed_fallback = params.mixed_fallback,
        overrides = params.category_overrides.len(),
        "params loaded"
    );
    Ok(params)
}
