//! SHA-256 digests and the source generation token.
//!
//! Structured values are hashed over their canonical JSON form, so key order
//! in the input file never changes a digest. `generation_of` turns that
//! digest into the `SNAP:<hex>` token the summary cache is keyed by.

#![forbid(unsafe_code)]

use std::fmt::Write as _;

use pv_core::Generation;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::canonical_json::to_canonical_bytes;

#[derive(Error, Debug)]
pub enum HashError {
    #[error("cannot serialize for hashing: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("invalid generation digest: {0}")]
    Generation(String),
}

/// Lowercase hex SHA-256 of raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest.iter() {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Digest of the canonical JSON form of `value`.
pub fn sha256_canonical<T: Serialize + ?Sized>(value: &T) -> Result<String, HashError> {
    Ok(sha256_hex(&to_canonical_bytes(value)?))
}

/// `SNAP:<hex>` over the canonical bytes of `value`.
pub fn generation_of<T: Serialize + ?Sized>(value: &T) -> Result<Generation, HashError> {
    let hex = sha256_canonical(value)?;
    Generation::from_hex(&hex).map_err(|e| HashError::Generation(e.to_string()))
}
