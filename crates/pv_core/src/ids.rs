//! crates/pv_core/src/ids.rs
//! Identifier newtypes: party/entity ids, topic ids and the source generation token.
//! Entity and topic ids are opaque upstream strings (UUIDs, slugs, Japanese text);
//! only emptiness is rejected, both by `parse` and on deserialization. No I/O.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

const HEX64_LEN: usize = 64;
const GENERATION_PREFIX: &str = "SNAP:";

/// Lowercase hex (length must be exactly 64).
#[inline]
pub fn is_valid_sha256(s: &str) -> bool {
    s.len() == HEX64_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

macro_rules! simple_string_newtype {
    ($(#[$m:meta])* $name:ident) => {
        $(#[$m])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(try_from = "String"))]
        pub struct $name(String);

        impl $name {
            #[inline] pub fn as_str(&self) -> &str { &self.0 }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str { &self.0 }
        }

        impl TryFrom<&str> for $name {
            type Error = CoreError;
            #[inline]
            fn try_from(value: &str) -> Result<Self, Self::Error> { value.parse() }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;
            #[inline]
            fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
        }
    }
}

// === Opaque ids: EntityId, TopicId ===

simple_string_newtype!(
    /// Party (or politician) identifier as published by the backend.
    EntityId
);
simple_string_newtype!(
    /// Topic identifier (unique within a snapshot).
    TopicId
);

impl FromStr for EntityId {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() { return Err(CoreError::EmptyId); }
        Ok(EntityId(s.to_owned()))
    }
}

impl FromStr for TopicId {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() { return Err(CoreError::EmptyId); }
        Ok(TopicId(s.to_owned()))
    }
}

// === Generation token: "SNAP:" + 64-hex ===

simple_string_newtype!(
    /// "SNAP:" + 64-hex lowercase digest of the loaded source's canonical bytes.
    Generation
);

impl FromStr for Generation {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix(GENERATION_PREFIX).ok_or(CoreError::InvalidGeneration)?;
        if !is_valid_sha256(rest) { return Err(CoreError::InvalidGeneration); }
        Ok(Generation(s.to_owned()))
    }
}

impl Generation {
    /// Build from a bare 64-hex digest.
    pub fn from_hex(hex: &str) -> Result<Self, CoreError> {
        format!("{GENERATION_PREFIX}{hex}").parse()
    }
}

// === Tests ===
