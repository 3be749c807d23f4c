//! Engine domains: data-provenance `Scope` and the tunable `EngineParams`.

use std::collections::BTreeMap;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::errors::CoreError;
use crate::ids::TopicId;

/// Which evidence set a score run used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Scope {
    /// Official party sources only.
    #[default]
    Official,
    /// Official plus external sources.
    Mixed,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Official => "official",
            Scope::Mixed => "mixed",
        }
    }

    /// Lenient normalization used by the public endpoints:
    /// trimmed, case-insensitive, anything unrecognized is `Official`.
    pub fn normalize(raw: Option<&str>) -> Scope {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "official" => Ok(Scope::Official),
            "mixed" => Ok(Scope::Mixed),
            _ => Err(CoreError::UnknownScope(s.to_string())),
        }
    }
}

/// Tunables for radar and lookup behaviour. Defaults reproduce the public
/// visualization exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct EngineParams {
    /// Attach per-topic contributions to each category of the all-party radar.
    /// The single-party radar always carries them.
    pub include_topics: bool,
    /// Emit categories with no scores (count 0). When false they are dropped.
    pub include_empty_categories: bool,
    /// Positions/detail lookups in `mixed` scope fall back to `official`
    /// when the topic has no mixed run. Radar and summaries never fall back.
    pub mixed_fallback: bool,
    /// Explicit topic → category assignments that win over keyword matching.
    pub category_overrides: BTreeMap<TopicId, Category>,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            include_topics: false,
            include_empty_categories: true,
            mixed_fallback: true,
            category_overrides: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_normalization() {
        assert_eq!(Scope::normalize(Some(" MIXED ")), Scope::Mixed);
        assert_eq!(Scope::normalize(Some("official")), Scope::Official);
        assert_eq!(Scope::normalize(Some("external")), Scope::Official);
        assert_eq!(Scope::normalize(None), Scope::Official);
        assert!("external".parse::<Scope>().is_err());
    }

    #[test]
    fn defaults_match_public_view() {
        let p = EngineParams::default();
        assert!(!p.include_topics);
        assert!(p.include_empty_categories);
        assert!(p.mixed_fallback);
        assert!(p.category_overrides.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn params_from_partial_json() {
        let p: EngineParams = serde_json::from_str(
            r#"{"include_topics": true, "category_overrides": {"energy": "economy"}}"#,
        )
        .unwrap();
        assert!(p.include_topics);
        assert!(p.include_empty_categories);
        let tid: TopicId = "energy".parse().unwrap();
        assert_eq!(p.category_overrides.get(&tid), Some(&Category::Economy));

        assert!(serde_json::from_str::<EngineParams>(r#"{"bogus": 1}"#).is_err());
    }
}
