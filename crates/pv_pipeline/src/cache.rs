// crates/pv_pipeline/src/cache.rs
//! Summary cache keyed by (generation, scope).

use std::collections::BTreeMap;

use pv_algo::PartySummary;
use pv_core::{Generation, Scope};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Default)]
pub struct SummaryCache {
    entries: BTreeMap<(Generation, Scope), Vec<PartySummary>>,
    stats: CacheStats,
}

impl SummaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached summaries, computing them with `build` on a miss.
    pub fn get_or_insert_with<F>(&mut self, generation: &Generation, scope: Scope, build: F) -> &[PartySummary]
    where
        F: FnOnce() -> Vec<PartySummary>,
    {
        let key = (generation.clone(), scope);
        if self.entries.contains_key(&key) {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        self.entries.entry(key).or_insert_with(build)
    }

    pub fn contains(&self, generation: &Generation, scope: Scope) -> bool {
        self.entries.contains_key(&(generation.clone(), scope))
    }

    /// Drop every entry not produced from `current`.
    pub fn retain_generation(&mut self, current: &Generation) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(g, _), _| g == current);
        before - self.entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generation(c: char) -> Generation {
        Generation::from_hex(&c.to_string().repeat(64)).unwrap()
    }

    #[test]
    fn hit_after_miss() {
        let mut cache = SummaryCache::new();
        let g = generation('a');
        let mut builds = 0;
        cache.get_or_insert_with(&g, Scope::Official, || { builds += 1; Vec::new() });
        cache.get_or_insert_with(&g, Scope::Official, || { builds += 1; Vec::new() });
        cache.get_or_insert_with(&g, Scope::Mixed, || { builds += 1; Vec::new() });
        assert_eq!(builds, 2);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 2 });
        assert!(cache.contains(&g, Scope::Official) && cache.contains(&g, Scope::Mixed));
    }

    #[test]
    fn stale_generations_are_dropped() {
        let mut cache = SummaryCache::new();
        let (old, new) = (generation('a'), generation('b'));
        cache.get_or_insert_with(&old, Scope::Official, Vec::new);
        cache.get_or_insert_with(&new, Scope::Official, Vec::new);
        assert_eq!(cache.retain_generation(&new), 1);
        assert!(!cache.contains(&old, Scope::Official));
        assert!(cache.contains(&new, Scope::Official));
    }
}
