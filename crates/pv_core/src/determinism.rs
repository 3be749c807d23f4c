//! Determinism utilities: stable ordering for float-keyed rankings and
//! first-seen (discovery) ordering.
//!
//! This module is **I/O-free**. All sorts here are stable: equal keys keep
//! their input order, which is how ties are broken everywhere in the engine.

use core::cmp::Ordering;
use std::collections::BTreeSet;

/* -------------------------------------------------------------------------- */
/*                               Float ordering                               */
/* -------------------------------------------------------------------------- */

/// Total order on `f64` (IEEE-754 `totalOrder`), so NaN cannot poison a sort.
#[inline]
pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Stable ascending sort of `(key, value)` pairs by value.
#[inline]
pub fn sort_by_value_asc<K>(xs: &mut [(K, f64)]) {
    xs.sort_by(|a, b| cmp_f64(a.1, b.1));
}

/// Stable descending sort of `(key, value)` pairs by value.
/// Equal values keep input order (not reversed).
#[inline]
pub fn sort_by_value_desc<K>(xs: &mut [(K, f64)]) {
    xs.sort_by(|a, b| cmp_f64(b.1, a.1));
}

/* -------------------------------------------------------------------------- */
/*                              First-seen order                              */
/* -------------------------------------------------------------------------- */

/// Insertion-ordered set: remembers the order in which keys were first seen.
#[derive(Clone, Debug)]
pub struct FirstSeen<K: Ord + Clone> {
    order: Vec<K>,
    seen: BTreeSet<K>,
}

impl<K: Ord + Clone> Default for FirstSeen<K> {
    fn default() -> Self {
        Self { order: Vec::new(), seen: BTreeSet::new() }
    }
}

impl<K: Ord + Clone> FirstSeen<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `k` was not seen before.
    pub fn insert(&mut self, k: &K) -> bool {
        if self.seen.contains(k) {
            return false;
        }
        self.seen.insert(k.clone());
        self.order.push(k.clone());
        true
    }

    /// Keys in first-seen order.
    pub fn into_vec(self) -> Vec<K> {
        self.order
    }
}

/* ---------------------------------- Tests --------------------------------- */
