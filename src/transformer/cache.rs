//! Match outcome caching across collection cycles.
//!
//! [`MatchedRulesCache`] memoizes, per rule, the outcome of matching a
//! cache key — including explicit non-matches, so a bean that failed a
//! pattern once is not matched against the same pattern in later cycles.
//! [`StalenessTracker`] records which keys a cycle actually touched; keys
//! not observed in the most recent cycle are evicted at cycle end, which
//! bounds the cache to the live bean population.
//!
//! A cache instance belongs to exactly one [`Configuration`]
//! (`crate::config::Configuration`) and is discarded with it on reload.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use dashmap::DashMap;

use super::engine::MatchedRule;

/// A memoized evaluation outcome for one (rule, cache key) pair.
#[derive(Debug, Clone)]
pub enum CachedOutcome {
    /// The rule matched; the resolved sample shape is reused as-is.
    Matched(Arc<MatchedRule>),
    /// The rule did not match; skip it without re-running the pattern.
    Unmatched,
}

/// Per-rule cache from match key to [`CachedOutcome`].
///
/// Rules are addressed by their index in the configuration's rule set.
/// Each per-rule map is a `DashMap` so overlapping collection cycles on
/// the same configuration can read and write concurrently.
#[derive(Debug)]
pub struct MatchedRulesCache {
    per_rule: Vec<DashMap<String, CachedOutcome>>,
}

impl MatchedRulesCache {
    /// Create a cache with one empty map per rule.
    pub fn new(rule_count: usize) -> Self {
        Self {
            per_rule: (0..rule_count).map(|_| DashMap::new()).collect(),
        }
    }

    /// Store an outcome for a rule and cache key.
    pub fn put(&self, rule_index: usize, cache_key: &str, outcome: CachedOutcome) {
        if let Some(entries) = self.per_rule.get(rule_index) {
            entries.insert(cache_key.to_string(), outcome);
        }
    }

    /// Look up the outcome for a rule and cache key.
    pub fn get(&self, rule_index: usize, cache_key: &str) -> Option<CachedOutcome> {
        self.per_rule
            .get(rule_index)?
            .get(cache_key)
            .map(|entry| entry.value().clone())
    }

    /// Remove every cached key that was not observed in the just-completed
    /// cycle.
    pub fn evict_stale(&self, tracker: &StalenessTracker) {
        for (rule_index, entries) in self.per_rule.iter().enumerate() {
            entries.retain(|cache_key, _| tracker.contains(rule_index, cache_key));
        }
    }

    /// Total number of cached entries across all rules.
    pub fn entry_count(&self) -> usize {
        self.per_rule.iter().map(|entries| entries.len()).sum()
    }
}

/// Per-cycle record of the cache keys each rule touched.
///
/// Created fresh for every collection cycle, consumed once by
/// [`MatchedRulesCache::evict_stale`], then dropped.
#[derive(Debug, Default)]
pub struct StalenessTracker {
    observed: HashMap<usize, HashSet<String>>,
}

impl StalenessTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a cache key as observed for a rule in this cycle.
    pub fn add(&mut self, rule_index: usize, cache_key: &str) {
        self.observed
            .entry(rule_index)
            .or_default()
            .insert(cache_key.to_string());
    }

    /// True when the key was observed for the rule this cycle.
    pub fn contains(&self, rule_index: usize, cache_key: &str) -> bool {
        self.observed
            .get(&rule_index)
            .is_some_and(|keys| keys.contains(cache_key))
    }

    /// Total number of observed (rule, key) pairs.
    pub fn cached_count(&self) -> usize {
        self.observed.values().map(|keys| keys.len()).sum()
    }
}
