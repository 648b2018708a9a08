//! Packrat memoization cache.
//!
//! Entries are keyed by (rule, start position) and written at most once
//! per parse: [`PackratCache::begin`] marks a key in flight when its
//! rule starts evaluating, [`PackratCache::complete`] stores the rule's
//! outcome. Hitting an in-flight key means the rule re-entered itself
//! at the same position, which packrat evaluation cannot resolve; the
//! parser reports it as left recursion. The cache belongs to a single
//! parse: [`Parser::parse`](crate::parser::Parser::parse) clears it
//! before evaluating.

use crate::result::ParseResult;
use hashbrown::HashMap;
use lasso::Spur;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    pub(crate) rule: Spur,
    pub(crate) position: usize,
}

#[derive(Debug, Clone)]
pub(crate) enum CacheEntry {
    /// The rule is currently evaluating at this position.
    InFlight,
    /// The rule's settled outcome at this position.
    Done(ParseResult),
}

#[derive(Debug, Default)]
pub(crate) struct PackratCache {
    entries: HashMap<CacheKey, CacheEntry, ahash::RandomState>,
}

impl PackratCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn get(&self, key: CacheKey) -> Option<&CacheEntry> {
        self.entries.get(&key)
    }

    /// Mark `key` as currently evaluating.
    pub(crate) fn begin(&mut self, key: CacheKey) {
        debug_assert!(
            !self.entries.contains_key(&key),
            "memo entry written twice for the same (rule, position)"
        );
        self.entries.insert(key, CacheEntry::InFlight);
    }

    /// Settle `key` with the rule's outcome, replacing its in-flight marker.
    pub(crate) fn complete(&mut self, key: CacheKey, result: ParseResult) {
        debug_assert!(
            matches!(self.entries.get(&key), Some(CacheEntry::InFlight)),
            "memo entry settled without a begin"
        );
        self.entries.insert(key, CacheEntry::Done(result));
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
