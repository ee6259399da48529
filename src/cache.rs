use chrono::NaiveDate;
use std::collections::HashMap;

/// Injectable memoization for resolved holiday dates, keyed by (name, year).
///
/// The assembler consults and populates a cache when one is supplied, but is
/// correct with no cache at all. Invalidation on definition change is the
/// caller's responsibility.
pub trait ResolutionCache {
    fn get(&self, name: &str, year: i32) -> Option<NaiveDate>;
    fn put(&mut self, name: &str, year: i32, date: NaiveDate);
}

/// In-memory cache; persisted to disk via `persistence`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryCache {
    entries: HashMap<(String, i32), NaiveDate>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &HashMap<(String, i32), NaiveDate> {
        &self.entries
    }

    /// Drop every cached year for a holiday whose definition changed.
    pub fn remove_name(&mut self, name: &str) {
        self.entries.retain(|(cached, _), _| cached != name);
    }
}

impl ResolutionCache for MemoryCache {
    fn get(&self, name: &str, year: i32) -> Option<NaiveDate> {
        self.entries.get(&(name.to_string(), year)).copied()
    }

    fn put(&mut self, name: &str, year: i32, date: NaiveDate) {
        self.entries.insert((name.to_string(), year), date);
    }
}
