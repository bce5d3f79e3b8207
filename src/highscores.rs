//! Final score history
//!
//! Persisted as a JSON array under a fixed key. Newest entry first, capped at
//! three entries; entries are kept in insertion order, not sorted by value.

use crate::consts::HISTORY_LEN;
use crate::persistence::KeyValueStore;

/// Most recent final scores, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryScores {
    entries: Vec<u64>,
}

impl HistoryScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "fn_scores";

    /// Create empty history
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_entries(mut entries: Vec<u64>) -> Self {
        entries.truncate(HISTORY_LEN);
        Self { entries }
    }

    pub fn entries(&self) -> &[u64] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Put a score at the front, dropping whatever falls off the end
    pub fn prepend(&mut self, score: u64) {
        self.entries.insert(0, score);
        self.entries.truncate(HISTORY_LEN);
    }

    /// "Top 3: a | b | c" line for the menu, if there is anything to show
    pub fn summary(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        let joined = self
            .entries
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(" | ");
        Some(format!("Top {HISTORY_LEN}: {joined}"))
    }

    /// Load history; missing or malformed data is an empty history
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(json) = store.get(Self::STORAGE_KEY) else {
            log::info!("No score history found, starting fresh");
            return Self::new();
        };

        match serde_json::from_str::<Vec<u64>>(&json) {
            Ok(entries) => {
                let history = Self::from_entries(entries);
                log::info!("Loaded {} history scores", history.entries.len());
                history
            }
            Err(e) => {
                log::warn!("Ignoring malformed score history: {e}");
                Self::new()
            }
        }
    }

    /// Save history
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(&self.entries) {
            Ok(json) => {
                store.set(Self::STORAGE_KEY, &json);
                log::info!("Score history saved ({} entries)", self.entries.len());
            }
            Err(e) => log::warn!("Failed to encode score history: {e}"),
        }
    }

    /// Record a finished run: re-read what is stored, prepend, save
    pub fn record(&mut self, score: u64, store: &mut dyn KeyValueStore) {
        let mut latest = Self::load(store);
        latest.prepend(score);
        latest.save(store);
        *self = latest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_prepend_keeps_insertion_order() {
        let mut history = HistoryScores::from_entries(vec![300, 200, 100]);
        history.prepend(5);
        // A low score still evicts the oldest entry
        assert_eq!(history.entries(), &[5, 300, 200]);
    }

    #[test]
    fn test_summary() {
        assert_eq!(HistoryScores::new().summary(), None);
        let history = HistoryScores::from_entries(vec![40, 0, 12]);
        assert_eq!(history.summary().as_deref(), Some("Top 3: 40 | 0 | 12"));
    }

    #[test]
    fn test_load_missing_and_malformed() {
        let mut store = MemoryStore::new();
        assert!(HistoryScores::load(&store).is_empty());

        store.set(HistoryScores::STORAGE_KEY, "{not json");
        assert!(HistoryScores::load(&store).is_empty());

        store.set(HistoryScores::STORAGE_KEY, "[-4, 2]");
        assert!(HistoryScores::load(&store).is_empty());
    }

    #[test]
    fn test_load_truncates_long_lists() {
        let mut store = MemoryStore::new();
        store.set(HistoryScores::STORAGE_KEY, "[1,2,3,4,5]");
        assert_eq!(HistoryScores::load(&store).entries(), &[1, 2, 3]);
    }

    #[test]
    fn test_record_rereads_store() {
        let mut store = MemoryStore::new();
        store.set(HistoryScores::STORAGE_KEY, "[7, 8]");

        // In-memory copy is stale; the stored list wins
        let mut history = HistoryScores::new();
        history.record(0, &mut store);

        assert_eq!(history.entries(), &[0, 7, 8]);
        assert_eq!(store.get(HistoryScores::STORAGE_KEY).as_deref(), Some("[0,7,8]"));
    }
}
