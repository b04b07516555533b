//! Ledger feed store
//!
//! The backend re-sends the full ledger (newest first) on every poll, so the
//! store's contract is replace-on-poll, not append. Deduplication by `id` is
//! defensive; the feed order is the backend's and is never re-sorted.

use std::collections::HashSet;

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One signed model-update record, opaque beyond its display fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: u64,
    /// Round the update belongs to; older feed variants omit it.
    #[serde(default)]
    pub round: Option<u64>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub data_hash: String,
    #[serde(default)]
    pub signature: String,
}

impl LedgerEntry {
    /// Clock-time label for the entry, falling back to the raw timestamp
    /// when it is not RFC 3339.
    pub fn time_label(&self) -> String {
        match DateTime::parse_from_rfc3339(&self.timestamp) {
            Ok(parsed) => parsed.format("%H:%M:%S").to_string(),
            Err(_) => self.timestamp.clone(),
        }
    }
}

/// The set of ledger entries known so far, newest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LedgerStore {
    entries: Vec<LedgerEntry>,
}

impl LedgerStore {
    /// Replace the visible sequence with the latest feed.
    ///
    /// Duplicate ids keep their first (newest) occurrence.
    pub fn ingest(&mut self, feed: Vec<LedgerEntry>) {
        let mut seen = HashSet::with_capacity(feed.len());
        let before = feed.len();
        self.entries = feed.into_iter().filter(|e| seen.insert(e.id)).collect();
        if self.entries.len() < before {
            debug!(
                dropped = before - self.entries.len(),
                "dropped duplicate ledger ids"
            );
        }
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// The first `n` entries (already newest first), for preview panels.
    /// Empty store yields an empty slice, never an error.
    pub fn top_n(&self, n: usize) -> &[LedgerEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, client: &str) -> LedgerEntry {
        LedgerEntry {
            id,
            client: client.to_string(),
            timestamp: "2026-08-05T10:00:00+00:00".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_ingest_replaces_previous_feed() {
        let mut store = LedgerStore::default();
        store.ingest(vec![entry(3, "a"), entry(2, "b"), entry(1, "c")]);
        assert_eq!(store.len(), 3);

        store.ingest(vec![entry(4, "d"), entry(3, "a")]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.entries()[0].id, 4);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mut store = LedgerStore::default();
        store.ingest(vec![entry(2, "first"), entry(1, "x"), entry(2, "second")]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.entries()[0].client, "first");
    }

    #[test]
    fn test_feed_order_is_preserved() {
        let mut store = LedgerStore::default();
        // Backend order, even if not monotone, must come through untouched.
        store.ingest(vec![entry(5, "a"), entry(9, "b"), entry(1, "c")]);
        let ids: Vec<u64> = store.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![5, 9, 1]);
    }

    #[test]
    fn test_top_n_on_empty_store() {
        let store = LedgerStore::default();
        assert!(store.top_n(5).is_empty());
    }

    #[test]
    fn test_top_n_clamps_to_len() {
        let mut store = LedgerStore::default();
        store.ingest(vec![entry(2, "a"), entry(1, "b")]);
        assert_eq!(store.top_n(5).len(), 2);
        assert_eq!(store.top_n(1).len(), 1);
        assert_eq!(store.top_n(1)[0].id, 2);
    }

    #[test]
    fn test_time_label_falls_back_to_raw() {
        let mut e = entry(1, "a");
        assert_eq!(e.time_label(), "10:00:00");

        e.timestamp = "not a timestamp".to_string();
        assert_eq!(e.time_label(), "not a timestamp");
    }

    #[test]
    fn test_entry_decodes_with_missing_fields() {
        let e: LedgerEntry = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(e.id, 7);
        assert!(e.client.is_empty());
        assert_eq!(e.round, None);
    }
}
