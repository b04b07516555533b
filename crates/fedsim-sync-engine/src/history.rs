//! History fallback
//!
//! When the run is idle and no live metrics have arrived in the current
//! session, the chart falls back to persisted per-round history. The feed is
//! fetched at most once per idle period and cached until live data appears
//! or the status leaves idle.

use serde::{Deserialize, Serialize};

use crate::status::ChartPoint;

/// Persisted snapshot of one past round, delivered newest first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub round_id: u64,
    pub accuracy: f64,
    #[serde(default)]
    pub timestamp: String,
}

/// Cache of history-derived chart points for the current idle period.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryFallback {
    cached: Option<Vec<ChartPoint>>,
    /// Set once a fetch has been dispatched this idle period, whether or not
    /// it succeeded. Cleared only by [`HistoryFallback::invalidate`], so a
    /// failed fetch is not retried before the next idle re-entry.
    attempted: bool,
}

impl HistoryFallback {
    /// Whether the engine should dispatch a history fetch now.
    pub fn should_fetch(&self, idle: bool, live_chart_empty: bool) -> bool {
        idle && live_chart_empty && !self.attempted
    }

    /// Record that a fetch was dispatched.
    pub fn mark_attempted(&mut self) {
        self.attempted = true;
    }

    /// Cache the mapped, ascending chart points from a history feed.
    pub fn store(&mut self, records: Vec<HistoryRecord>) {
        let mut points: Vec<ChartPoint> = records
            .into_iter()
            .map(|r| ChartPoint {
                round: r.round_id,
                loss: None,
                accuracy: Some(r.accuracy),
            })
            .collect();
        // The feed arrives newest first; the chart reads left to right.
        points.sort_by_key(|p| p.round);
        self.cached = Some(points);
        self.attempted = true;
    }

    /// Drop the cache and re-arm the fetch. Called the moment live metrics
    /// become non-empty or the status leaves idle.
    pub fn invalidate(&mut self) {
        self.cached = None;
        self.attempted = false;
    }

    /// The cached fallback points, ascending by round. Empty when no fetch
    /// has succeeded this idle period.
    pub fn points(&self) -> &[ChartPoint] {
        self.cached.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(round_id: u64, accuracy: f64) -> HistoryRecord {
        HistoryRecord {
            round_id,
            accuracy,
            timestamp: String::new(),
        }
    }

    #[test]
    fn test_newest_first_feed_becomes_ascending() {
        let mut fallback = HistoryFallback::default();
        fallback.store(vec![record(3, 0.8), record(2, 0.7), record(1, 0.5)]);

        let points = fallback.points();
        assert_eq!(points.len(), 3);
        assert_eq!((points[0].round, points[0].accuracy), (1, Some(0.5)));
        assert_eq!((points[1].round, points[1].accuracy), (2, Some(0.7)));
        assert_eq!((points[2].round, points[2].accuracy), (3, Some(0.8)));
        assert_eq!(points[0].loss, None);
    }

    #[test]
    fn test_fetches_once_per_idle_period() {
        let mut fallback = HistoryFallback::default();
        assert!(fallback.should_fetch(true, true));

        fallback.mark_attempted();
        assert!(!fallback.should_fetch(true, true));

        // Leaving idle re-arms the fetch for the next idle period.
        fallback.invalidate();
        assert!(fallback.should_fetch(true, true));
    }

    #[test]
    fn test_no_fetch_while_running_or_with_live_data() {
        let fallback = HistoryFallback::default();
        assert!(!fallback.should_fetch(false, true));
        assert!(!fallback.should_fetch(true, false));
    }

    #[test]
    fn test_invalidate_drops_cache() {
        let mut fallback = HistoryFallback::default();
        fallback.store(vec![record(1, 0.5)]);
        assert!(!fallback.points().is_empty());

        fallback.invalidate();
        assert!(fallback.points().is_empty());
    }

    #[test]
    fn test_failed_fetch_leaves_chart_empty_without_retry() {
        let mut fallback = HistoryFallback::default();
        fallback.mark_attempted();
        assert!(fallback.points().is_empty());
        assert!(!fallback.should_fetch(true, true));
    }
}
