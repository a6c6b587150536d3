use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::models::Row;

/// Sliding window of recent snap results shared by every row of a session.
///
/// Unsnapped samples take up a slot too, so noise between passes dilutes the
/// evidence for all rows alike.
#[derive(Debug, Clone)]
pub struct EvidenceWindow {
    recent: VecDeque<Option<u32>>,
    capacity: usize,
    min_hits: usize,
}

impl EvidenceWindow {
    /// Both bounds come from a validated `TrackerConfig`: `capacity >= 1`
    /// and `1 <= min_hits <= capacity`.
    pub fn new(capacity: usize, min_hits: usize) -> Self {
        Self {
            recent: VecDeque::with_capacity(capacity),
            capacity,
            min_hits,
        }
    }

    pub fn clear(&mut self) {
        self.recent.clear();
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.recent.len()
    }

    /// How many window entries snapped to `row_index`.
    pub fn hits(&self, row_index: u32) -> usize {
        self.recent
            .iter()
            .filter(|entry| **entry == Some(row_index))
            .count()
    }

    /// Record one resolved sample and apply the spray rule.
    ///
    /// When the sample snapped to row `k` and `k` now has at least
    /// `min_hits` entries in the window, row `k` is marked sprayed at `at`.
    /// Returns true only when this call flipped the row from unsprayed.
    pub fn accumulate(&mut self, snapped: Option<u32>, at: DateTime<Utc>, rows: &mut [Row]) -> bool {
        if self.recent.len() == self.capacity {
            self.recent.pop_front();
        }
        self.recent.push_back(snapped);

        let Some(row_index) = snapped else {
            return false;
        };
        if self.hits(row_index) < self.min_hits {
            return false;
        }

        rows.iter_mut()
            .find(|row| row.index == row_index)
            .map(|row| row.mark_sprayed(at))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use geo_types::LineString;

    fn rows(n: u32) -> Vec<Row> {
        (1..=n)
            .map(|i| {
                let lon = i as f64;
                Row::new(i, LineString::from(vec![(lon, 0.0), (lon, 1.0)]))
            })
            .collect()
    }

    #[test]
    fn single_hit_does_not_spray() {
        let mut rows = rows(3);
        let mut window = EvidenceWindow::new(10, 3);
        assert!(!window.accumulate(Some(2), Utc::now(), &mut rows));
        assert!(rows.iter().all(|r| !r.sprayed));
    }

    #[test]
    fn third_hit_sprays_and_records_time() {
        let mut rows = rows(3);
        let mut window = EvidenceWindow::new(10, 3);
        let t0 = Utc::now();

        assert!(!window.accumulate(Some(2), t0, &mut rows));
        assert!(!window.accumulate(Some(2), t0 + Duration::seconds(1), &mut rows));
        assert!(window.accumulate(Some(2), t0 + Duration::seconds(2), &mut rows));

        assert!(rows[1].sprayed);
        assert_eq!(rows[1].last_sprayed_at, Some(t0 + Duration::seconds(2)));
        assert!(!rows[0].sprayed && !rows[2].sprayed);
    }

    #[test]
    fn further_hits_refresh_timestamp_without_reflagging() {
        let mut rows = rows(1);
        let mut window = EvidenceWindow::new(10, 3);
        let t0 = Utc::now();
        for s in 0..3 {
            window.accumulate(Some(1), t0 + Duration::seconds(s), &mut rows);
        }
        let later = t0 + Duration::seconds(10);
        assert!(!window.accumulate(Some(1), later, &mut rows));
        assert_eq!(rows[0].last_sprayed_at, Some(later));
    }

    #[test]
    fn interleaved_hits_dilute_both_rows() {
        let mut rows = rows(2);
        let mut window = EvidenceWindow::new(10, 3);
        for snapped in [Some(1), Some(2), Some(1), Some(2)] {
            window.accumulate(snapped, Utc::now(), &mut rows);
        }
        assert!(!rows[0].sprayed);
        assert!(!rows[1].sprayed);
        assert_eq!(window.hits(1), 2);
        assert_eq!(window.hits(2), 2);
    }

    #[test]
    fn hits_older_than_window_are_evicted() {
        let mut rows = rows(1);
        let mut window = EvidenceWindow::new(10, 3);
        window.accumulate(Some(1), Utc::now(), &mut rows);
        window.accumulate(Some(1), Utc::now(), &mut rows);
        for _ in 0..8 {
            window.accumulate(None, Utc::now(), &mut rows);
        }
        assert_eq!(window.len(), 10);
        assert_eq!(window.hits(1), 2);

        // Third hit arrives just as the first one falls out
        assert!(!window.accumulate(Some(1), Utc::now(), &mut rows));
        assert_eq!(window.len(), 10);
        assert_eq!(window.hits(1), 2);
        assert!(!rows[0].sprayed);
    }

    #[test]
    fn hits_spread_across_window_still_count() {
        let mut rows = rows(1);
        let mut window = EvidenceWindow::new(10, 3);
        let pattern = [Some(1), None, None, None, Some(1), None, None, None, None, Some(1)];
        let mut flipped = false;
        for snapped in pattern {
            flipped |= window.accumulate(snapped, Utc::now(), &mut rows);
        }
        assert!(flipped);
        assert!(rows[0].sprayed);
    }

    #[test]
    fn unsnapped_sample_changes_nothing() {
        let mut rows = rows(2);
        let mut window = EvidenceWindow::new(10, 3);
        assert!(!window.accumulate(None, Utc::now(), &mut rows));
        assert_eq!(window.len(), 1);
        assert!(rows.iter().all(|r| !r.sprayed));
    }
}
