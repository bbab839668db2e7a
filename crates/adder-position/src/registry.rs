//! Short-TTL registry of order ids the strategy itself recently cancelled.

use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::trace;

/// Default retention window for cancelled order ids (milliseconds).
pub const DEFAULT_RETENTION_MS: u64 = 30_000;

/// Registry of recently self-cancelled order ids.
///
/// Reconciliation tolerates these ids when they still show up in the
/// exchange's open-order list (cancellation may still be propagating), which
/// distinguishes "orders we cancelled" from orphans we must clean up.
/// Entries are pruned once strictly older than the retention window.
#[derive(Debug)]
pub struct CancelledOidRegistry {
    entries: Mutex<HashMap<u64, u64>>,
    retention_ms: u64,
}

impl CancelledOidRegistry {
    pub fn new(retention_ms: u64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            retention_ms,
        }
    }

    /// Record a cancellation at `now_ms`.
    pub fn record(&self, oid: u64, now_ms: u64) {
        self.entries.lock().insert(oid, now_ms);
        trace!(oid, now_ms, "Recorded cancelled oid");
    }

    /// Whether the oid was recently cancelled by us.
    pub fn contains(&self, oid: u64) -> bool {
        self.entries.lock().contains_key(&oid)
    }

    /// All currently retained oids.
    pub fn oids(&self) -> Vec<u64> {
        self.entries.lock().keys().copied().collect()
    }

    /// Drop entries strictly older than the retention window. Returns the
    /// number of entries removed.
    pub fn prune(&self, now_ms: u64) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, cancelled_at| now_ms.saturating_sub(*cancelled_at) <= self.retention_ms);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for CancelledOidRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_contains() {
        let registry = CancelledOidRegistry::default();
        registry.record(42, 1_000);
        assert!(registry.contains(42));
        assert!(!registry.contains(43));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_prune_removes_strictly_after_retention() {
        let registry = CancelledOidRegistry::new(30_000);
        registry.record(1, 0);

        // Exactly at the window boundary the entry is retained.
        assert_eq!(registry.prune(30_000), 0);
        assert!(registry.contains(1));

        // One millisecond past the window it is dropped.
        assert_eq!(registry.prune(30_001), 1);
        assert!(!registry.contains(1));
    }

    #[test]
    fn test_prune_keeps_fresh_entries() {
        let registry = CancelledOidRegistry::new(30_000);
        registry.record(1, 0);
        registry.record(2, 25_000);

        assert_eq!(registry.prune(31_000), 1);
        assert!(!registry.contains(1));
        assert!(registry.contains(2));
    }

    #[test]
    fn test_oids_snapshot() {
        let registry = CancelledOidRegistry::default();
        registry.record(5, 100);
        registry.record(6, 200);
        let mut oids = registry.oids();
        oids.sort_unstable();
        assert_eq!(oids, vec![5, 6]);
    }
}
