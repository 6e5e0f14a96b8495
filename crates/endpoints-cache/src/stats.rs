//! Cache statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for cache operations.
///
/// All counters are atomic and can be safely read from other threads while
/// the cache is in use.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Number of slice updates.
    slices_updated: AtomicU64,
    /// Number of slice deletes that removed something.
    slices_deleted: AtomicU64,
    /// Number of endpoint maps built.
    maps_built: AtomicU64,
    /// Ports skipped because their number was zero or out of range.
    invalid_ports: AtomicU64,
    /// Endpoints skipped because they had no targets.
    empty_endpoints: AtomicU64,
    /// Endpoints skipped because of their IP family.
    ip_family_mismatches: AtomicU64,
    /// Events a recorder failed to accept.
    events_dropped: AtomicU64,
}

impl CacheStats {
    /// Create new cache statistics.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_update(&self) {
        self.slices_updated.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_delete(&self) {
        self.slices_deleted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_map_built(&self) {
        self.maps_built.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_invalid_port(&self) {
        self.invalid_ports.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_empty_endpoint(&self) {
        self.empty_endpoints.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_ip_family_mismatch(&self) {
        self.ip_family_mismatches.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_event_dropped(&self) {
        self.events_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total slice updates.
    #[inline]
    pub fn slices_updated(&self) -> u64 {
        self.slices_updated.load(Ordering::Relaxed)
    }

    /// Get total slice deletes.
    #[inline]
    pub fn slices_deleted(&self) -> u64 {
        self.slices_deleted.load(Ordering::Relaxed)
    }

    /// Get total endpoint maps built.
    #[inline]
    pub fn maps_built(&self) -> u64 {
        self.maps_built.load(Ordering::Relaxed)
    }

    /// Get total invalid ports skipped.
    #[inline]
    pub fn invalid_ports(&self) -> u64 {
        self.invalid_ports.load(Ordering::Relaxed)
    }

    /// Get total target-less endpoints skipped.
    #[inline]
    pub fn empty_endpoints(&self) -> u64 {
        self.empty_endpoints.load(Ordering::Relaxed)
    }

    /// Get total IP family mismatches.
    #[inline]
    pub fn ip_family_mismatches(&self) -> u64 {
        self.ip_family_mismatches.load(Ordering::Relaxed)
    }

    /// Get total events a recorder failed to accept.
    #[inline]
    pub fn events_dropped(&self) -> u64 {
        self.events_dropped.load(Ordering::Relaxed)
    }

    /// Reset all statistics.
    pub fn reset(&self) {
        self.slices_updated.store(0, Ordering::Relaxed);
        self.slices_deleted.store(0, Ordering::Relaxed);
        self.maps_built.store(0, Ordering::Relaxed);
        self.invalid_ports.store(0, Ordering::Relaxed);
        self.empty_endpoints.store(0, Ordering::Relaxed);
        self.ip_family_mismatches.store(0, Ordering::Relaxed);
        self.events_dropped.store(0, Ordering::Relaxed);
    }
}
