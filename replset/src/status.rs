//! Caching of the replica set status across reconciliation passes.
//!
//! The status query is comparatively expensive and its result changes slowly,
//! so passes reuse a cached snapshot inside an explicit freshness window. The
//! window is independent from the loop cadence and tunable on its own.

use std::time::{Duration, Instant};

use crate::types::{NOT_YET_INITIALIZED_CODE, ReplicaSetStatus};

/// Dispatch decision derived from the cached status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDisposition {
    /// The set is healthy; diff and apply may run.
    Healthy,
    /// The set has never been initiated and must be bootstrapped.
    Uninitialized,
    /// Any other status code; the pass logs it and skips the mutation phase.
    Unhandled(i32),
}

impl StatusDisposition {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => StatusDisposition::Healthy,
            NOT_YET_INITIALIZED_CODE => StatusDisposition::Uninitialized,
            code => StatusDisposition::Unhandled(code),
        }
    }
}

/// Cache of the last fetched replica set status.
#[derive(Debug)]
pub struct StatusCache {
    status: Option<ReplicaSetStatus>,
    fetched_at: Option<Instant>,
    freshness: Duration,
}

impl StatusCache {
    pub fn new(freshness: Duration) -> Self {
        Self {
            status: None,
            fetched_at: None,
            freshness,
        }
    }

    /// Whether the cached status must be refreshed before use.
    ///
    /// True when no fetch ever succeeded or when the last successful fetch
    /// fell out of the freshness window.
    pub fn needs_refresh(&self) -> bool {
        match self.fetched_at {
            None => true,
            Some(fetched_at) => fetched_at.elapsed() > self.freshness,
        }
    }

    /// Records a successfully fetched status and advances the freshness stamp.
    pub fn record_success(&mut self, status: ReplicaSetStatus) {
        self.status = Some(status);
        self.fetched_at = Some(Instant::now());
    }

    /// Records a failed fetch.
    ///
    /// A synthetic unreachable status is cached so the pass still has a
    /// disposition to act on, but the freshness stamp is cleared so the next
    /// pass re-fetches immediately.
    pub fn record_failure(&mut self) {
        self.status = Some(ReplicaSetStatus::unreachable());
        self.fetched_at = None;
    }

    /// Clears the freshness stamp, forcing a refresh on the next pass.
    ///
    /// Used after initiation, where the cached pre-initiation status must not
    /// be trusted.
    pub fn invalidate(&mut self) {
        self.fetched_at = None;
    }

    /// The cached status, if any fetch was recorded.
    pub fn status(&self) -> Option<&ReplicaSetStatus> {
        self.status.as_ref()
    }

    /// Maps the cached status code to a dispatch decision.
    pub fn disposition(&self) -> Option<StatusDisposition> {
        self.status
            .as_ref()
            .map(|status| StatusDisposition::from_code(status.code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_cache_requires_initial_fetch() {
        let cache = StatusCache::new(Duration::from_secs(60));
        assert!(cache.needs_refresh());
        assert!(cache.status().is_none());
        assert_eq!(cache.disposition(), None);
    }

    #[test]
    fn test_success_is_reused_inside_window() {
        let mut cache = StatusCache::new(Duration::from_secs(60));
        cache.record_success(ReplicaSetStatus {
            set: "rs0".to_string(),
            ok: 1,
            code: 0,
            members: Vec::new(),
        });

        assert!(!cache.needs_refresh());
        assert_eq!(cache.disposition(), Some(StatusDisposition::Healthy));
    }

    #[test]
    fn test_expired_window_triggers_refresh() {
        let mut cache = StatusCache::new(Duration::from_millis(5));
        cache.record_success(ReplicaSetStatus::uninitialized());
        std::thread::sleep(Duration::from_millis(10));

        assert!(cache.needs_refresh());
        assert_eq!(cache.disposition(), Some(StatusDisposition::Uninitialized));
    }

    #[test]
    fn test_failure_keeps_cache_stale() {
        let mut cache = StatusCache::new(Duration::from_secs(60));
        cache.record_failure();

        assert!(cache.needs_refresh());
        let status = cache.status().unwrap();
        assert_eq!(status.ok, 0);
        assert_eq!(status.code, crate::types::UNREACHABLE_CODE);
        assert_eq!(cache.disposition(), Some(StatusDisposition::Unhandled(-1)));
    }

    #[test]
    fn test_invalidate_forces_refetch() {
        let mut cache = StatusCache::new(Duration::from_secs(60));
        cache.record_success(ReplicaSetStatus::uninitialized());
        assert!(!cache.needs_refresh());

        cache.invalidate();
        assert!(cache.needs_refresh());
    }

    #[test]
    fn test_disposition_maps_status_codes() {
        let mut cache = StatusCache::new(Duration::from_secs(60));

        cache.record_success(ReplicaSetStatus {
            set: String::new(),
            ok: 0,
            code: 13,
            members: Vec::new(),
        });
        assert_eq!(cache.disposition(), Some(StatusDisposition::Unhandled(13)));
    }
}
