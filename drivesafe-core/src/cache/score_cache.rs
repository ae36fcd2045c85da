//! Score cache.
//!
//! Holds one persisted `ScoreSnapshot` and recomputes it only when the
//! newest trip timestamp is strictly later than the snapshot's
//! `lastUpdated`. The newest timestamp is memoized for a configurable window
//! so freshness checks don't rescan every trip.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::config::CacheConfig;
use crate::error::Result;
use crate::logging::structured::LogContext;
use crate::scoring::engine::ScoringEngine;
use crate::scoring::snapshot::ScoreSnapshot;
use crate::storage::score_store::ScoreStore;

use super::source::{latest_trip_timestamp, TripSource};

/// Handle returned by [`ScoreCache::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type ScoreListener = Arc<dyn Fn(&ScoreSnapshot) + Send + Sync>;

#[derive(Debug, Clone, Copy)]
struct TimestampMemo {
    scanned_at: Instant,
    latest: Option<DateTime<Utc>>,
}

pub struct ScoreCache {
    trips: Arc<dyn TripSource>,
    scores: Arc<dyn ScoreStore>,
    engine: ScoringEngine,
    config: CacheConfig,
    memo: Mutex<Option<TimestampMemo>>,
    listeners: Mutex<Vec<(SubscriptionId, ScoreListener)>>,
    next_id: AtomicU64,
    log_ctx: LogContext,
}

impl ScoreCache {
    pub fn new(
        trips: Arc<dyn TripSource>,
        scores: Arc<dyn ScoreStore>,
        engine: ScoringEngine,
        config: CacheConfig,
    ) -> Self {
        Self {
            trips,
            scores,
            engine,
            config,
            memo: Mutex::new(None),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            log_ctx: LogContext::new(&format!("score-{}", &Uuid::new_v4().to_string()[..8])),
        }
    }

    /// Tag this cache's log lines with `ctx` instead of its own score run id.
    pub fn with_log_context(mut self, ctx: LogContext) -> Self {
        self.log_ctx = ctx;
        self
    }

    pub fn log_context(&self) -> &LogContext {
        &self.log_ctx
    }

    /// Return the cached snapshot, recomputing first when forced or stale.
    ///
    /// Never fails: if trips can't be loaded the full-marks snapshot is
    /// returned, and a failed save still returns the fresh snapshot.
    pub fn get_score(&self, speeding_threshold: f64, force_update: bool) -> ScoreSnapshot {
        if !force_update {
            if let Some(snapshot) = self.fresh_snapshot() {
                crate::log_debug!(
                    self.log_ctx,
                    "SCORE_CACHE_HIT",
                    overall = snapshot.overall_score,
                    last_updated = snapshot.last_updated
                );
                return snapshot;
            }
        }
        self.recompute(speeding_threshold)
    }

    /// True when there is no usable snapshot or a newer trip exists.
    pub fn should_update(&self) -> bool {
        self.fresh_snapshot().is_none()
    }

    pub fn cached(&self) -> Result<Option<ScoreSnapshot>> {
        self.scores.load()
    }

    /// Drop the persisted snapshot and the memoized timestamp.
    pub fn clear(&self) -> Result<()> {
        self.invalidate_timestamp_memo();
        self.scores.clear()?;
        crate::log_info!(self.log_ctx, "SCORE_CACHE_CLEARED", memo = "invalidated");
        Ok(())
    }

    /// Forget the memoized newest-trip timestamp so the next check rescans.
    pub fn invalidate_timestamp_memo(&self) {
        *self.memo.lock() = None;
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&ScoreSnapshot) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let listener: ScoreListener = Arc::new(listener);
        self.listeners.lock().push((id, listener));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    fn fresh_snapshot(&self) -> Option<ScoreSnapshot> {
        let snapshot = match self.scores.load() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return None,
            Err(e) => {
                crate::log_warn!(self.log_ctx, "SCORE_CACHE_LOAD_FAILED", error = e);
                return None;
            }
        };

        match self.latest_trip_timestamp() {
            Ok(Some(latest)) if latest > snapshot.last_updated => None,
            Ok(_) => Some(snapshot),
            Err(e) => {
                crate::log_warn!(self.log_ctx, "SCORE_CACHE_TRIP_SCAN_FAILED", error = e);
                None
            }
        }
    }

    fn latest_trip_timestamp(&self) -> Result<Option<DateTime<Utc>>> {
        let memo = *self.memo.lock();
        if let Some(memo) = memo {
            if memo.scanned_at.elapsed() < self.config.timestamp_memo_ttl() {
                return Ok(memo.latest);
            }
        }
        let trips = self.trips.load_trips()?;
        let latest = latest_trip_timestamp(&trips);
        self.remember(latest);
        Ok(latest)
    }

    fn remember(&self, latest: Option<DateTime<Utc>>) {
        *self.memo.lock() = Some(TimestampMemo {
            scanned_at: Instant::now(),
            latest,
        });
    }

    fn recompute(&self, speeding_threshold: f64) -> ScoreSnapshot {
        let trips = match self.trips.load_trips() {
            Ok(trips) => trips,
            Err(e) => {
                crate::log_error!(
                    self.log_ctx,
                    "SCORE_TRIP_LOAD_FAILED",
                    error = e,
                    fallback = "neutral"
                );
                return ScoreSnapshot::neutral(Utc::now());
            }
        };
        self.remember(latest_trip_timestamp(&trips));

        let snapshot = self.engine.score(&trips, speeding_threshold);
        if let Err(e) = self.scores.save(&snapshot) {
            crate::log_error!(self.log_ctx, "SCORE_SAVE_FAILED", error = e);
        }

        crate::log_info!(
            self.log_ctx,
            "SCORE_RECOMPUTED",
            overall = snapshot.overall_score,
            aggression = snapshot.breakdown.aggression,
            speeding_events = snapshot.metrics.speed.speeding_events,
            trips = snapshot.trips_analyzed
        );
        self.notify(&snapshot);
        snapshot
    }

    fn notify(&self, snapshot: &ScoreSnapshot) {
        let listeners: Vec<ScoreListener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(snapshot);
        }
    }
}
