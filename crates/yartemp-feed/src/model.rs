//! Refresh orchestration and the published snapshot.
//!
//! `WeatherModel` owns the HTTP client, the last-good cache and the state
//! handed to frontends. At most one refresh cycle runs at a time; a call
//! that arrives while one is in flight is dropped silently. The guard
//! returns to idle however a cycle ends, including when the refresh future
//! is dropped at its await point.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::cache::ReadingCache;
use crate::client::FeedClient;
use crate::error::ModelError;
use crate::op_state::OpState;
use crate::reading::Reading;

/// What triggered a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Refresher {
    /// Periodic or incidental refresh; reuses the cached reading if present.
    #[default]
    Timer,
    /// Explicit user request; always goes to the network.
    User,
}

/// Read-only view of the model state.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Last successfully validated reading, if any.
    pub reading: Option<Reading>,
    /// When that reading was obtained.
    pub fetched_at: Option<DateTime<Utc>>,
    /// Failure of the most recent cycle, cleared by the next success.
    pub error: Option<ModelError>,
}

#[derive(Default)]
struct ModelState {
    op: OpState,
    cache: ReadingCache,
    published: Snapshot,
}

impl ModelState {
    fn publish_success(&mut self, reading: Reading, fetched_at: DateTime<Utc>) {
        self.published.reading = Some(reading);
        self.published.fetched_at = Some(fetched_at);
        self.published.error = None;
    }
}

/// Returns the state machine to idle when a refresh cycle ends.
///
/// Runs in `Drop` so a cycle future dropped at its await point (caller
/// timeout, task abort) still releases the guard.
struct RefreshGuard<'a> {
    state: &'a Mutex<ModelState>,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        state.op = state.op.on_refresh_done();
    }
}

/// Fetches, validates and publishes observations.
pub struct WeatherModel {
    client: FeedClient,
    state: Mutex<ModelState>,
}

impl WeatherModel {
    pub fn new(client: FeedClient) -> Self {
        Self {
            client,
            state: Mutex::new(ModelState::default()),
        }
    }

    /// Current published state.
    pub fn snapshot(&self) -> Snapshot {
        self.state.lock().published.clone()
    }

    /// Refresh with the default (cache-honoring) mode.
    pub async fn refresh(&self) {
        self.refresh_by(Refresher::Timer).await;
    }

    /// Refresh with an explicit mode.
    pub async fn refresh_by(&self, refresher: Refresher) {
        // Guard check and cache consultation happen under one lock
        // acquisition; the lock is never held across an await.
        let _guard = {
            let mut state = self.state.lock();
            if !state.op.can_start_refresh() {
                tracing::debug!("Refresh already in progress, dropping request");
                return;
            }
            state.op = OpState::Refreshing;

            if let Some(entry) = state.cache.lookup(refresher) {
                // A cache hit counts as a successful cycle.
                state.publish_success(entry.reading, entry.fetched_at);
                state.op = state.op.on_refresh_done();
                tracing::debug!("Refresh served from cache");
                return;
            }
            RefreshGuard { state: &self.state }
        };

        let outcome = match self.client.fetch_raw().await {
            Ok(raw) => Reading::parse(&raw),
            Err(e) => Err(e),
        };
        self.publish(outcome, true);
    }

    /// Parse and publish a caller-supplied line, touching neither the
    /// network nor the cache. Injection port for tests and offline shells.
    pub async fn refresh_offline(&self, raw: &str) {
        let _guard = {
            let mut state = self.state.lock();
            if !state.op.can_start_refresh() {
                tracing::debug!("Refresh already in progress, dropping request");
                return;
            }
            state.op = OpState::Refreshing;
            RefreshGuard { state: &self.state }
        };
        self.publish(Reading::parse(raw), false);
    }

    /// Publish a cycle outcome.
    fn publish(&self, outcome: Result<Reading, ModelError>, update_cache: bool) {
        let mut state = self.state.lock();
        match outcome {
            Ok(reading) => {
                let fetched_at = Utc::now();
                if update_cache {
                    state.cache.store(reading, fetched_at);
                }
                state.publish_success(reading, fetched_at);
                tracing::info!("Published reading: {}", reading.temperature);
            }
            Err(e) => {
                // The previous reading and the cache stay untouched.
                tracing::warn!("Refresh failed: {}", e);
                state.published.error = Some(e);
            }
        }
    }
}
