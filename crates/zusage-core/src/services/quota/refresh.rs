//! Quota refresh loop
//!
//! Owns the latest snapshot and decides when to hit the API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   tick / manual / popup shown   ┌─────────────────┐
//! │ run_polling  │ ──────────────────────────────▶ │ QuotaRefresher  │
//! └──────────────┘                                 │  gate (1 fetch) │
//!        │                                         │  RefreshState   │
//!        ▼                                         └────────┬────────┘
//!  on_refresh(&RefreshOutcome)                              │
//!   ├─ data-update        -> popup                          ▼
//!   ├─ mini-widget-update -> mini                    QuotaSource
//!   └─ alerts             -> notifications           (ZaiClient)
//! ```
//!
//! At most one fetch is in flight. A request that arrives while a fetch is
//! running waits for it and gets that fetch's outcome instead of starting
//! another one.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{oneshot, Mutex, RwLock};
use tokio::time::MissedTickBehavior;

use super::alerts::{AlertState, QuotaAlert};
use super::provider::{QuotaError, QuotaSource};
use super::types::{DisplayPreference, QuotaResponse};
use crate::bridge::{DataUpdate, MiniWidgetUpdate};

// ============================================================================
// Constants
// ============================================================================

/// Default refresh period in minutes
pub const DEFAULT_INTERVAL_MINUTES: u32 = 5;

/// Minimum refresh period in minutes
pub const MIN_INTERVAL_MINUTES: u32 = 1;

/// Refresh period for a configured number of minutes
pub fn interval_from_minutes(minutes: u32) -> Duration {
    Duration::from_secs(u64::from(minutes.max(MIN_INTERVAL_MINUTES)) * 60)
}

// ============================================================================
// State
// ============================================================================

/// Everything the background process knows between refreshes
#[derive(Debug, Default)]
pub struct RefreshState {
    /// Last successful snapshot; replaced wholesale, never merged
    pub latest: Option<QuotaResponse>,
    /// Incremented every time a fetch completes
    pub generation: u64,
    /// Which limit the mini overlay tracks
    pub preference: DisplayPreference,
    last_data: Option<DataUpdate>,
    alert_state: AlertState,
}

impl RefreshState {
    pub fn new(preference: DisplayPreference) -> Self {
        Self {
            preference,
            ..Default::default()
        }
    }

    /// Apply a fetch result and build the popup payload
    pub fn complete_fetch(
        &mut self,
        result: Result<QuotaResponse, QuotaError>,
        at: DateTime<Utc>,
        debug: Option<bool>,
    ) -> (DataUpdate, Vec<QuotaAlert>) {
        self.generation += 1;

        let (data, alerts) = match result {
            Ok(quota) => {
                let alerts = self.alert_state.observe_snapshot(&quota);
                self.latest = Some(quota.clone());
                (DataUpdate::success(quota, at, debug), alerts)
            }
            Err(e) => (DataUpdate::failure(e.to_string(), at, debug), Vec::new()),
        };

        self.last_data = Some(data.clone());
        (data, alerts)
    }

    /// Payload of the most recent fetch, if any completed yet
    pub fn data_update(&self) -> Option<DataUpdate> {
        self.last_data.clone()
    }

    /// Mini payload rendered from the latest snapshot
    pub fn mini_update(&self, debug: Option<bool>) -> MiniWidgetUpdate {
        MiniWidgetUpdate::from_snapshot(self.latest.as_ref(), self.preference, debug)
    }
}

/// Shared state wrapper for task-safe access
pub type SharedRefreshState = Arc<RwLock<RefreshState>>;

/// Result of one refresh request, ready to fan out
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub data: DataUpdate,
    pub mini: MiniWidgetUpdate,
    /// Escalations seen by this fetch; empty for joined requests
    pub alerts: Vec<QuotaAlert>,
    /// True when the request joined a fetch that was already running
    pub joined: bool,
}

// ============================================================================
// Refresher
// ============================================================================

/// Single-flight front for a `QuotaSource`
pub struct QuotaRefresher {
    source: Arc<dyn QuotaSource>,
    state: SharedRefreshState,
    gate: Mutex<()>,
    debug: Option<bool>,
}

impl QuotaRefresher {
    pub fn new(source: Arc<dyn QuotaSource>, preference: DisplayPreference, debug: bool) -> Self {
        Self {
            source,
            state: Arc::new(RwLock::new(RefreshState::new(preference))),
            gate: Mutex::new(()),
            debug: Some(debug),
        }
    }

    /// Fetch now, or join the fetch already in flight
    pub async fn refresh(&self) -> RefreshOutcome {
        let seen = self.state.read().await.generation;
        let _gate = self.gate.lock().await;

        {
            let state = self.state.read().await;
            if state.generation != seen {
                if let Some(data) = state.data_update() {
                    log::debug!("[quota:refresh] Joined in-flight fetch");
                    return RefreshOutcome {
                        data,
                        mini: state.mini_update(self.debug),
                        alerts: Vec::new(),
                        joined: true,
                    };
                }
            }
        }

        log::debug!("[quota:refresh] Fetching quota");
        let result = self.source.fetch_quota().await;
        match &result {
            Err(e) if e.is_config() => log::warn!("[quota:refresh] Not fetching: {}", e),
            Err(e) => log::error!("[quota:refresh] Fetch failed: {}", e),
            Ok(_) => {}
        }

        let mut state = self.state.write().await;
        let (data, alerts) = state.complete_fetch(result, Utc::now(), self.debug);
        RefreshOutcome {
            data,
            mini: state.mini_update(self.debug),
            alerts,
            joined: false,
        }
    }

    pub async fn preference(&self) -> DisplayPreference {
        self.state.read().await.preference
    }

    /// Switch the tracked limit; re-renders from the latest snapshot without fetching
    pub async fn set_preference(&self, preference: DisplayPreference) -> MiniWidgetUpdate {
        let mut state = self.state.write().await;
        log::info!(
            "[quota:refresh] Mini preference {} -> {}",
            state.preference,
            preference
        );
        state.preference = preference;
        state.mini_update(self.debug)
    }

    pub async fn mini_update(&self) -> MiniWidgetUpdate {
        self.state.read().await.mini_update(self.debug)
    }

    /// Popup payload of the last completed fetch, without fetching
    pub async fn latest_data(&self) -> Option<DataUpdate> {
        self.state.read().await.data_update()
    }
}

// ============================================================================
// Polling Loop
// ============================================================================

/// Refresh immediately, then every `interval`, until `shutdown` fires
pub async fn run_polling<F>(
    refresher: Arc<QuotaRefresher>,
    interval: Duration,
    mut shutdown: oneshot::Receiver<()>,
    on_refresh: F,
) where
    F: Fn(&RefreshOutcome) + Send + Sync,
{
    log::info!(
        "[quota:refresh] Polling loop started ({}s interval)",
        interval.as_secs()
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => {
                log::info!("[quota:refresh] Received shutdown signal");
                break;
            }
        }

        let outcome = refresher.refresh().await;
        on_refresh(&outcome);
    }

    log::info!("[quota:refresh] Polling loop exited");
}

// ============================================================================
// Tests
// ============================================================================
