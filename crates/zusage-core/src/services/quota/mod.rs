//! Quota tracking module
//!
//! Polls the Z.ai monitor API and turns its limits into what the tray
//! surfaces display.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ QuotaRefresher (single flight + RefreshState)           │
//! │   - refresh()                                           │
//! │   - set_preference()                                    │
//! │   - run_polling()                                       │
//! └─────────────────────────────────────────────────────────┘
//!          │                              │
//!          ▼                              ▼
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │ trait QuotaSource        │   │ render / alerts          │
//! │   - fetch_quota()        │   │   - popup_rows()         │
//! │   - fetch_usage()        │   │   - MiniView             │
//! └──────────────────────────┘   │   - AlertState           │
//!          │                     └──────────────────────────┘
//!          ▼
//!     ┌─────────┐
//!     │ZaiClient│
//!     └─────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use zusage_core::{WidgetConfig, ZaiClient, QuotaRefresher};
//!
//! let config = WidgetConfig::from_env()?;
//! let client = Arc::new(ZaiClient::from_config(&config));
//! let refresher = QuotaRefresher::new(client, config.mini_quota, config.debug);
//! let outcome = refresher.refresh().await;
//! ```

pub mod alerts;
pub mod provider;
pub mod refresh;
pub mod render;
pub mod types;
pub mod usage;
pub mod zai;

// Re-export main types
pub use types::{
    DisplayPreference, LimitType, QuotaLimit, QuotaResponse, QuotaWindow, UsageResponse,
    UsageTotals,
};

// Re-export source trait and error
pub use provider::{QuotaError, QuotaSource};

// Re-export the client
pub use zai::{ZaiClient, DEFAULT_API_BASE};

// Re-export rendering
pub use render::{
    clamp_percent, format_reset_countdown, popup_rows, tracked_limit, MiniView, QuotaRow,
    StatusLevel,
};

// Re-export alerting
pub use alerts::{AlertState, QuotaAlert};

// Re-export refresh types
pub use refresh::{
    interval_from_minutes, run_polling, QuotaRefresher, RefreshOutcome, RefreshState,
    SharedRefreshState, DEFAULT_INTERVAL_MINUTES, MIN_INTERVAL_MINUTES,
};

pub use usage::UsageRange;
