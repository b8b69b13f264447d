//! # zusage-core
//!
//! Core logic for zusage - shared between CLI and Tauri.
//!
//! This crate provides:
//! - Typed configuration read from the environment (`config` module)
//! - The Z.ai quota client, rendering rules and refresh loop (`services` module)
//! - The message contract between the background process and display surfaces (`bridge` module)
//! - Unified error handling (`error` module)

pub mod bridge;
pub mod config;
pub mod error;
pub mod services;

// Re-exports for convenience
pub use config::{MiniPosition, WidgetConfig};
pub use error::{Error, Result};

// Re-export commonly used types from services
pub use services::quota::{
    DisplayPreference, LimitType, QuotaError, QuotaLimit, QuotaRefresher, QuotaResponse,
    QuotaSource, QuotaWindow, RefreshOutcome, StatusLevel, UsageRange, UsageResponse, ZaiClient,
};
