//! Quota tracking types
//!
//! Wire types for the Z.ai monitor API plus the typed views used when
//! rendering them.

use serde::{Deserialize, Serialize};

// ============================================================================
// Wire Types
// ============================================================================

/// Every monitor endpoint wraps its payload in `{ "data": ... }`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub data: T,
}

/// Kind of limit reported by the quota endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LimitType {
    /// Token budget over a rolling window
    TokensLimit,
    /// Time-based limit (not rendered)
    TimeLimit,
    /// Anything the API adds later
    #[serde(other)]
    Other,
}

/// A single limit as returned by `/monitor/usage/quota/limit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaLimit {
    #[serde(rename = "type")]
    pub limit_type: LimitType,
    /// Window code: 3 = 5-hour, 5 = monthly, 6 = weekly
    pub unit: u32,
    #[serde(default)]
    pub number: f64,
    /// Percentage used (nominally 0-100, not guaranteed by the API)
    pub percentage: f64,
    /// Epoch milliseconds of the next reset
    #[serde(default)]
    pub next_reset_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<f64>,
}

impl QuotaLimit {
    /// Whether this limit is a token limit
    pub fn is_tokens(&self) -> bool {
        self.limit_type == LimitType::TokensLimit
    }

    /// Typed view of the `unit` code
    pub fn window(&self) -> QuotaWindow {
        QuotaWindow::from_unit(self.unit)
    }
}

/// Snapshot of all limits for the account
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuotaResponse {
    #[serde(default)]
    pub limits: Vec<QuotaLimit>,
    /// Plan level (e.g. "lite", "pro")
    #[serde(default)]
    pub level: String,
}

/// Aggregate counters from `/monitor/usage/model-usage`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageTotals {
    #[serde(default)]
    pub total_model_call_count: u64,
    #[serde(default)]
    pub total_tokens_usage: u64,
}

/// Per-bucket model usage over a time range
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageResponse {
    #[serde(rename = "x_time", default)]
    pub x_time: Vec<String>,
    #[serde(default)]
    pub model_call_count: Vec<Option<u64>>,
    #[serde(default)]
    pub tokens_usage: Vec<Option<u64>>,
    #[serde(default)]
    pub total_usage: UsageTotals,
}

impl UsageResponse {
    /// Iterate buckets as `(time, calls, tokens)`, treating nulls as zero
    pub fn buckets(&self) -> impl Iterator<Item = (&str, u64, u64)> + '_ {
        self.x_time.iter().enumerate().map(move |(i, time)| {
            let calls = self.model_call_count.get(i).copied().flatten().unwrap_or(0);
            let tokens = self.tokens_usage.get(i).copied().flatten().unwrap_or(0);
            (time.as_str(), calls, tokens)
        })
    }
}

// ============================================================================
// Window Types
// ============================================================================

/// Rolling window a limit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuotaWindow {
    FiveHour,
    Weekly,
    Monthly,
    Other(u32),
}

impl QuotaWindow {
    pub fn from_unit(unit: u32) -> Self {
        match unit {
            3 => QuotaWindow::FiveHour,
            6 => QuotaWindow::Weekly,
            5 => QuotaWindow::Monthly,
            other => QuotaWindow::Other(other),
        }
    }

    pub fn unit(&self) -> u32 {
        match self {
            QuotaWindow::FiveHour => 3,
            QuotaWindow::Weekly => 6,
            QuotaWindow::Monthly => 5,
            QuotaWindow::Other(unit) => *unit,
        }
    }

    /// Display priority; unknown windows sort last
    pub fn order(&self) -> u8 {
        match self {
            QuotaWindow::FiveHour => 1,
            QuotaWindow::Weekly => 2,
            QuotaWindow::Monthly => 3,
            QuotaWindow::Other(_) => 99,
        }
    }

    /// Popup row label
    pub fn label(&self) -> String {
        match self {
            QuotaWindow::FiveHour => "5-Hour Quota".to_string(),
            QuotaWindow::Weekly => "Weekly Quota".to_string(),
            QuotaWindow::Monthly => "Monthly Quota".to_string(),
            QuotaWindow::Other(unit) => format!("Quota ({})", unit),
        }
    }

    /// Short period tag
    pub fn period(&self) -> &'static str {
        match self {
            QuotaWindow::FiveHour => "5h",
            QuotaWindow::Weekly => "7d",
            QuotaWindow::Monthly => "30d",
            QuotaWindow::Other(_) => "?",
        }
    }
}

impl std::fmt::Display for QuotaWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuotaWindow::FiveHour => write!(f, "5_hour"),
            QuotaWindow::Weekly => write!(f, "weekly"),
            QuotaWindow::Monthly => write!(f, "monthly"),
            QuotaWindow::Other(unit) => write!(f, "unit_{}", unit),
        }
    }
}

// ============================================================================
// Display Preference
// ============================================================================

/// Which limit the mini overlay tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayPreference {
    #[default]
    #[serde(rename = "5h")]
    FiveHour,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "monthly")]
    Monthly,
}

impl DisplayPreference {
    pub fn window(&self) -> QuotaWindow {
        match self {
            DisplayPreference::FiveHour => QuotaWindow::FiveHour,
            DisplayPreference::Weekly => QuotaWindow::Weekly,
            DisplayPreference::Monthly => QuotaWindow::Monthly,
        }
    }

    /// Label shown in the mini overlay
    pub fn short_label(&self) -> &'static str {
        self.window().period()
    }
}

impl std::fmt::Display for DisplayPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayPreference::FiveHour => write!(f, "5h"),
            DisplayPreference::Weekly => write!(f, "weekly"),
            DisplayPreference::Monthly => write!(f, "monthly"),
        }
    }
}

impl std::str::FromStr for DisplayPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "5h" | "5hour" | "5_hour" | "five_hour" => Ok(DisplayPreference::FiveHour),
            "weekly" | "week" | "7d" => Ok(DisplayPreference::Weekly),
            "monthly" | "month" | "30d" => Ok(DisplayPreference::Monthly),
            _ => Err(format!(
                "Unknown quota preference: {} (expected 5h, weekly or monthly)",
                s
            )),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
