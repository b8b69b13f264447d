//! Rendering rules shared by the popup, the mini overlay and the CLI
//!
//! Surfaces never interpret raw limits themselves; they paint the view
//! models built here.

use serde::{Deserialize, Serialize};

use super::types::{DisplayPreference, QuotaLimit, QuotaResponse};

const HOUR_MS: i64 = 60 * 60 * 1000;
const MINUTE_MS: i64 = 60 * 1000;

/// Text shown once a reset time has passed
pub const RESETTING_TEXT: &str = "Resetting...";

/// Usage status, serialized as the CSS class the surfaces use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    Safe,
    Warning,
    Danger,
}

impl StatusLevel {
    /// `<70` safe, `70..90` warning, `>=90` danger
    pub fn from_percent(percent: u8) -> Self {
        if percent >= 90 {
            StatusLevel::Danger
        } else if percent >= 70 {
            StatusLevel::Warning
        } else {
            StatusLevel::Safe
        }
    }
}

impl std::fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusLevel::Safe => write!(f, "safe"),
            StatusLevel::Warning => write!(f, "warning"),
            StatusLevel::Danger => write!(f, "danger"),
        }
    }
}

/// Round to a whole percent and clamp into `[0, 100]`
pub fn clamp_percent(percentage: f64) -> u8 {
    if !percentage.is_finite() {
        return 0;
    }
    percentage.round().clamp(0.0, 100.0) as u8
}

/// Countdown until `next_reset_ms`, both arguments in epoch milliseconds
pub fn format_reset_countdown(next_reset_ms: i64, now_ms: i64) -> String {
    let diff = next_reset_ms.saturating_sub(now_ms);
    if diff <= 0 {
        return RESETTING_TEXT.to_string();
    }

    let hours = diff / HOUR_MS;
    let minutes = (diff % HOUR_MS) / MINUTE_MS;

    if hours > 24 {
        format!("{}d {}h", hours / 24, hours % 24)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Popup reset line: "Resets in ..." or the resetting marker
pub fn reset_line(next_reset_ms: i64, now_ms: i64) -> String {
    let countdown = format_reset_countdown(next_reset_ms, now_ms);
    if countdown == RESETTING_TEXT {
        countdown
    } else {
        format!("Resets in {}", countdown)
    }
}

/// Token limits in display order (5-hour, weekly, monthly, then unknown)
pub fn token_limits(quota: &QuotaResponse) -> Vec<&QuotaLimit> {
    let mut limits: Vec<&QuotaLimit> = quota.limits.iter().filter(|l| l.is_tokens()).collect();
    // sort_by_key is stable, unknown units keep API order
    limits.sort_by_key(|l| l.window().order());
    limits
}

/// The token limit the mini overlay tracks for `preference`
pub fn tracked_limit(quota: &QuotaResponse, preference: DisplayPreference) -> Option<&QuotaLimit> {
    let unit = preference.window().unit();
    quota
        .limits
        .iter()
        .find(|l| l.is_tokens() && l.unit == unit)
}

// ============================================================================
// View Models
// ============================================================================

/// One popup row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaRow {
    pub label: String,
    pub period: String,
    pub percent: u8,
    pub status: StatusLevel,
    pub reset_text: String,
}

impl QuotaRow {
    pub fn from_limit(limit: &QuotaLimit, now_ms: i64) -> Self {
        let window = limit.window();
        let percent = clamp_percent(limit.percentage);
        Self {
            label: window.label(),
            period: window.period().to_string(),
            percent,
            status: StatusLevel::from_percent(percent),
            reset_text: reset_line(limit.next_reset_time, now_ms),
        }
    }
}

/// Build the popup rows for a snapshot
pub fn popup_rows(quota: &QuotaResponse, now_ms: i64) -> Vec<QuotaRow> {
    token_limits(quota)
        .into_iter()
        .map(|limit| QuotaRow::from_limit(limit, now_ms))
        .collect()
}

/// What the mini overlay paints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniView {
    pub label: String,
    /// `None` renders as `--%` with an empty bar
    pub percent: Option<u8>,
    pub status: Option<StatusLevel>,
    pub percent_text: String,
}

impl MiniView {
    pub fn new(limit: Option<&QuotaLimit>, preference: DisplayPreference) -> Self {
        let label = preference.short_label().to_string();
        match limit {
            Some(limit) => {
                let percent = clamp_percent(limit.percentage);
                Self {
                    label,
                    percent: Some(percent),
                    status: Some(StatusLevel::from_percent(percent)),
                    percent_text: format!("{}%", percent),
                }
            }
            None => Self {
                label,
                percent: None,
                status: None,
                percent_text: "--%".to_string(),
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::quota::types::LimitType;

    const NOW: i64 = 1_760_000_000_000;

    fn limit(limit_type: LimitType, unit: u32, percentage: f64) -> QuotaLimit {
        QuotaLimit {
            limit_type,
            unit,
            number: 1.0,
            percentage,
            next_reset_time: NOW + 90 * MINUTE_MS,
            usage: None,
            current_value: None,
            remaining: None,
        }
    }

    #[test]
    fn test_clamp_percent_range() {
        for p in [-50.0, -0.4, 0.0, 12.3, 69.5, 99.9, 100.0, 250.0, f64::NAN, f64::INFINITY] {
            let c = clamp_percent(p);
            assert!(c <= 100, "clamp({}) = {}", p, c);
        }
        assert_eq!(clamp_percent(-5.0), 0);
        assert_eq!(clamp_percent(42.4), 42);
        assert_eq!(clamp_percent(42.5), 43);
        assert_eq!(clamp_percent(130.0), 100);
        assert_eq!(clamp_percent(f64::NAN), 0);
    }

    #[test]
    fn test_status_thresholds() {
        for p in 0..=100u8 {
            let expected = match p {
                0..=69 => StatusLevel::Safe,
                70..=89 => StatusLevel::Warning,
                _ => StatusLevel::Danger,
            };
            assert_eq!(StatusLevel::from_percent(p), expected, "percent {}", p);
        }
    }

    #[test]
    fn test_status_serializes_as_css_class() {
        assert_eq!(serde_json::to_string(&StatusLevel::Danger).unwrap(), "\"danger\"");
        assert_eq!(StatusLevel::Warning.to_string(), "warning");
    }

    #[test]
    fn test_countdown_past_or_now_is_resetting() {
        for offset in [0, 1, 60_000, HOUR_MS * 100] {
            assert_eq!(format_reset_countdown(NOW - offset, NOW), "Resetting...");
        }
        assert_eq!(reset_line(NOW - 1, NOW), "Resetting...");
    }

    #[test]
    fn test_countdown_formats() {
        assert_eq!(format_reset_countdown(NOW + 90 * MINUTE_MS, NOW), "1h 30m");
        assert_eq!(format_reset_countdown(NOW + 50 * HOUR_MS, NOW), "2d 2h");
        assert_eq!(format_reset_countdown(NOW + 59 * MINUTE_MS, NOW), "59m");
        assert_eq!(format_reset_countdown(NOW + 30_000, NOW), "0m");
        assert_eq!(format_reset_countdown(NOW + 24 * HOUR_MS, NOW), "24h 0m");
        assert_eq!(format_reset_countdown(NOW + 25 * HOUR_MS, NOW), "1d 1h");
    }

    #[test]
    fn test_reset_line_prefix() {
        assert_eq!(reset_line(NOW + 90 * MINUTE_MS, NOW), "Resets in 1h 30m");
    }

    #[test]
    fn test_token_limits_filter_and_order() {
        let quota = QuotaResponse {
            limits: vec![
                limit(LimitType::TokensLimit, 9, 1.0),
                limit(LimitType::TokensLimit, 5, 2.0),
                limit(LimitType::TimeLimit, 3, 3.0),
                limit(LimitType::TokensLimit, 6, 4.0),
                limit(LimitType::TokensLimit, 3, 5.0),
                limit(LimitType::TokensLimit, 7, 6.0),
            ],
            level: "pro".to_string(),
        };

        let units: Vec<u32> = token_limits(&quota).iter().map(|l| l.unit).collect();
        assert_eq!(units, vec![3, 6, 5, 9, 7]);
        assert!(token_limits(&quota).iter().all(|l| l.is_tokens()));
    }

    #[test]
    fn test_popup_rows() {
        let quota = QuotaResponse {
            limits: vec![
                limit(LimitType::TokensLimit, 6, 95.2),
                limit(LimitType::TokensLimit, 3, 71.0),
            ],
            level: String::new(),
        };

        let rows = popup_rows(&quota, NOW);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "5-Hour Quota");
        assert_eq!(rows[0].status, StatusLevel::Warning);
        assert_eq!(rows[1].label, "Weekly Quota");
        assert_eq!(rows[1].percent, 95);
        assert_eq!(rows[1].status, StatusLevel::Danger);
        assert_eq!(rows[1].reset_text, "Resets in 1h 30m");
    }

    #[test]
    fn test_tracked_limit_ignores_time_limits() {
        let quota = QuotaResponse {
            limits: vec![
                limit(LimitType::TimeLimit, 5, 80.0),
                limit(LimitType::TokensLimit, 5, 20.0),
            ],
            level: String::new(),
        };

        let tracked = tracked_limit(&quota, DisplayPreference::Monthly).unwrap();
        assert_eq!(tracked.percentage, 20.0);
        assert!(tracked_limit(&quota, DisplayPreference::Weekly).is_none());
    }

    #[test]
    fn test_mini_view() {
        let l = limit(LimitType::TokensLimit, 3, 88.6);
        let view = MiniView::new(Some(&l), DisplayPreference::FiveHour);
        assert_eq!(view.label, "5h");
        assert_eq!(view.percent, Some(89));
        assert_eq!(view.status, Some(StatusLevel::Warning));
        assert_eq!(view.percent_text, "89%");

        let empty = MiniView::new(None, DisplayPreference::Weekly);
        assert_eq!(empty.label, "7d");
        assert_eq!(empty.percent, None);
        assert_eq!(empty.percent_text, "--%");
    }
}
