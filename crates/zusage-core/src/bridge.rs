//! Message contract between the background process and display surfaces
//!
//! The background process pushes two events:
//!
//! ```text
//! data-update         -> popup   { quota, error, debug?, rows, updatedAt }
//! mini-widget-update  -> mini    { limit, preference, debug?, view }
//! ```
//!
//! Surfaces call back with commands (`refresh_data`, `hide_window`,
//! `toggle_popup`, `set_quota_preference`, `get_quota_preference`,
//! `get_mini_state`) implemented by the Tauri crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::quota::render::{popup_rows, tracked_limit, MiniView, QuotaRow};
use crate::services::quota::{DisplayPreference, QuotaLimit, QuotaResponse};

/// Event carrying `DataUpdate` to the popup
pub const DATA_UPDATE_EVENT: &str = "data-update";

/// Event carrying `MiniWidgetUpdate` to the mini overlay
pub const MINI_WIDGET_UPDATE_EVENT: &str = "mini-widget-update";

/// Window label of the popup surface
pub const POPUP_LABEL: &str = "popup";

/// Window label of the mini overlay surface
pub const MINI_LABEL: &str = "mini";

/// Popup payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataUpdate {
    pub quota: Option<QuotaResponse>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
    /// Pre-rendered rows; empty on error
    #[serde(default)]
    pub rows: Vec<QuotaRow>,
    pub updated_at: Option<String>,
}

impl DataUpdate {
    pub fn success(quota: QuotaResponse, at: DateTime<Utc>, debug: Option<bool>) -> Self {
        let rows = popup_rows(&quota, at.timestamp_millis());
        Self {
            quota: Some(quota),
            error: None,
            debug,
            rows,
            updated_at: Some(at.to_rfc3339()),
        }
    }

    pub fn failure(error: impl Into<String>, at: DateTime<Utc>, debug: Option<bool>) -> Self {
        Self {
            quota: None,
            error: Some(error.into()),
            debug,
            rows: Vec::new(),
            updated_at: Some(at.to_rfc3339()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Mini overlay payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniWidgetUpdate {
    pub limit: Option<QuotaLimit>,
    pub preference: DisplayPreference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
    pub view: MiniView,
}

impl MiniWidgetUpdate {
    /// Build from the latest snapshot, which may be absent before the first success
    pub fn from_snapshot(
        latest: Option<&QuotaResponse>,
        preference: DisplayPreference,
        debug: Option<bool>,
    ) -> Self {
        let limit = latest.and_then(|q| tracked_limit(q, preference)).cloned();
        let view = MiniView::new(limit.as_ref(), preference);
        Self {
            limit,
            preference,
            debug,
            view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::quota::LimitType;
    use chrono::TimeZone;

    fn snapshot() -> QuotaResponse {
        QuotaResponse {
            limits: vec![QuotaLimit {
                limit_type: LimitType::TokensLimit,
                unit: 6,
                number: 1.0,
                percentage: 64.0,
                next_reset_time: 0,
                usage: None,
                current_value: None,
                remaining: None,
            }],
            level: "pro".to_string(),
        }
    }

    #[test]
    fn test_data_update_success_payload() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let update = DataUpdate::success(snapshot(), at, Some(true));
        let value = serde_json::to_value(&update).unwrap();

        assert!(value["error"].is_null());
        assert_eq!(value["debug"], true);
        assert_eq!(value["quota"]["level"], "pro");
        assert_eq!(value["rows"][0]["label"], "Weekly Quota");
        assert_eq!(value["rows"][0]["resetText"], "Resetting...");
        assert!(value["updatedAt"].as_str().unwrap().starts_with("2026-10-19T12:00:00"));
    }

    #[test]
    fn test_data_update_failure_omits_debug_when_unset() {
        let update = DataUpdate::failure("Quota API error: 500", Utc::now(), None);
        assert!(update.is_error());
        let value = serde_json::to_value(&update).unwrap();
        assert!(value["quota"].is_null());
        assert_eq!(value["error"], "Quota API error: 500");
        assert!(value.get("debug").is_none());
        assert_eq!(value["rows"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_mini_update_tracks_preference() {
        let quota = snapshot();
        let update = MiniWidgetUpdate::from_snapshot(Some(&quota), DisplayPreference::Weekly, None);
        assert_eq!(update.view.percent_text, "64%");
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["preference"], "weekly");
        assert_eq!(value["limit"]["unit"], 6);

        let missing =
            MiniWidgetUpdate::from_snapshot(Some(&quota), DisplayPreference::FiveHour, None);
        assert!(missing.limit.is_none());
        assert_eq!(missing.view.percent_text, "--%");

        let before_first =
            MiniWidgetUpdate::from_snapshot(None, DisplayPreference::Monthly, Some(false));
        assert_eq!(before_first.view.label, "30d");
    }
}
