//! Widget commands
//!
//! The popup and mini overlay are thin renderers; every action they take
//! lands here.

use tauri::{AppHandle, State};
use zusage_core::bridge::{DataUpdate, MiniWidgetUpdate};
use zusage_core::DisplayPreference;

use super::WidgetState;
use crate::{events, tray, windows};

/// Refresh now (or join the refresh in flight) and return the popup payload
#[tauri::command]
pub async fn refresh_data(
    app: AppHandle,
    state: State<'_, WidgetState>,
) -> Result<DataUpdate, String> {
    log::debug!("[widget:tray] refresh_data requested");
    let outcome = state.refresher.refresh().await;
    events::fan_out(&app, &outcome, state.config.notify);
    Ok(outcome.data)
}

/// Hide the popup
#[tauri::command]
pub async fn hide_window(app: AppHandle) -> Result<(), String> {
    windows::hide_popup(&app).map_err(|e| e.to_string())
}

/// Show the popup at the last tray position, or hide it
#[tauri::command]
pub async fn toggle_popup(app: AppHandle) -> Result<(), String> {
    windows::toggle_popup(&app, None).map_err(|e| e.to_string())
}

/// Switch which limit the mini overlay tracks, without fetching
#[tauri::command]
pub async fn set_quota_preference(
    app: AppHandle,
    state: State<'_, WidgetState>,
    preference: DisplayPreference,
) -> Result<MiniWidgetUpdate, String> {
    let update = state.refresher.set_preference(preference).await;
    events::emit_mini(&app, &update);
    tray::update_tray_status(&app, &update);
    Ok(update)
}

#[tauri::command]
pub async fn get_quota_preference(
    state: State<'_, WidgetState>,
) -> Result<DisplayPreference, String> {
    Ok(state.refresher.preference().await)
}

/// Current mini payload, for a freshly loaded overlay
#[tauri::command]
pub async fn get_mini_state(state: State<'_, WidgetState>) -> Result<MiniWidgetUpdate, String> {
    Ok(state.refresher.mini_update().await)
}
