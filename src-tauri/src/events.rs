//! Fan-out of refresh results to the display surfaces
//!
//! Every refresh, whatever triggered it, goes through `fan_out`: the popup
//! gets `data-update`, the mini overlay gets `mini-widget-update`, the tray
//! title is updated and status escalations become notifications.

use std::sync::Arc;
use std::time::Duration;

use tauri::{AppHandle, Emitter, Manager};
use tauri_plugin_notification::NotificationExt;
use tokio::sync::oneshot;
use zusage_core::bridge::{
    MiniWidgetUpdate, DATA_UPDATE_EVENT, MINI_LABEL, MINI_WIDGET_UPDATE_EVENT, POPUP_LABEL,
};
use zusage_core::services::quota::{run_polling, QuotaAlert};
use zusage_core::{QuotaRefresher, RefreshOutcome};

use crate::commands::WidgetState;
use crate::tray;

/// Push a refresh outcome to every surface
pub fn fan_out(app: &AppHandle, outcome: &RefreshOutcome, notify: bool) {
    if let Err(e) = app.emit_to(POPUP_LABEL, DATA_UPDATE_EVENT, &outcome.data) {
        log::warn!("[widget:tray] Failed to emit {}: {}", DATA_UPDATE_EVENT, e);
    }
    emit_mini(app, &outcome.mini);
    tray::update_tray_status(app, &outcome.mini);

    if notify {
        notify_alerts(app, &outcome.alerts);
    }
}

/// Push a mini payload to the overlay
pub fn emit_mini(app: &AppHandle, mini: &MiniWidgetUpdate) {
    if let Err(e) = app.emit_to(MINI_LABEL, MINI_WIDGET_UPDATE_EVENT, mini) {
        log::warn!("[widget:tray] Failed to emit {}: {}", MINI_WIDGET_UPDATE_EVENT, e);
    }
}

/// Show one desktop notification per escalation
pub fn notify_alerts(app: &AppHandle, alerts: &[QuotaAlert]) {
    for alert in alerts {
        log::info!("[widget:tray] {}: {}", alert.title(), alert.body());
        if let Err(e) = app
            .notification()
            .builder()
            .title(alert.title())
            .body(alert.body())
            .show()
        {
            log::warn!("[widget:tray] Failed to show notification: {}", e);
        }
    }
}

/// Show the cached popup payload, then refresh in the background and fan out the result
pub fn spawn_refresh(app: &AppHandle) {
    let Some(state) = app.try_state::<WidgetState>() else {
        return;
    };
    let refresher = Arc::clone(&state.refresher);
    let notify = state.config.notify;
    let app = app.clone();

    tauri::async_runtime::spawn(async move {
        if let Some(cached) = refresher.latest_data().await {
            if let Err(e) = app.emit_to(POPUP_LABEL, DATA_UPDATE_EVENT, &cached) {
                log::warn!("[widget:tray] Failed to emit {}: {}", DATA_UPDATE_EVENT, e);
            }
        }
        let outcome = refresher.refresh().await;
        fan_out(&app, &outcome, notify);
    });
}

/// Re-send the current mini payload without fetching
pub fn spawn_mini_sync(app: &AppHandle) {
    let Some(state) = app.try_state::<WidgetState>() else {
        return;
    };
    let refresher = Arc::clone(&state.refresher);
    let app = app.clone();

    tauri::async_runtime::spawn(async move {
        let mini = refresher.mini_update().await;
        emit_mini(&app, &mini);
    });
}

/// Start the background polling loop
pub fn start_polling(
    app: &AppHandle,
    refresher: Arc<QuotaRefresher>,
    interval: Duration,
    notify: bool,
) -> oneshot::Sender<()> {
    let (tx, rx) = oneshot::channel();
    let app = app.clone();

    tauri::async_runtime::spawn(run_polling(refresher, interval, rx, move |outcome| {
        fan_out(&app, outcome, notify)
    }));

    tx
}
