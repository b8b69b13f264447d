//! Tauri Commands module
//!
//! Commands the popup and mini overlay call through `invoke()`, plus the
//! state they share with the background refresh loop.

pub mod widget;

use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use zusage_core::{QuotaRefresher, WidgetConfig};

use crate::windows::TrayAnchor;

/// Application state shared across all commands
pub struct WidgetState {
    pub refresher: Arc<QuotaRefresher>,
    pub config: WidgetConfig,
    /// Shutdown signal sender for the polling loop
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
    /// Last tray icon bounds, reused when the popup is toggled from elsewhere
    tray_anchor: Mutex<Option<TrayAnchor>>,
}

impl WidgetState {
    pub fn new(refresher: Arc<QuotaRefresher>, config: WidgetConfig) -> Self {
        Self {
            refresher,
            config,
            shutdown_tx: Mutex::new(None),
            tray_anchor: Mutex::new(None),
        }
    }

    pub fn set_shutdown(&self, tx: oneshot::Sender<()>) {
        if let Ok(mut guard) = self.shutdown_tx.lock() {
            *guard = Some(tx);
        }
    }

    /// Signal the polling loop to exit; a no-op when it is not running
    pub fn stop_polling(&self) {
        let tx = self.shutdown_tx.lock().ok().and_then(|mut guard| guard.take());
        if let Some(tx) = tx {
            log::info!("[widget:tray] Stopping polling loop");
            let _ = tx.send(());
        }
    }

    /// Store `anchor` when given and return the most recent one
    pub fn remember_anchor(&self, anchor: Option<TrayAnchor>) -> Option<TrayAnchor> {
        let Ok(mut guard) = self.tray_anchor.lock() else {
            return anchor;
        };
        if anchor.is_some() {
            *guard = anchor;
        }
        *guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zusage_core::{DisplayPreference, ZaiClient};

    fn state() -> WidgetState {
        let client = Arc::new(ZaiClient::new("http://127.0.0.1:9", None));
        let refresher = Arc::new(QuotaRefresher::new(client, DisplayPreference::FiveHour, false));
        WidgetState::new(refresher, WidgetConfig::default())
    }

    #[test]
    fn test_remember_anchor_keeps_last_click() {
        let state = state();
        assert_eq!(state.remember_anchor(None), None);

        let anchor = TrayAnchor {
            x: 10.0,
            y: 20.0,
            width: 22.0,
        };
        assert_eq!(state.remember_anchor(Some(anchor)), Some(anchor));
        assert_eq!(state.remember_anchor(None), Some(anchor));
    }

    #[test]
    fn test_stop_polling_sends_once() {
        let state = state();
        let (tx, mut rx) = oneshot::channel();
        state.set_shutdown(tx);

        state.stop_polling();
        assert!(rx.try_recv().is_ok());

        // Second call has nothing left to send
        state.stop_polling();
    }
}
