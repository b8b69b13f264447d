//! zusage - Z.ai quota tray widget
//!
//! A Tauri application that polls the Z.ai quota API in the background and
//! shows the result in a tray popup and an optional mini overlay.

mod commands;
mod events;
mod tray;
mod windows;

use std::sync::Arc;

use tauri::{Manager, RunEvent};
use zusage_core::{QuotaRefresher, WidgetConfig, ZaiClient};

use commands::WidgetState;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_notification::init())
        // Register Tauri commands
        .invoke_handler(tauri::generate_handler![
            commands::widget::refresh_data,
            commands::widget::hide_window,
            commands::widget::toggle_popup,
            commands::widget::set_quota_preference,
            commands::widget::get_quota_preference,
            commands::widget::get_mini_state,
        ])
        .setup(|app| {
            let config = WidgetConfig::from_env();
            let debug = config.as_ref().map(|c| c.debug).unwrap_or(false);

            // Setup logging
            app.handle().plugin(
                tauri_plugin_log::Builder::default()
                    .level(if debug {
                        log::LevelFilter::Debug
                    } else {
                        log::LevelFilter::Info
                    })
                    .build(),
            )?;

            let config = config.inspect_err(|e| log::error!("[widget:tray] {}", e))?;
            log::info!("[widget:tray] Starting with {:?}", config);

            // A missing credential is shown in the popup rather than aborting
            if let Err(e) = config.validate() {
                log::error!("[widget:tray] {}", e);
            }

            #[cfg(target_os = "macos")]
            app.set_activation_policy(tauri::ActivationPolicy::Accessory);

            let client = Arc::new(ZaiClient::from_config(&config));
            let refresher = Arc::new(QuotaRefresher::new(client, config.mini_quota, config.debug));
            let state = WidgetState::new(Arc::clone(&refresher), config.clone());
            app.manage(state);

            let handle = app.handle();
            tray::setup_tray(handle)?;
            windows::create_popup_window(handle)?;
            if config.mini_enabled {
                windows::toggle_mini(handle)?;
            }

            let shutdown_tx =
                events::start_polling(handle, refresher, config.refresh_interval(), config.notify);
            app.state::<WidgetState>().set_shutdown(shutdown_tx);

            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            // Windows are only hidden, keep running in the tray
            RunEvent::ExitRequested { api, code, .. } if code.is_none() => {
                api.prevent_exit();
            }
            RunEvent::Exit => {
                if let Some(state) = app_handle.try_state::<WidgetState>() {
                    state.stop_polling();
                }
            }
            _ => {}
        });
}
