//! System tray
//!
//! Builds the tray icon and menu, and keeps the tray title in sync with the
//! tracked quota.

use tauri::{
    image::Image,
    menu::{Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager,
};
use zusage_core::bridge::MiniWidgetUpdate;

use crate::commands::WidgetState;
use crate::{events, windows};

pub const TRAY_ID: &str = "main-tray";
pub const TOOLTIP: &str = "Z.ai Usage Widget";

/// Edge length of the generated tray icon, in pixels
pub const ICON_SIZE: u32 = 16;

/// Widget purple
pub const ICON_COLOR: [u8; 3] = [128, 90, 213];

const MENU_REFRESH: &str = "refresh";
const MENU_TOGGLE_MINI: &str = "toggle_mini";
const MENU_QUIT: &str = "quit";

// =============================================================================
// Helper Functions
// =============================================================================

/// Solid RGBA square used as the tray icon
pub fn icon_rgba() -> Vec<u8> {
    let [r, g, b] = ICON_COLOR;
    [r, g, b, 255].repeat((ICON_SIZE * ICON_SIZE) as usize)
}

/// Title shown next to the tray icon, e.g. "5h 42%"
pub fn tray_title(mini: &MiniWidgetUpdate) -> String {
    format!("{} {}", mini.view.label, mini.view.percent_text)
}

/// Tooltip with the latest tracked value
pub fn tray_tooltip(mini: &MiniWidgetUpdate) -> String {
    match mini.view.percent {
        Some(_) => format!("{} ({})", TOOLTIP, tray_title(mini)),
        None => TOOLTIP.to_string(),
    }
}

/// Refresh the tray title and tooltip from a mini payload
pub fn update_tray_status(app: &AppHandle, mini: &MiniWidgetUpdate) {
    let Some(tray) = app.tray_by_id(TRAY_ID) else {
        log::warn!("[widget:tray] Tray icon not found");
        return;
    };

    if let Err(e) = tray.set_title(Some(tray_title(mini))) {
        log::warn!("[widget:tray] Failed to set tray title: {}", e);
    }
    if let Err(e) = tray.set_tooltip(Some(tray_tooltip(mini))) {
        log::warn!("[widget:tray] Failed to set tray tooltip: {}", e);
    }
}

// =============================================================================
// Setup
// =============================================================================

/// Create the tray icon with its menu
pub fn setup_tray(app: &AppHandle) -> tauri::Result<()> {
    let refresh_item = MenuItem::with_id(app, MENU_REFRESH, "Refresh", true, None::<&str>)?;
    let mini_item = MenuItem::with_id(
        app,
        MENU_TOGGLE_MINI,
        "Toggle Mini Widget",
        true,
        None::<&str>,
    )?;
    let separator = PredefinedMenuItem::separator(app)?;
    let quit_item = MenuItem::with_id(app, MENU_QUIT, "Quit", true, None::<&str>)?;
    let menu = Menu::with_items(app, &[&refresh_item, &mini_item, &separator, &quit_item])?;

    TrayIconBuilder::with_id(TRAY_ID)
        .icon(Image::new_owned(icon_rgba(), ICON_SIZE, ICON_SIZE))
        .tooltip(TOOLTIP)
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| match event.id.as_ref() {
            MENU_REFRESH => {
                log::info!("[widget:tray] Manual refresh");
                events::spawn_refresh(app);
            }
            MENU_TOGGLE_MINI => {
                if let Err(e) = windows::toggle_mini(app) {
                    log::error!("[widget:tray] Failed to toggle mini widget: {}", e);
                }
            }
            MENU_QUIT => {
                if let Some(state) = app.try_state::<WidgetState>() {
                    state.stop_polling();
                }
                app.exit(0);
            }
            _ => {}
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                rect,
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                let app = tray.app_handle();
                let position = rect.position.to_physical::<f64>(1.0);
                let size = rect.size.to_physical::<f64>(1.0);
                let anchor = windows::TrayAnchor {
                    x: position.x,
                    y: position.y,
                    width: size.width,
                };
                if let Err(e) = windows::toggle_popup(app, Some(anchor)) {
                    log::error!("[widget:tray] Failed to toggle popup: {}", e);
                }
            }
        })
        .build(app)?;

    log::info!("[widget:tray] Tray icon created");
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
