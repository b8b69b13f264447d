//! Popup and mini overlay windows
//!
//! Both windows are created lazily and hidden instead of destroyed. The
//! geometry helpers are pure so they can be tested without a display.

use tauri::{
    AppHandle, Manager, PhysicalPosition, WebviewUrl, WebviewWindow, WebviewWindowBuilder,
    WindowEvent,
};
use zusage_core::bridge::{MINI_LABEL, POPUP_LABEL};
use zusage_core::MiniPosition;

use crate::commands::WidgetState;
use crate::events;

pub const POPUP_WIDTH: f64 = 320.0;
pub const POPUP_HEIGHT: f64 = 280.0;
/// Gap between the popup and the tray icon
pub const POPUP_GAP: f64 = 8.0;

pub const MINI_WIDTH: f64 = 120.0;
pub const MINI_HEIGHT: f64 = 36.0;
/// Distance from the monitor edge
pub const MINI_MARGIN: f64 = 16.0;

/// Tray icon bounds in physical pixels, as reported by the last click
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrayAnchor {
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

// =============================================================================
// Geometry
// =============================================================================

/// Popup origin: centred over the tray icon, `POPUP_GAP` above it, never above the screen top
pub fn popup_position(anchor: TrayAnchor, popup_width: f64, popup_height: f64) -> (f64, f64) {
    let x = (anchor.x + anchor.width / 2.0 - popup_width / 2.0).round();
    let y = (anchor.y - popup_height - POPUP_GAP).round().max(0.0);
    (x, y)
}

/// Mini overlay origin on a monitor, all values in physical pixels
pub fn mini_origin(
    position: MiniPosition,
    monitor_origin: (i32, i32),
    monitor_size: (u32, u32),
    mini_size: (u32, u32),
    margin: i32,
) -> (i32, i32) {
    let (mx, my) = monitor_origin;
    let right = mx + monitor_size.0 as i32 - mini_size.0 as i32 - margin;
    let bottom = my + monitor_size.1 as i32 - mini_size.1 as i32 - margin;
    let left = mx + margin;
    let top = my + margin;

    match position {
        MiniPosition::TopLeft => (left, top),
        MiniPosition::TopRight => (right, top),
        MiniPosition::BottomLeft => (left, bottom),
        MiniPosition::BottomRight => (right, bottom),
        MiniPosition::At { x, y } => (x, y),
    }
}

// =============================================================================
// Popup
// =============================================================================

/// The popup closes as soon as it loses focus
pub fn hides_popup(event: &WindowEvent) -> bool {
    matches!(event, WindowEvent::Focused(false))
}

/// Create the popup window (hidden by default)
pub fn create_popup_window(app: &AppHandle) -> tauri::Result<WebviewWindow> {
    let window = WebviewWindowBuilder::new(app, POPUP_LABEL, WebviewUrl::App("index.html".into()))
        .title("Z.ai Usage")
        .inner_size(POPUP_WIDTH, POPUP_HEIGHT)
        .resizable(false)
        .visible(false)
        .decorations(false)
        .always_on_top(true)
        .skip_taskbar(true)
        .build()?;

    let popup = window.clone();
    window.on_window_event(move |event| {
        if hides_popup(event) {
            if let Err(e) = popup.hide() {
                log::warn!("[widget:tray] Failed to hide popup on blur: {}", e);
            }
        }
    });

    log::info!("[widget:tray] Popup window created");
    Ok(window)
}

/// Toggle the popup, placing it over `anchor` (or the last known tray position)
pub fn toggle_popup(app: &AppHandle, anchor: Option<TrayAnchor>) -> tauri::Result<()> {
    let window = match app.get_webview_window(POPUP_LABEL) {
        Some(window) => window,
        None => create_popup_window(app)?,
    };

    if window.is_visible().unwrap_or(false) {
        log::debug!("[widget:tray] Hiding popup");
        return window.hide();
    }

    let anchor = match app.try_state::<WidgetState>() {
        Some(state) => state.remember_anchor(anchor),
        None => anchor,
    };

    if let Some(anchor) = anchor {
        let size = window.outer_size()?;
        let (x, y) = popup_position(anchor, f64::from(size.width), f64::from(size.height));
        window.set_position(PhysicalPosition::new(x, y))?;
    }

    log::debug!("[widget:tray] Showing popup");
    window.show()?;
    window.set_focus()?;

    events::spawn_refresh(app);
    Ok(())
}

/// Hide the popup if it exists
pub fn hide_popup(app: &AppHandle) -> tauri::Result<()> {
    match app.get_webview_window(POPUP_LABEL) {
        Some(window) => window.hide(),
        None => Ok(()),
    }
}

// =============================================================================
// Mini Overlay
// =============================================================================

/// Create the mini overlay at its configured position
pub fn create_mini_window(app: &AppHandle, position: MiniPosition) -> tauri::Result<WebviewWindow> {
    let window = WebviewWindowBuilder::new(app, MINI_LABEL, WebviewUrl::App("mini.html".into()))
        .title("Z.ai Mini")
        .inner_size(MINI_WIDTH, MINI_HEIGHT)
        .resizable(false)
        .visible(false)
        .decorations(false)
        .always_on_top(true)
        .skip_taskbar(true)
        .focused(false)
        .build()?;

    match app.primary_monitor()? {
        Some(monitor) => {
            let scale = monitor.scale_factor();
            let size = window.outer_size()?;
            let (x, y) = mini_origin(
                position,
                (monitor.position().x, monitor.position().y),
                (monitor.size().width, monitor.size().height),
                (size.width, size.height),
                (MINI_MARGIN * scale).round() as i32,
            );
            window.set_position(PhysicalPosition::new(x, y))?;
        }
        None => {
            log::warn!("[widget:tray] No primary monitor, mini widget left at default position")
        }
    }

    window.show()?;
    log::info!("[widget:tray] Mini widget created at {}", position);
    Ok(window)
}

/// Show the mini overlay, creating it on first use, or hide it if visible
pub fn toggle_mini(app: &AppHandle) -> tauri::Result<()> {
    if let Some(window) = app.get_webview_window(MINI_LABEL) {
        if window.is_visible().unwrap_or(false) {
            log::debug!("[widget:tray] Hiding mini widget");
            return window.hide();
        }
        window.show()?;
        events::spawn_mini_sync(app);
        return Ok(());
    }

    let position = app
        .try_state::<WidgetState>()
        .map(|state| state.config.mini_position)
        .unwrap_or_default();
    create_mini_window(app, position)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
