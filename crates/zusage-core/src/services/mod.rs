//! Services module
//!
//! Business logic shared between the CLI and the tray app.

pub mod quota;
