//! CLI commands module

pub mod config;
pub mod quota;
pub mod usage;
pub mod watch;

use std::sync::Arc;

use zusage_core::{WidgetConfig, ZaiClient};

use crate::output::OutputFormat;

/// Shared context for all commands
pub struct Context {
    pub client: Arc<ZaiClient>,
    pub config: WidgetConfig,
    pub format: OutputFormat,
    pub quiet: bool,
}
