//! Config command

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use super::Context;
use crate::output::print_output;

#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

fn row(key: &str, value: impl ToString) -> ConfigRow {
    ConfigRow {
        key: key.to_string(),
        value: value.to_string(),
    }
}

pub fn show_config(ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    let credential = if ctx.client.has_credential() {
        "set"
    } else {
        "not set"
    };

    let rows = vec![
        row("api_key", credential),
        row("api_base", ctx.client.base_url()),
        row("debug", config.debug),
        row("refresh_minutes", config.refresh_interval().as_secs() / 60),
        row("mini_enabled", config.mini_enabled),
        row("mini_position", config.mini_position),
        row("mini_quota", config.mini_quota),
        row("notify", config.notify),
    ];

    print_output(&rows, ctx.format, "")
}
