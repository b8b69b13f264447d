//! Quota commands
//!
//! `quota` prints every token limit the way the popup lists them; `mini`
//! prints the one limit the overlay tracks.

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use tabled::Tabled;
use zusage_core::bridge::MiniWidgetUpdate;
use zusage_core::services::quota::popup_rows;
use zusage_core::{DisplayPreference, QuotaSource};

use super::Context;
use crate::output::{paint_status, print_info, print_json, print_output, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
pub struct QuotaTableRow {
    #[tabled(rename = "Quota")]
    pub label: String,
    #[tabled(rename = "Period")]
    pub period: String,
    #[tabled(rename = "Used")]
    pub used: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Reset")]
    pub reset: String,
}

pub async fn show_quota(ctx: &Context) -> Result<()> {
    let quota = ctx.client.fetch_quota().await?;
    let rows = popup_rows(&quota, Utc::now().timestamp_millis());

    if ctx.format == OutputFormat::Json {
        return print_json(&rows);
    }

    if !quota.level.is_empty() {
        print_info(&format!("Plan: {}", quota.level), ctx.quiet);
    }

    let table: Vec<QuotaTableRow> = rows
        .into_iter()
        .map(|row| QuotaTableRow {
            label: row.label,
            period: row.period,
            used: format!("{}%", row.percent),
            status: row.status.to_string(),
            reset: row.reset_text,
        })
        .collect();

    print_output(&table, ctx.format, "No token quotas reported.")
}

pub async fn show_mini(ctx: &Context, quota: Option<DisplayPreference>) -> Result<()> {
    let preference = quota.unwrap_or(ctx.config.mini_quota);
    let snapshot = ctx.client.fetch_quota().await?;
    let update = MiniWidgetUpdate::from_snapshot(Some(&snapshot), preference, None);

    match ctx.format {
        OutputFormat::Json => print_json(&update),
        OutputFormat::Table => {
            let view = &update.view;
            let percent = match view.status {
                Some(status) => paint_status(&view.percent_text, status),
                None => view.percent_text.clone(),
            };
            println!("{} {}", view.label, percent);
            Ok(())
        }
    }
}
