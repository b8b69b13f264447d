//! Watch command
//!
//! Runs the same polling loop as the tray app and prints one line per
//! refresh until Ctrl-C.

use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use tokio::sync::oneshot;
use zusage_core::bridge::DataUpdate;
use zusage_core::services::quota::{interval_from_minutes, run_polling};
use zusage_core::{QuotaRefresher, RefreshOutcome};

use super::Context;
use crate::output::{paint_status, print_error, print_info, OutputFormat};

/// One-line summary of a popup payload
pub fn summary_line(data: &DataUpdate) -> String {
    if let Some(error) = &data.error {
        return error.clone();
    }
    if data.rows.is_empty() {
        return "No token quotas reported".to_string();
    }
    data.rows
        .iter()
        .map(|row| {
            format!(
                "{} {} ({})",
                row.period,
                paint_status(&format!("{}%", row.percent), row.status),
                row.reset_text
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn print_outcome(outcome: &RefreshOutcome, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string(&outcome.data) {
            Ok(line) => println!("{}", line),
            Err(e) => print_error(&format!("Failed to serialize update: {}", e)),
        },
        OutputFormat::Table => {
            let stamp = Local::now().format("%H:%M:%S");
            let line = summary_line(&outcome.data);
            if outcome.data.is_error() {
                print_error(&format!("[{}] {}", stamp, line));
            } else {
                println!("[{}] {}", stamp, line);
            }
            for alert in &outcome.alerts {
                println!("  ! {}: {}", alert.title(), alert.body());
            }
        }
    }
}

pub async fn watch(ctx: &Context, interval_minutes: Option<u32>) -> Result<()> {
    ctx.config.validate()?;

    let interval = interval_minutes
        .map(interval_from_minutes)
        .unwrap_or_else(|| ctx.config.refresh_interval());

    let refresher = Arc::new(QuotaRefresher::new(
        ctx.client.clone(),
        ctx.config.mini_quota,
        ctx.config.debug,
    ));

    print_info(
        &format!(
            "Watching quota every {} min (Ctrl-C to stop)",
            interval.as_secs() / 60
        ),
        ctx.quiet,
    );

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    let format = ctx.format;
    run_polling(refresher, interval, shutdown_rx, move |outcome| {
        print_outcome(outcome, format)
    })
    .await;

    Ok(())
}
