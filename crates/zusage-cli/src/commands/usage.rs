//! Usage command

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;
use zusage_core::{QuotaSource, UsageRange};

use super::Context;
use crate::output::{print_info, print_json, print_output, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
pub struct UsageRow {
    #[tabled(rename = "Time")]
    pub time: String,
    #[tabled(rename = "Calls")]
    pub calls: u64,
    #[tabled(rename = "Tokens")]
    pub tokens: u64,
}

pub async fn show_usage(ctx: &Context, hours: u32) -> Result<()> {
    let range = UsageRange::last_hours(hours)?;
    log::debug!("[cli] Usage range {} .. {}", range.start, range.end);

    let usage = ctx.client.fetch_usage(&range.start, &range.end).await?;

    if ctx.format == OutputFormat::Json {
        return print_json(&usage);
    }

    print_info(
        &format!("Model usage from {} to {}", range.start, range.end),
        ctx.quiet,
    );

    let rows: Vec<UsageRow> = usage
        .buckets()
        .filter(|(_, calls, tokens)| *calls > 0 || *tokens > 0)
        .map(|(time, calls, tokens)| UsageRow {
            time: time.to_string(),
            calls,
            tokens,
        })
        .collect();

    print_output(&rows, ctx.format, "No usage in this window.")?;
    println!(
        "Total: {} calls, {} tokens",
        usage.total_usage.total_model_call_count, usage.total_usage.total_tokens_usage
    );
    Ok(())
}
