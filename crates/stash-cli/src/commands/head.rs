//! head command - show object size

use super::CommandContext;
use crate::utils::format_size;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use stash_core::types::object_url;

#[derive(Serialize)]
struct HeadResult {
    bucket: String,
    key: String,
    content_length: u64,
    url: String,
}

pub async fn execute(ctx: &CommandContext, key: &str) -> Result<()> {
    ctx.debug(&format!("Getting size of {}/{}", ctx.bucket, key));

    let size = ctx
        .store
        .head_object(&ctx.bucket, key)
        .await
        .context("Failed to get object metadata")?;
    let url = object_url(&ctx.region, &ctx.bucket, key);

    if ctx.is_json() {
        let result = HeadResult {
            bucket: ctx.bucket.clone(),
            key: key.to_string(),
            content_length: size,
            url,
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", format!("{}/{}", ctx.bucket, key).blue().bold());
        println!();
        println!(
            "  {}: {} ({})",
            "Content-Length".cyan(),
            size,
            format_size(size, true)
        );
        println!("  {}: {}", "URL".cyan(), url);
    }

    Ok(())
}
