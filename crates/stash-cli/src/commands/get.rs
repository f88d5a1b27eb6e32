//! get command - download an object or a byte range of it

use super::CommandContext;
use crate::utils::format_size;
use anyhow::{Context, Result};
use colored::Colorize;
use stash_core::types::ChunkRequest;
use std::path::Path;
use tokio::io::{stdout, AsyncWriteExt};

pub async fn execute(
    ctx: &CommandContext,
    key: &str,
    output: Option<&Path>,
    range: Option<&str>,
) -> Result<()> {
    let chunk = match range {
        Some(header) => Some(resolve_range(ctx, key, header).await?),
        None => None,
    };

    ctx.debug(&format!("Downloading {}/{}", ctx.bucket, key));

    let data = ctx
        .store
        .get_object(&ctx.bucket, key, chunk)
        .await
        .with_context(|| format!("Failed to get {}/{}", ctx.bucket, key))?;

    match output {
        Some(path) => {
            tokio::fs::write(path, &data.body)
                .await
                .with_context(|| format!("Failed to write {:?}", path))?;

            if !ctx.quiet {
                let served = data
                    .range
                    .map(|r| format!(" [{}]", r.range_header()))
                    .unwrap_or_default();
                eprintln!(
                    "{}: {}/{} -> {:?} ({}){}",
                    "download".green(),
                    ctx.bucket,
                    key,
                    path,
                    format_size(data.content_length, true),
                    served
                );
            }
        }
        None => {
            let mut out = stdout();
            out.write_all(&data.body).await?;
            out.flush().await?;
        }
    }

    Ok(())
}

/// Parse a `Range` header against the object's current size
async fn resolve_range(ctx: &CommandContext, key: &str, header: &str) -> Result<ChunkRequest> {
    let size = ctx
        .store
        .head_object(&ctx.bucket, key)
        .await
        .with_context(|| format!("Failed to get size of {}/{}", ctx.bucket, key))?;

    let chunk = ChunkRequest::parse(header, size as i64)?;
    if !chunk.is_satisfiable(size as i64) {
        anyhow::bail!("Range {} not satisfiable for {} bytes", header, size);
    }

    ctx.debug(&format!("Requesting {}", chunk.range_header()));
    Ok(chunk)
}
