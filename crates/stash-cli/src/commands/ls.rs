//! ls command - list keys under a prefix

use super::CommandContext;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

#[derive(Serialize)]
struct ListResult {
    bucket: String,
    prefix: String,
    keys: Vec<String>,
    total_objects: usize,
}

pub async fn execute(ctx: &CommandContext, prefix: &str) -> Result<()> {
    ctx.debug(&format!("Listing {} under '{}'", ctx.bucket, prefix));

    let keys = ctx
        .store
        .list_objects(&ctx.bucket, prefix)
        .await
        .context("Failed to list objects")?;

    if ctx.is_json() {
        let result = ListResult {
            bucket: ctx.bucket.clone(),
            prefix: prefix.to_string(),
            total_objects: keys.len(),
            keys,
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    for key in &keys {
        match key.rsplit_once('/') {
            Some((dir, name)) => println!("{}/{}", dir.blue(), name),
            None => println!("{}", key),
        }
    }

    if !ctx.quiet {
        println!("\nTotal: {} object(s)", keys.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::local_context;
    use crate::OutputFormat;
    use stash_core::types::PutObject;

    #[tokio::test]
    async fn test_ls_prefix() {
        let (_dir, ctx) = local_context(OutputFormat::Text).await;
        for key in ["photos/a.png", "photos/b.png", "docs/c.txt"] {
            ctx.store
                .put_object(PutObject::new("media", key, "x"))
                .await
                .unwrap();
        }

        execute(&ctx, "photos/").await.unwrap();
        execute(&ctx, "").await.unwrap();
    }
}
