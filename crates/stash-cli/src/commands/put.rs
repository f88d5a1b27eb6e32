//! put command - upload a local file under a key

use super::CommandContext;
use crate::utils::format_size;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use stash_core::types::{ObjectAcl, PutObject};
use stash_core::utils::guess_content_type;
use std::path::Path;

#[derive(Serialize)]
struct PutResult {
    bucket: String,
    key: String,
    size: u64,
    content_type: String,
    acl: ObjectAcl,
}

pub async fn execute(
    ctx: &CommandContext,
    file: &Path,
    key: &str,
    acl: Option<ObjectAcl>,
    content_type: Option<String>,
) -> Result<()> {
    let body = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {:?}", file))?;
    let size = body.len() as u64;

    let acl = acl.unwrap_or(ctx.upload.acl);
    let content_type = content_type.unwrap_or_else(|| guess_content_type(file));

    ctx.debug(&format!(
        "Uploading {:?} to {}/{} ({}, {})",
        file, ctx.bucket, key, content_type, acl
    ));

    let request = PutObject::new(&ctx.bucket, key, body)
        .with_acl(acl)
        .with_content_type(&content_type);
    let key = ctx.store.put_object(request).await.context("Upload failed")?;

    if ctx.is_json() {
        let result = PutResult {
            bucket: ctx.bucket.clone(),
            key,
            size,
            content_type,
            acl,
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if !ctx.quiet {
        println!(
            "{}: {:?} -> {}/{} ({})",
            "upload".green(),
            file,
            ctx.bucket,
            key,
            format_size(size, true)
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::local_context;
    use crate::OutputFormat;

    #[tokio::test]
    async fn test_put_file() {
        let (dir, ctx) = local_context(OutputFormat::Text).await;
        let file = dir.path().join("report.pdf");
        std::fs::write(&file, b"%PDF-1.7").unwrap();

        execute(&ctx, &file, "docs/report.pdf", None, None).await.unwrap();

        let data = ctx.store.get_object("media", "docs/report.pdf", None).await.unwrap();
        assert_eq!(data.body.as_ref(), b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_put_missing_file() {
        let (dir, ctx) = local_context(OutputFormat::Json).await;
        let err = execute(&ctx, &dir.path().join("nope"), "k", None, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
