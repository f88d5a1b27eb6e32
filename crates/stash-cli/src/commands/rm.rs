//! rm command - remove objects by key or public URL

use super::CommandContext;
use crate::store::Target;
use anyhow::{Context, Result};
use colored::Colorize;
use stash_core::types::key_from_url;

pub async fn execute(ctx: &CommandContext, targets: &[String]) -> Result<()> {
    if targets.is_empty() {
        anyhow::bail!("Nothing to delete");
    }

    if let [single] = targets {
        return delete_one(ctx, single).await;
    }

    let keys = targets
        .iter()
        .map(|arg| match Target::parse(arg) {
            Target::Key(key) => Ok(key),
            Target::Url(url) => key_from_url(&url).with_context(|| format!("Invalid URL: {}", url)),
        })
        .collect::<Result<Vec<_>>>()?;

    ctx.debug(&format!("Deleting {} object(s) from {}", keys.len(), ctx.bucket));

    ctx.store
        .delete_objects(&ctx.bucket, &keys)
        .await
        .context("Batch delete failed")?;

    if !ctx.quiet {
        for key in &keys {
            println!("{}: {}/{}", "delete".red(), ctx.bucket, key);
        }
        println!("\nDeleted {} object(s)", keys.len());
    }

    Ok(())
}

async fn delete_one(ctx: &CommandContext, arg: &str) -> Result<()> {
    match Target::parse(arg) {
        Target::Key(key) => {
            ctx.debug(&format!("Deleting {}/{}", ctx.bucket, key));
            ctx.store
                .delete_object(&ctx.bucket, &key)
                .await
                .context("Delete failed")?;
            ctx.info(&format!("{}: {}/{}", "delete".red(), ctx.bucket, key));
        }
        Target::Url(url) => {
            ctx.debug(&format!("Deleting object at {}", url));
            ctx.store
                .delete_object_by_url(&ctx.bucket, &url)
                .await
                .context("Delete failed")?;
            ctx.info(&format!("{}: {}", "delete".red(), url));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::local_context;
    use crate::OutputFormat;
    use stash_core::types::{object_url, PutObject};

    async fn seed(ctx: &CommandContext, keys: &[&str]) {
        for key in keys {
            ctx.store
                .put_object(PutObject::new("media", *key, "x"))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_rm_by_key_and_url() {
        let (_dir, ctx) = local_context(OutputFormat::Text).await;
        seed(&ctx, &["a/1.png", "a/2.png"]).await;

        execute(&ctx, &["a/1.png".to_string()]).await.unwrap();
        execute(&ctx, &[object_url("us-east-1", "media", "a/2.png")])
            .await
            .unwrap();

        assert!(ctx.store.list_objects("media", "").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rm_batch_mixed() {
        let (_dir, ctx) = local_context(OutputFormat::Text).await;
        seed(&ctx, &["x/1", "x/2", "x/3"]).await;

        execute(
            &ctx,
            &[
                "x/1".to_string(),
                object_url("us-east-1", "media", "x/2"),
            ],
        )
        .await
        .unwrap();

        assert_eq!(ctx.store.list_objects("media", "").await.unwrap(), vec!["x/3"]);
    }

    #[tokio::test]
    async fn test_rm_bad_url() {
        let (_dir, ctx) = local_context(OutputFormat::Text).await;
        let err = execute(&ctx, &["https://example.com/media/a.png".to_string()])
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("not an S3 object URL"));
        assert!(execute(&ctx, &[]).await.is_err());
    }
}
