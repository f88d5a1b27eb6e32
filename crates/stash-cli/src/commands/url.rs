//! url command - print the public URL of a key

use super::CommandContext;
use anyhow::Result;
use stash_core::types::object_url;

pub fn execute(ctx: &CommandContext, key: &str) -> Result<()> {
    let url = object_url(&ctx.region, &ctx.bucket, key.trim_start_matches('/'));

    if ctx.is_json() {
        println!("{}", serde_json::json!({ "key": key, "url": url }));
    } else {
        println!("{}", url);
    }

    Ok(())
}
