//! upload-image command - validate an image and upload it under a generated key

use super::CommandContext;
use crate::utils::{describe_constraints, format_size};
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use stash_core::types::{object_url, ImageConstraints};
use stash_core::utils::extract_filename;
use stash_upload::{upload_image, DiskStaging, ImageUpload};
use std::path::Path;

pub struct UploadImageOptions {
    pub user_id: String,
    /// Key prefix; the configured upload directory when unset
    pub directory: Option<String>,
    pub constraints: ImageConstraints,
}

#[derive(Serialize)]
struct UploadResult {
    bucket: String,
    key: String,
    url: String,
    size: u64,
}

pub async fn execute(ctx: &CommandContext, file: &Path, opts: UploadImageOptions) -> Result<()> {
    let data = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {:?}", file))?;
    let original_name = extract_filename(&file.to_string_lossy()).to_string();

    let staging = DiskStaging::from_config(&ctx.upload);
    let staged = staging
        .stage(&original_name, &data)
        .await
        .context("Failed to stage file")?;

    ctx.debug(&format!("Staged {:?} as {:?}", file, staged.path()));
    ctx.debug(&format!(
        "Constraints: {}",
        describe_constraints(&opts.constraints)
    ));

    let directory = opts
        .directory
        .unwrap_or_else(|| ctx.upload.directory.clone());
    let upload = ImageUpload::new(&ctx.bucket, opts.user_id, directory)
        .with_constraints(opts.constraints)
        .with_acl(ctx.upload.acl);

    let key = match upload_image(ctx.store.as_ref(), &upload, &staged).await {
        Ok(key) => key,
        Err(e) => {
            let code = e.code();
            return Err(anyhow::Error::new(e).context(format!("Upload rejected ({})", code)));
        }
    };
    let url = object_url(&ctx.region, &ctx.bucket, &key);

    if ctx.is_json() {
        let result = UploadResult {
            bucket: ctx.bucket.clone(),
            key,
            url,
            size: staged.size,
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if !ctx.quiet {
        println!(
            "{}: {} -> {} ({})",
            "upload".green(),
            original_name,
            url,
            format_size(staged.size, true)
        );
    } else {
        println!("{}", key);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::local_context;
    use crate::OutputFormat;

    fn pixel_png() -> Vec<u8> {
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(image::RgbaImage::new(1, 1))
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn options(constraints: ImageConstraints) -> UploadImageOptions {
        UploadImageOptions {
            user_id: "user-1".to_string(),
            directory: Some("avatars".to_string()),
            constraints,
        }
    }

    #[tokio::test]
    async fn test_upload_image_command() {
        let (dir, ctx) = local_context(OutputFormat::Json).await;
        let file = dir.path().join("pixel.png");
        std::fs::write(&file, pixel_png()).unwrap();

        execute(&ctx, &file, options(ImageConstraints::new().with_max_width(10)))
            .await
            .unwrap();

        let keys = ctx.store.list_objects("media", "avatars/").await.unwrap();
        assert_eq!(keys.len(), 1);
        assert!(keys[0].starts_with("avatars/user-1."));
        assert!(keys[0].ends_with(".png"));

        let staged: Vec<_> = std::fs::read_dir(&ctx.upload.staging_dir).unwrap().collect();
        assert!(staged.is_empty());
    }

    #[tokio::test]
    async fn test_upload_image_rejected() {
        let (dir, ctx) = local_context(OutputFormat::Text).await;
        let file = dir.path().join("pixel.png");
        std::fs::write(&file, pixel_png()).unwrap();

        let err = execute(&ctx, &file, options(ImageConstraints::new().with_min_width(2)))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("WIDTH_TOO_SMALL"));
        assert!(ctx.store.list_objects("media", "").await.unwrap().is_empty());
    }
}
