//! Stash - object storage helpers for user uploads
//!
//! Puts, fetches, lists and deletes objects in an S3 bucket (or a local
//! directory standing in for one) and runs validated image uploads.

mod commands;
mod store;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use commands::upload_image::UploadImageOptions;
use commands::CommandContext;
use stash_core::config::StashConfig;
use stash_core::types::{ImageConstraints, ObjectAcl};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Bucket name used by `--local` when none is configured
const LOCAL_BUCKET: &str = "default";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "stash")]
#[command(author = "Stash Team")]
#[command(version = stash_core::VERSION)]
#[command(about = "Object storage helpers for user uploads", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Bucket name
    #[arg(short, long, global = true)]
    bucket: Option<String>,

    /// AWS region
    #[arg(long, global = true)]
    region: Option<String>,

    /// Custom endpoint for S3-compatible services
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Use a local directory instead of S3
    #[arg(long, global = true, env = "STASH_LOCAL_DIR")]
    local: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors and essential output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a local file under KEY
    Put {
        file: PathBuf,
        key: String,

        /// Canned ACL, e.g. private or public-read
        #[arg(long)]
        acl: Option<ObjectAcl>,

        /// Content type; guessed from the file name when unset
        #[arg(long)]
        content_type: Option<String>,
    },

    /// Download an object to a file or stdout
    Get {
        key: String,

        /// Write to FILE instead of stdout
        #[arg(short = 'O', long = "out")]
        output: Option<PathBuf>,

        /// Range header, e.g. bytes=0-499 or bytes=500-
        #[arg(long)]
        range: Option<String>,
    },

    /// Show the size and URL of an object
    Head { key: String },

    /// List keys under a prefix
    Ls {
        #[arg(default_value = "")]
        prefix: String,
    },

    /// Delete objects by key or public URL
    Rm {
        #[arg(required = true)]
        targets: Vec<String>,
    },

    /// Print the public URL of a key
    Url { key: String },

    /// Validate an image and upload it under a generated key
    UploadImage {
        file: PathBuf,

        /// Owner of the upload, embedded in the key
        #[arg(long)]
        user: String,

        /// Key prefix; defaults to the configured upload directory
        #[arg(long)]
        dir: Option<String>,

        #[arg(long)]
        min_width: Option<u32>,

        #[arg(long)]
        max_width: Option<u32>,

        #[arg(long)]
        min_height: Option<u32>,

        #[arg(long)]
        max_height: Option<u32>,

        /// Largest accepted file in kilobytes
        #[arg(long)]
        max_size_kb: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = load_config(&cli)?;
    init_logging(&config, cli.verbose, cli.quiet);

    debug!(
        "Using bucket '{}' in {}{}",
        config.s3.bucket,
        config.s3.region,
        cli.local
            .as_ref()
            .map(|dir| format!(" (local store at {:?})", dir))
            .unwrap_or_default()
    );

    let store = store::open_store(&config.s3, cli.local.as_deref()).await?;

    let ctx = CommandContext {
        store,
        bucket: config.s3.bucket.clone(),
        region: config.s3.region.clone(),
        upload: config.upload.clone(),
        output_format: cli.output,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Put {
            file,
            key,
            acl,
            content_type,
        } => commands::put::execute(&ctx, &file, &key, acl, content_type).await,
        Commands::Get { key, output, range } => {
            commands::get::execute(&ctx, &key, output.as_deref(), range.as_deref()).await
        }
        Commands::Head { key } => commands::head::execute(&ctx, &key).await,
        Commands::Ls { prefix } => commands::ls::execute(&ctx, &prefix).await,
        Commands::Rm { targets } => commands::rm::execute(&ctx, &targets).await,
        Commands::Url { key } => commands::url::execute(&ctx, &key),
        Commands::UploadImage {
            file,
            user,
            dir,
            min_width,
            max_width,
            min_height,
            max_height,
            max_size_kb,
        } => {
            let constraints = ImageConstraints {
                min_width,
                min_height,
                max_width,
                max_height,
                max_file_size_kb: max_size_kb,
            };
            let opts = UploadImageOptions {
                user_id: user,
                directory: dir,
                constraints,
            };
            commands::upload_image::execute(&ctx, &file, opts).await
        }
    }
}

/// Config file (or defaults), then `STASH_*` variables, then flags
fn load_config(cli: &Cli) -> Result<StashConfig> {
    let mut config = match &cli.config {
        Some(path) => StashConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => StashConfig::default(),
    };
    config.apply_env();

    if let Some(bucket) = &cli.bucket {
        config.s3.bucket = bucket.clone();
    }
    if let Some(region) = &cli.region {
        config.s3.region = region.clone();
    }
    if let Some(endpoint) = &cli.endpoint {
        config.s3.endpoint = Some(endpoint.clone());
    }
    if cli.local.is_some() && config.s3.bucket.is_empty() {
        config.s3.bucket = LOCAL_BUCKET.to_string();
    }

    Ok(config)
}

fn init_logging(config: &StashConfig, verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        config.logging.level.as_str()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (json, text) = if config.logging.format.eq_ignore_ascii_case("json") {
        (Some(fmt::layer().json().with_writer(std::io::stderr)), None)
    } else {
        (
            None,
            Some(fmt::layer().with_target(true).with_writer(std::io::stderr)),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .init();
}
