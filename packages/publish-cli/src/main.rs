//! Command-line front end for composing and publishing blog posts.
//!
//! Reads a post description as JSON, resolves it against Strapi and
//! creates (and optionally publishes) the article. Also exposes the
//! read-only article listings.

mod cmd;
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "publish-post")]
#[command(about = "Compose and publish blog posts to Strapi")]
#[command(version)]
struct Cli {
    /// Print JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an article from a JSON post file
    Create {
        /// Path to the post JSON
        file: PathBuf,

        /// Publish after creating (overrides the file)
        #[arg(long, conflicts_with = "draft")]
        publish: bool,

        /// Leave the article as a draft (overrides the file)
        #[arg(long)]
        draft: bool,

        /// Compose against an in-memory store instead of Strapi
        #[arg(long)]
        dry_run: bool,

        /// Number of content images uploaded at once
        #[arg(long, env = "PUBLISH_UPLOAD_CONCURRENCY")]
        upload_concurrency: Option<usize>,
    },

    /// Publish an existing draft by id
    Publish { id: u64 },

    /// List featured articles
    Featured {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 25)]
        page_size: u32,
    },

    /// List the most recent articles
    Recent {
        #[arg(long, default_value_t = post_composer::DEFAULT_RECENT_LIMIT)]
        limit: u32,
    },

    /// List articles in a category
    Category {
        slug: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 25)]
        page_size: u32,
    },

    /// Show a single article
    Article { slug: String },

    /// List articles related to an article
    Related {
        slug: String,
        #[arg(long, default_value_t = post_composer::DEFAULT_RELATED_LIMIT)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,post_composer=debug,strapi_client=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let output = cmd::Output { json: cli.json };

    match cli.command {
        Commands::Create {
            file,
            publish,
            draft,
            dry_run,
            upload_concurrency,
        } => {
            let publish = match (publish, draft) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let opts = cmd::create::CreateOptions {
                file,
                publish,
                dry_run,
                upload_concurrency: upload_concurrency.unwrap_or(config.upload_concurrency),
            };
            cmd::create::run(&config, &opts, output).await
        }
        Commands::Publish { id } => cmd::create::publish_existing(&config, id).await,
        Commands::Featured { page, page_size } => {
            cmd::query::run(&config, cmd::query::Listing::Featured { page, page_size }, output).await
        }
        Commands::Recent { limit } => {
            cmd::query::run(&config, cmd::query::Listing::Recent { limit }, output).await
        }
        Commands::Category {
            slug,
            page,
            page_size,
        } => {
            cmd::query::run(
                &config,
                cmd::query::Listing::Category {
                    slug,
                    page,
                    page_size,
                },
                output,
            )
            .await
        }
        Commands::Article { slug } => cmd::query::show(&config, &slug, output).await,
        Commands::Related { slug, limit } => {
            cmd::query::run(&config, cmd::query::Listing::Related { slug, limit }, output).await
        }
    }
}
