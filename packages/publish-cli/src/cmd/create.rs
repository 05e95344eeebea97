//! `create` and `publish` commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use post_composer::{
    Article, ContentRepository, EntityId, MemoryRepository, PostInput, Publisher,
};
use tracing::info;

use super::{article_url, connect, Output};
use crate::config::Config;

pub struct CreateOptions {
    pub file: PathBuf,
    /// `Some` when `--publish` or `--draft` overrides the file
    pub publish: Option<bool>,
    pub dry_run: bool,
    pub upload_concurrency: usize,
}

/// Read a post description, applying the publish override.
pub fn load_input(path: &Path, publish: Option<bool>) -> Result<PostInput> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read post file {}", path.display()))?;
    let mut input: PostInput = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid post JSON in {}", path.display()))?;

    if let Some(publish) = publish {
        input.publish = publish;
    }
    Ok(input)
}

pub async fn run(config: &Config, opts: &CreateOptions, output: Output) -> Result<()> {
    let input = load_input(&opts.file, opts.publish)?;

    if opts.dry_run {
        return dry_run(&input, opts, output).await;
    }

    let repo = connect(config)?;
    let publisher = Publisher::new(repo).with_upload_concurrency(opts.upload_concurrency);

    info!(title = %input.title, publish = input.publish, "Creating article");

    match publisher.publish(&input).await {
        Ok(article) => {
            print_article(&config.strapi_url, &article, output)?;
            Ok(())
        }
        Err(err) => {
            if let Some(draft) = err.created_article() {
                println!(
                    "{} Article {} was created but could not be published",
                    "⚠".yellow(),
                    draft.id
                );
                println!("   Retry with: publish-post publish {}", draft.id);
            }
            Err(err).context("Failed to create post")
        }
    }
}

/// Compose against an in-memory store seeded with the post's own
/// author and category, then print the payload that would be sent.
async fn dry_run(input: &PostInput, opts: &CreateOptions, output: Output) -> Result<()> {
    let repo = MemoryRepository::new()
        .with_author(input.author_email.as_str())
        .with_category(input.category_slug.as_str(), input.category_slug.as_str());

    let publisher = Publisher::new(repo).with_upload_concurrency(opts.upload_concurrency);
    let article = publisher.publish(input).await?;

    let stored = publisher
        .repository()
        .articles()
        .into_iter()
        .find(|stored| stored.article.id == article.id)
        .context("Dry run did not store the article")?;

    if !output.json {
        println!(
            "{} Dry run: {} blocks, {} uploads",
            "✓".green(),
            stored.payload.blocks.len(),
            input.upload_count()
        );
    }
    println!("{}", serde_json::to_string_pretty(&stored.payload)?);
    Ok(())
}

/// Publish a draft created earlier.
pub async fn publish_existing(config: &Config, id: u64) -> Result<()> {
    let repo = connect(config)?;
    repo.publish_article(&EntityId::Numeric(id))
        .await
        .with_context(|| format!("Failed to publish article {}", id))?;

    println!("{} Article {} published", "✅".green(), id);
    Ok(())
}

fn print_article(base_url: &str, article: &Article, output: Output) -> Result<()> {
    if output.json {
        println!("{}", serde_json::to_string_pretty(article)?);
        return Ok(());
    }

    if article.is_published() {
        println!("{}", "✅ Article published!".green().bold());
    } else {
        println!("{}", "✅ Article created as draft".green().bold());
    }
    println!("📝 Article ID: {}", article.id);

    if let Some(slug) = &article.slug {
        println!("🔗 Slug: {}", slug);
        println!("🌐 View at: {}", article_url(base_url, slug).cyan());
    }
    Ok(())
}
