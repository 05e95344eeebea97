//! Read-only article listings.

use anyhow::{Context, Result};
use colored::Colorize;
use post_composer::{Article, ArticleQuery, Page, PageRequest};

use super::{article_url, connect, Output};
use crate::config::Config;

pub enum Listing {
    Featured { page: u32, page_size: u32 },
    Recent { limit: u32 },
    Category { slug: String, page: u32, page_size: u32 },
    Related { slug: String, limit: u32 },
}

impl Listing {
    fn title(&self) -> String {
        match self {
            Listing::Featured { .. } => "Featured articles".to_string(),
            Listing::Recent { .. } => "Recent articles".to_string(),
            Listing::Category { slug, .. } => format!("Articles in {}", slug),
            Listing::Related { slug, .. } => format!("Related to {}", slug),
        }
    }

    async fn fetch<Q: ArticleQuery + ?Sized>(&self, query: &Q) -> post_composer::RepositoryResult<Page<Article>> {
        match self {
            Listing::Featured { page, page_size } => {
                query.featured(PageRequest::new(*page, *page_size)).await
            }
            Listing::Recent { limit } => query.recent(*limit).await,
            Listing::Category {
                slug,
                page,
                page_size,
            } => {
                query
                    .by_category(slug, PageRequest::new(*page, *page_size))
                    .await
            }
            Listing::Related { slug, limit } => query.related(slug, *limit).await,
        }
    }
}

pub async fn run(config: &Config, listing: Listing, output: Output) -> Result<()> {
    let repo = connect(config)?;
    let page = listing
        .fetch(&repo)
        .await
        .with_context(|| format!("Failed to load {}", listing.title().to_lowercase()))?;

    if output.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    println!("{}", listing.title().bold());
    if page.items.is_empty() {
        println!("   {}", "No articles".dimmed());
    }
    for article in &page.items {
        print_line(&config.strapi_url, article);
    }
    println!(
        "{}",
        format!(
            "page {}/{} ({} total)",
            page.pagination.page, page.pagination.page_count, page.pagination.total
        )
        .dimmed()
    );
    Ok(())
}

pub async fn show(config: &Config, slug: &str, output: Output) -> Result<()> {
    let repo = connect(config)?;
    let article = repo
        .by_slug(slug)
        .await
        .with_context(|| format!("Failed to load article {}", slug))?;

    if output.json {
        println!("{}", serde_json::to_string_pretty(&article)?);
    } else {
        print_line(&config.strapi_url, &article);
        if let Some(description) = &article.description {
            println!("   {}", description);
        }
    }
    Ok(())
}

fn print_line(base_url: &str, article: &Article) {
    let star = if article.featured { "★ ".yellow().to_string() } else { String::new() };
    let date = article
        .publish_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    println!("{}{} {}", star, article.title.bold(), date.dimmed());
    if let Some(slug) = &article.slug {
        println!("   {}", article_url(base_url, slug).cyan());
    }
}
