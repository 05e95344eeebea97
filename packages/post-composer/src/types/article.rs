//! Composed article payload, created article records, and paging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::block::ContentBlock;
use super::EntityId;

/// Ids obtained from the repository before composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRefs {
    pub author: EntityId,
    pub category: EntityId,
    pub cover: Option<EntityId>,
    /// Paired by index with the post's content sections.
    pub content_images: Vec<EntityId>,
}

impl ResolvedRefs {
    pub fn new(author: impl Into<EntityId>, category: impl Into<EntityId>) -> Self {
        Self {
            author: author.into(),
            category: category.into(),
            cover: None,
            content_images: Vec::new(),
        }
    }

    pub fn with_cover(mut self, cover: impl Into<EntityId>) -> Self {
        self.cover = Some(cover.into());
        self
    }

    pub fn with_content_images<I>(mut self, images: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<EntityId>,
    {
        self.content_images = images.into_iter().map(Into::into).collect();
        self
    }
}

/// SEO metadata attached to an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    pub meta_title: String,
    pub meta_description: String,
    pub keywords: String,
    pub meta_robots: String,
    #[serde(
        rename = "canonicalURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub canonical_url: Option<String>,
}

/// Body submitted to the repository's create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePayload {
    pub title: String,
    pub description: String,
    pub author: EntityId,
    pub category: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<EntityId>,
    pub publish_date: DateTime<Utc>,
    pub reading_time: u32,
    pub featured: bool,
    pub tags: Vec<String>,
    pub seo: Seo,
    pub blocks: Vec<ContentBlock>,
}

/// An article record as held by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: EntityId,
    #[serde(default)]
    pub slug: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub publish_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: Option<EntityId>,
}

impl Article {
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }
}

/// Page selection for list queries. Pages start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 25,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// First page holding `size` items.
    pub fn first(size: u32) -> Self {
        Self::new(1, size)
    }

    /// Cut this page out of an already filtered and sorted list.
    pub fn slice<T>(self, items: Vec<T>) -> Page<T> {
        let total = items.len() as u64;
        let size = self.page_size.max(1) as usize;
        let start = (self.page.max(1) as usize - 1) * size;

        let items = items.into_iter().skip(start).take(size).collect();
        Page {
            items,
            pagination: Pagination::new(self, total),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub total: u64,
}

impl Pagination {
    pub fn new(request: PageRequest, total: u64) -> Self {
        let page_size = request.page_size.max(1);
        Self {
            page: request.page.max(1),
            page_size,
            page_count: total.div_ceil(u64::from(page_size)) as u32,
            total,
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}
