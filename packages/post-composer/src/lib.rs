//! Blog post composition and publishing for a headless CMS.
//!
//! Turns a flat [`PostInput`] into an ordered list of typed content blocks,
//! resolved relation ids and an SEO payload, then drives a
//! [`ContentRepository`] through lookup → upload → compose → create → publish.
//!
//! # Usage
//!
//! ```rust,ignore
//! use post_composer::{MemoryRepository, PostInput, Publisher};
//!
//! let repo = MemoryRepository::new()
//!     .with_author("john@example.com")
//!     .with_category("technology", "Technology");
//!
//! let mut input = PostInput::new("Hello", "First post", "john@example.com", "technology");
//! input.introduction = Some("Welcome!".into());
//! input.publish = true;
//!
//! let article = Publisher::new(repo).publish(&input).await?;
//! ```
//!
//! # Modules
//!
//! - [`composer`] - Pure payload composition
//! - [`workflow`] - The publishing state machine
//! - [`traits`] - Repository and query interfaces
//! - [`types`] - Post input, content blocks, articles
//! - [`stores`] - In-memory repository
//! - [`repositories`] - Strapi-backed repository (feature `strapi`)
//! - [`testing`] - Mock repository for tests

pub mod clock;
pub mod composer;
pub mod error;
pub mod repositories;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;
pub mod workflow;

pub use clock::{Clock, FixedClock, SystemClock};
pub use composer::{build_blocks, compose, compose_at};
pub use error::{EntityKind, PublishError, RepositoryError, RepositoryResult, Result};
pub use stores::{MemoryRepository, StoredArticle};
pub use traits::{
    query::{ArticleQuery, DEFAULT_RECENT_LIMIT, DEFAULT_RELATED_LIMIT},
    repository::ContentRepository,
};
pub use types::{
    article::{Article, ArticlePayload, Page, PageRequest, Pagination, ResolvedRefs, Seo},
    block::ContentBlock,
    input::{ContentSection, PostInput, Quote, SeoOverrides, DEFAULT_META_ROBOTS, DEFAULT_READING_TIME},
    EntityId,
};
pub use workflow::{publish_post, Publisher, PublisherConfig, WorkflowStep};

#[cfg(feature = "strapi")]
pub use repositories::StrapiRepository;
