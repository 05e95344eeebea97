use async_trait::async_trait;

use crate::error::RepositoryResult;
use crate::types::article::{Article, Page, PageRequest};

/// Page size of `recent` when the caller gives no limit.
pub const DEFAULT_RECENT_LIMIT: u32 = 10;

/// `limit` for `recent`, with 0 meaning the default.
pub(crate) fn recent_limit(limit: u32) -> u32 {
    if limit == 0 {
        DEFAULT_RECENT_LIMIT
    } else {
        limit
    }
}

/// Page size of `related` when the caller gives no limit.
pub const DEFAULT_RELATED_LIMIT: u32 = 3;

/// Read-only listing routes over published articles.
///
/// Every operation only returns published articles, newest `publishDate`
/// first.
#[async_trait]
pub trait ArticleQuery: Send + Sync {
    /// Articles flagged as featured.
    async fn featured(&self, page: PageRequest) -> RepositoryResult<Page<Article>>;

    /// The `limit` most recent articles. A limit of 0 means
    /// [`DEFAULT_RECENT_LIMIT`].
    async fn recent(&self, limit: u32) -> RepositoryResult<Page<Article>>;

    /// Articles in the category with this slug.
    ///
    /// Fails with `InvalidQuery` on an empty slug and `NotFound` for an
    /// unknown category.
    async fn by_category(&self, slug: &str, page: PageRequest) -> RepositoryResult<Page<Article>>;

    async fn by_slug(&self, slug: &str) -> RepositoryResult<Article>;

    /// Other articles sharing the category of the article with this slug.
    async fn related(&self, slug: &str, limit: u32) -> RepositoryResult<Page<Article>>;
}
