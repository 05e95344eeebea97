use std::path::Path;

use async_trait::async_trait;

use crate::error::RepositoryResult;
use crate::types::article::{Article, ArticlePayload};
use crate::types::EntityId;

/// Write-side capability the publishing workflow needs.
///
/// Lookups return `Ok(None)` when nothing matches; `Err` is reserved for
/// backend failures. Implementations should not retry.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn find_author_by_email(&self, email: &str) -> RepositoryResult<Option<EntityId>>;

    async fn find_category_by_slug(&self, slug: &str) -> RepositoryResult<Option<EntityId>>;

    /// Store a local file and return the asset id.
    async fn upload_asset(&self, path: &Path) -> RepositoryResult<EntityId>;

    /// Create a draft article. The repository generates id and slug.
    async fn create_article(&self, payload: &ArticlePayload) -> RepositoryResult<Article>;

    async fn publish_article(&self, id: &EntityId) -> RepositoryResult<()>;
}
