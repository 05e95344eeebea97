//! Typed errors for the composer library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match on
//! the workflow step that failed.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::article::Article;
use crate::workflow::WorkflowStep;

/// Kind of entity a lookup or query targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Author,
    Category,
    Article,
    Asset,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Author => "author",
            EntityKind::Category => "category",
            EntityKind::Article => "article",
            EntityKind::Asset => "asset",
        };
        f.write_str(name)
    }
}

/// Errors raised by a `ContentRepository` or `ArticleQuery` backend.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity does not exist (or is not visible to the caller)
    #[error("{entity} not found: {key}")]
    NotFound { entity: EntityKind, key: String },

    /// Query parameters were rejected
    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },

    /// Payload rejected by the backend's own validation
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    /// Transport or storage failure
    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    pub fn not_found(entity: EntityKind, key: impl Into<String>) -> Self {
        RepositoryError::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        let message: String = message.into();
        RepositoryError::Backend(message.into())
    }
}

/// Errors surfaced by the publishing workflow.
///
/// Every variant before `Publish` means nothing was written. `Publish` means
/// the article exists as a draft and publishing can be retried on its id.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Author or category lookup matched nothing
    #[error("{entity} not found: {key}")]
    NotFound { entity: EntityKind, key: String },

    /// Author or category lookup failed in the backend
    #[error("failed to look up {entity}: {source}")]
    Lookup {
        entity: EntityKind,
        #[source]
        source: RepositoryError,
    },

    /// Cover or content image upload failed
    #[error("failed to upload {}: {source}", .path.display())]
    Upload {
        step: WorkflowStep,
        path: PathBuf,
        #[source]
        source: RepositoryError,
    },

    /// Article creation was rejected or failed
    #[error("failed to create article: {source}")]
    Create {
        #[source]
        source: RepositoryError,
    },

    /// Article was created but could not be published
    #[error("article {} was created but not published: {source}", .article.id)]
    Publish {
        article: Box<Article>,
        #[source]
        source: RepositoryError,
    },
}

impl PublishError {
    /// Workflow step that failed.
    pub fn step(&self) -> WorkflowStep {
        match self {
            PublishError::NotFound { entity, .. } | PublishError::Lookup { entity, .. } => {
                match entity {
                    EntityKind::Category => WorkflowStep::ResolveCategory,
                    _ => WorkflowStep::ResolveAuthor,
                }
            }
            PublishError::Upload { step, .. } => *step,
            PublishError::Create { .. } => WorkflowStep::CreateArticle,
            PublishError::Publish { .. } => WorkflowStep::PublishArticle,
        }
    }

    /// The already-created draft, when only the publish step failed.
    pub fn created_article(&self) -> Option<&Article> {
        match self {
            PublishError::Publish { article, .. } => Some(article.as_ref()),
            _ => None,
        }
    }
}

/// Result type alias for repository operations.
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Result type alias for workflow operations.
pub type Result<T> = std::result::Result<T, PublishError>;
