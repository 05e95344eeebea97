//! Publishing Workflow.
//!
//! Runs a `PostInput` against a `ContentRepository`:
//!
//! ```text
//! ResolveAuthor → ResolveCategory → UploadCover? → UploadContentImages?
//!     → Compose → CreateArticle → PublishArticle? → Done
//! ```
//!
//! Steps run strictly in sequence and the first failure is terminal. There
//! is no rollback: assets uploaded before a failure stay in the media store.
//! Nothing is created unless every lookup and upload succeeded.
//!
//! # Example
//!
//! ```rust,ignore
//! use post_composer::{Publisher, PostInput};
//!
//! let publisher = Publisher::new(repo).with_upload_concurrency(4);
//! match publisher.publish(&input).await {
//!     Ok(article) => println!("created {}", article.id),
//!     Err(e) if e.created_article().is_some() => println!("draft kept: {}", e),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

mod uploads;

use std::fmt;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::composer::compose;
use crate::error::{EntityKind, PublishError, Result};
use crate::traits::repository::ContentRepository;
use crate::types::article::{Article, ResolvedRefs};
use crate::types::input::PostInput;
use crate::types::EntityId;

/// States of the workflow, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowStep {
    ResolveAuthor,
    ResolveCategory,
    UploadCover,
    UploadContentImages,
    Compose,
    CreateArticle,
    PublishArticle,
    Done,
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowStep::ResolveAuthor => "resolve_author",
            WorkflowStep::ResolveCategory => "resolve_category",
            WorkflowStep::UploadCover => "upload_cover",
            WorkflowStep::UploadContentImages => "upload_content_images",
            WorkflowStep::Compose => "compose",
            WorkflowStep::CreateArticle => "create_article",
            WorkflowStep::PublishArticle => "publish_article",
            WorkflowStep::Done => "done",
        };
        f.write_str(name)
    }
}

/// Workflow settings.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Maximum content image uploads in flight. 1 uploads strictly one by one.
    pub upload_concurrency: usize,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            upload_concurrency: 1,
        }
    }
}

/// Runs the publishing workflow against an injected repository and clock.
pub struct Publisher<R, C = SystemClock> {
    repo: R,
    clock: C,
    config: PublisherConfig,
}

impl<R: ContentRepository> Publisher<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            clock: SystemClock,
            config: PublisherConfig::default(),
        }
    }
}

impl<R: ContentRepository, C: Clock> Publisher<R, C> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Publisher<R, C2> {
        Publisher {
            repo: self.repo,
            clock,
            config: self.config,
        }
    }

    pub fn with_config(mut self, config: PublisherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_upload_concurrency(mut self, concurrency: usize) -> Self {
        self.config.upload_concurrency = concurrency.max(1);
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    /// Create the article described by `input`, publishing it if requested.
    ///
    /// On a publish failure the draft is returned inside
    /// [`PublishError::Publish`] so the caller can retry without recreating it.
    pub async fn publish(&self, input: &PostInput) -> Result<Article> {
        info!(
            title = %input.title,
            uploads = input.upload_count(),
            publish = input.publish,
            "Publishing post"
        );

        let refs = self.resolve(input).await?;

        debug!(step = %WorkflowStep::Compose, "Composing article");
        let payload = compose(input, &refs, &self.clock);
        debug!(blocks = payload.blocks.len(), "Article payload composed");

        debug!(step = %WorkflowStep::CreateArticle, "Creating article");
        let mut article = self
            .repo
            .create_article(&payload)
            .await
            .map_err(|source| PublishError::Create { source })?;
        info!(id = %article.id, slug = ?article.slug, "Article created as draft");

        if !input.publish {
            debug!(step = %WorkflowStep::Done, "Leaving article as draft");
            return Ok(article);
        }

        debug!(step = %WorkflowStep::PublishArticle, id = %article.id, "Publishing article");
        if let Err(source) = self.repo.publish_article(&article.id).await {
            warn!(id = %article.id, error = %source, "Article created but publish failed");
            return Err(PublishError::Publish {
                article: Box::new(article),
                source,
            });
        }

        if article.published_at.is_none() {
            article.published_at = Some(self.clock.now());
        }
        info!(id = %article.id, step = %WorkflowStep::Done, "Article published");

        Ok(article)
    }

    /// Run the lookup and upload steps, producing the ids to compose with.
    pub async fn resolve(&self, input: &PostInput) -> Result<ResolvedRefs> {
        let author = self.resolve_author(&input.author_email).await?;
        let category = self.resolve_category(&input.category_slug).await?;

        let cover = match &input.cover_image_path {
            Some(path) => Some(self.upload_cover(path).await?),
            None => None,
        };

        let content_images = self.upload_content_images(input).await?;

        Ok(ResolvedRefs {
            author,
            category,
            cover,
            content_images,
        })
    }

    async fn resolve_author(&self, email: &str) -> Result<EntityId> {
        debug!(step = %WorkflowStep::ResolveAuthor, email, "Looking up author");
        let found = self
            .repo
            .find_author_by_email(email)
            .await
            .map_err(|source| PublishError::Lookup {
                entity: EntityKind::Author,
                source,
            })?;

        found.ok_or_else(|| PublishError::NotFound {
            entity: EntityKind::Author,
            key: email.to_string(),
        })
    }

    async fn resolve_category(&self, slug: &str) -> Result<EntityId> {
        debug!(step = %WorkflowStep::ResolveCategory, slug, "Looking up category");
        let found = self
            .repo
            .find_category_by_slug(slug)
            .await
            .map_err(|source| PublishError::Lookup {
                entity: EntityKind::Category,
                source,
            })?;

        found.ok_or_else(|| PublishError::NotFound {
            entity: EntityKind::Category,
            key: slug.to_string(),
        })
    }

    async fn upload_cover(&self, path: &Path) -> Result<EntityId> {
        debug!(step = %WorkflowStep::UploadCover, path = %path.display(), "Uploading cover image");
        self.repo
            .upload_asset(path)
            .await
            .map_err(|source| PublishError::Upload {
                step: WorkflowStep::UploadCover,
                path: path.to_path_buf(),
                source,
            })
    }

    async fn upload_content_images(&self, input: &PostInput) -> Result<Vec<EntityId>> {
        let paths = &input.content_image_paths;
        if paths.is_empty() {
            return Ok(Vec::new());
        }

        if paths.len() > input.content_sections.len() {
            warn!(
                images = paths.len(),
                sections = input.content_sections.len(),
                "More content images than sections; extra images will not be placed"
            );
        }

        debug!(
            step = %WorkflowStep::UploadContentImages,
            count = paths.len(),
            concurrency = self.config.upload_concurrency,
            "Uploading content images"
        );
        uploads::upload_in_order(&self.repo, paths, self.config.upload_concurrency).await
    }
}

/// Publish a post with the system clock and default settings.
pub async fn publish_post<R: ContentRepository>(input: &PostInput, repo: R) -> Result<Article> {
    Publisher::new(repo).publish(input).await
}
