//! In-memory repository for testing and dry runs.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::clock::{Clock, SystemClock};
use crate::error::{EntityKind, RepositoryError, RepositoryResult};
use crate::traits::query::{recent_limit, ArticleQuery};
use crate::traits::repository::ContentRepository;
use crate::types::article::{Article, ArticlePayload, Page, PageRequest};
use crate::types::block::ContentBlock;
use crate::types::EntityId;

/// Category known to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    pub id: EntityId,
    pub slug: String,
    pub name: String,
}

/// An article together with the payload it was created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArticle {
    pub article: Article,
    pub payload: ArticlePayload,
}

#[derive(Default)]
struct State {
    next_id: u64,
    authors: Vec<(EntityId, String)>,
    categories: Vec<CategoryRecord>,
    assets: Vec<(EntityId, PathBuf)>,
    articles: Vec<StoredArticle>,
}

impl State {
    fn issue_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId::Numeric(self.next_id)
    }

    fn unique_slug(&self, title: &str) -> String {
        let base = match slug::slugify(title) {
            s if s.is_empty() => "article".to_string(),
            s => s,
        };

        let taken = |candidate: &str| {
            self.articles
                .iter()
                .any(|a| a.article.slug.as_deref() == Some(candidate))
        };

        if !taken(&base) {
            return base;
        }
        (2..)
            .map(|n| format!("{}-{}", base, n))
            .find(|candidate| !taken(candidate))
            .unwrap_or(base)
    }

    /// Published articles, newest `publishDate` first.
    fn published(&self) -> Vec<Article> {
        let mut articles: Vec<Article> = self
            .articles
            .iter()
            .map(|stored| stored.article.clone())
            .filter(Article::is_published)
            .collect();
        articles.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
        articles
    }

    fn validate(&self, payload: &ArticlePayload) -> RepositoryResult<()> {
        let invalid = |reason: String| Err(RepositoryError::Validation { reason });

        if payload.title.trim().is_empty() {
            return invalid("title is required".into());
        }
        if !self.authors.iter().any(|(id, _)| *id == payload.author) {
            return invalid(format!("unknown author {}", payload.author));
        }
        if !self.categories.iter().any(|c| c.id == payload.category) {
            return invalid(format!("unknown category {}", payload.category));
        }

        let media = payload.blocks.iter().filter_map(|block| match block {
            ContentBlock::Media { file } => Some(file),
            _ => None,
        });
        for asset in payload.cover.iter().chain(media) {
            if !self.assets.iter().any(|(id, _)| id == asset) {
                return invalid(format!("unknown asset {}", asset));
            }
        }

        Ok(())
    }
}

/// In-memory content repository.
///
/// Issues sequential numeric ids shared by all entity kinds, derives unique
/// slugs from titles, and answers the listing queries the way the CMS routes
/// do. Data is lost when the value is dropped.
pub struct MemoryRepository<C = SystemClock> {
    state: RwLock<State>,
    clock: C,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
            clock: SystemClock,
        }
    }
}

impl<C: Clock> MemoryRepository<C> {
    /// Use `clock` for `publishedAt` timestamps.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> MemoryRepository<C2> {
        MemoryRepository {
            state: self.state,
            clock,
        }
    }

    pub fn add_author(&self, email: impl Into<String>) -> EntityId {
        let mut state = self.write();
        let id = state.issue_id();
        state.authors.push((id.clone(), email.into()));
        id
    }

    pub fn add_category(&self, slug: impl Into<String>, name: impl Into<String>) -> EntityId {
        let mut state = self.write();
        let id = state.issue_id();
        state.categories.push(CategoryRecord {
            id: id.clone(),
            slug: slug.into(),
            name: name.into(),
        });
        id
    }

    /// Builder form of [`add_author`](Self::add_author).
    pub fn with_author(self, email: impl Into<String>) -> Self {
        self.add_author(email);
        self
    }

    /// Builder form of [`add_category`](Self::add_category).
    pub fn with_category(self, slug: impl Into<String>, name: impl Into<String>) -> Self {
        self.add_category(slug, name);
        self
    }

    /// All stored articles, drafts included, in creation order.
    pub fn articles(&self) -> Vec<StoredArticle> {
        self.read().articles.clone()
    }

    pub fn article_count(&self) -> usize {
        self.read().articles.len()
    }

    pub fn asset_count(&self) -> usize {
        self.read().assets.len()
    }

    /// Path an asset was uploaded from.
    pub fn asset_path(&self, id: &EntityId) -> Option<PathBuf> {
        self.read()
            .assets
            .iter()
            .find(|(asset, _)| asset == id)
            .map(|(_, path)| path.clone())
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn published_by_slug(&self, slug: &str) -> RepositoryResult<Article> {
        self.read()
            .published()
            .into_iter()
            .find(|a| a.slug.as_deref() == Some(slug))
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Article, slug))
    }
}

#[async_trait]
impl<C: Clock> ContentRepository for MemoryRepository<C> {
    async fn find_author_by_email(&self, email: &str) -> RepositoryResult<Option<EntityId>> {
        Ok(self
            .read()
            .authors
            .iter()
            .find(|(_, e)| e == email)
            .map(|(id, _)| id.clone()))
    }

    async fn find_category_by_slug(&self, slug: &str) -> RepositoryResult<Option<EntityId>> {
        Ok(self
            .read()
            .categories
            .iter()
            .find(|c| c.slug == slug)
            .map(|c| c.id.clone()))
    }

    async fn upload_asset(&self, path: &Path) -> RepositoryResult<EntityId> {
        let mut state = self.write();
        let id = state.issue_id();
        state.assets.push((id.clone(), path.to_path_buf()));
        Ok(id)
    }

    async fn create_article(&self, payload: &ArticlePayload) -> RepositoryResult<Article> {
        let mut state = self.write();
        state.validate(payload)?;

        let id = state.issue_id();
        let article = Article {
            id,
            slug: Some(state.unique_slug(&payload.title)),
            title: payload.title.clone(),
            description: Some(payload.description.clone()),
            featured: payload.featured,
            publish_date: Some(payload.publish_date),
            published_at: None,
            category: Some(payload.category.clone()),
        };

        state.articles.push(StoredArticle {
            article: article.clone(),
            payload: payload.clone(),
        });
        Ok(article)
    }

    async fn publish_article(&self, id: &EntityId) -> RepositoryResult<()> {
        let now = self.clock.now();
        let mut state = self.write();
        let stored = state
            .articles
            .iter_mut()
            .find(|stored| stored.article.id == *id)
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Article, id.to_string()))?;

        stored.article.published_at = Some(now);
        Ok(())
    }
}

#[async_trait]
impl<C: Clock> ArticleQuery for MemoryRepository<C> {
    async fn featured(&self, page: PageRequest) -> RepositoryResult<Page<Article>> {
        let articles = self
            .read()
            .published()
            .into_iter()
            .filter(|a| a.featured)
            .collect();
        Ok(page.slice(articles))
    }

    async fn recent(&self, limit: u32) -> RepositoryResult<Page<Article>> {
        Ok(PageRequest::first(recent_limit(limit)).slice(self.read().published()))
    }

    async fn by_category(&self, slug: &str, page: PageRequest) -> RepositoryResult<Page<Article>> {
        if slug.is_empty() {
            return Err(RepositoryError::InvalidQuery {
                reason: "Category slug is required".into(),
            });
        }

        let state = self.read();
        let category = state
            .categories
            .iter()
            .find(|c| c.slug == slug)
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Category, slug))?;

        let articles = state
            .published()
            .into_iter()
            .filter(|a| a.category.as_ref() == Some(&category.id))
            .collect();
        Ok(page.slice(articles))
    }

    async fn by_slug(&self, slug: &str) -> RepositoryResult<Article> {
        self.published_by_slug(slug)
    }

    async fn related(&self, slug: &str, limit: u32) -> RepositoryResult<Page<Article>> {
        if slug.is_empty() {
            return Err(RepositoryError::InvalidQuery {
                reason: "Article slug is required".into(),
            });
        }

        let current = self.published_by_slug(slug)?;
        let articles = self
            .read()
            .published()
            .into_iter()
            .filter(|a| a.id != current.id)
            .filter(|a| match &current.category {
                Some(category) => a.category.as_ref() == Some(category),
                None => true,
            })
            .collect();
        Ok(PageRequest::first(limit).slice(articles))
    }
}
