//! Testing utilities including a mock repository.
//!
//! Useful for testing code that drives the publishing workflow without a
//! running CMS.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{RepositoryError, RepositoryResult};
use crate::traits::repository::ContentRepository;
use crate::types::article::{Article, ArticlePayload};
use crate::types::EntityId;

/// Record of a call made to the mock repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    FindAuthor { email: String },
    FindCategory { slug: String },
    Upload { path: PathBuf },
    Create { title: String },
    Publish { id: EntityId },
}

/// A mock `ContentRepository` with canned lookups and injectable failures.
///
/// Clones share state, so a test can hand one clone to the workflow and
/// inspect calls through another.
///
/// Uploads return `asset:<path>` ids; created articles get `article-<n>` ids.
#[derive(Default, Clone)]
pub struct MockRepository {
    authors: Arc<RwLock<HashMap<String, EntityId>>>,
    categories: Arc<RwLock<HashMap<String, EntityId>>>,
    failing_uploads: Arc<RwLock<HashSet<PathBuf>>>,
    upload_delays: Arc<RwLock<HashMap<PathBuf, Duration>>>,
    fail_lookups: Arc<RwLock<Option<String>>>,
    fail_create: Arc<RwLock<Option<String>>>,
    fail_publish: Arc<RwLock<Option<String>>>,
    created: Arc<RwLock<Vec<ArticlePayload>>>,
    calls: Arc<RwLock<Vec<MockCall>>>,
    uploads_in_flight: Arc<AtomicUsize>,
    max_uploads_in_flight: Arc<AtomicUsize>,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `email` resolve to `id`.
    pub fn with_author(self, email: impl Into<String>, id: impl Into<EntityId>) -> Self {
        write(&self.authors).insert(email.into(), id.into());
        self
    }

    /// Make `slug` resolve to `id`.
    pub fn with_category(self, slug: impl Into<String>, id: impl Into<EntityId>) -> Self {
        write(&self.categories).insert(slug.into(), id.into());
        self
    }

    /// Fail every upload of `path`.
    pub fn fail_upload(self, path: impl Into<PathBuf>) -> Self {
        write(&self.failing_uploads).insert(path.into());
        self
    }

    /// Delay the upload of `path` before it completes.
    pub fn delay_upload(self, path: impl Into<PathBuf>, delay: Duration) -> Self {
        write(&self.upload_delays).insert(path.into(), delay);
        self
    }

    /// Fail author and category lookups with a backend error.
    pub fn fail_lookups(self, reason: impl Into<String>) -> Self {
        *write(&self.fail_lookups) = Some(reason.into());
        self
    }

    /// Reject article creation with a validation error.
    pub fn fail_create(self, reason: impl Into<String>) -> Self {
        *write(&self.fail_create) = Some(reason.into());
        self
    }

    /// Fail publishing with a backend error.
    pub fn fail_publish(self, reason: impl Into<String>) -> Self {
        *write(&self.fail_publish) = Some(reason.into());
        self
    }

    /// All calls in the order they were made.
    pub fn calls(&self) -> Vec<MockCall> {
        read(&self.calls).clone()
    }

    /// Paths passed to `upload_asset`, in call order.
    pub fn uploaded_paths(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::Upload { path } => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn upload_count(&self) -> usize {
        self.uploaded_paths().len()
    }

    pub fn create_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, MockCall::Create { .. }))
            .count()
    }

    pub fn publish_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, MockCall::Publish { .. }))
            .count()
    }

    /// Payloads accepted by `create_article`.
    pub fn created_payloads(&self) -> Vec<ArticlePayload> {
        read(&self.created).clone()
    }

    /// Highest number of uploads observed running at the same time.
    pub fn max_uploads_in_flight(&self) -> usize {
        self.max_uploads_in_flight.load(Ordering::SeqCst)
    }

    /// Id returned for an upload of `path`.
    pub fn asset_id(path: impl AsRef<Path>) -> EntityId {
        EntityId::Text(format!("asset:{}", path.as_ref().display()))
    }

    fn record(&self, call: MockCall) {
        write(&self.calls).push(call);
    }

    fn lookup_failure(&self) -> Option<RepositoryError> {
        read(&self.fail_lookups).clone().map(RepositoryError::backend)
    }
}

#[async_trait]
impl ContentRepository for MockRepository {
    async fn find_author_by_email(&self, email: &str) -> RepositoryResult<Option<EntityId>> {
        self.record(MockCall::FindAuthor {
            email: email.to_string(),
        });
        if let Some(err) = self.lookup_failure() {
            return Err(err);
        }
        Ok(read(&self.authors).get(email).cloned())
    }

    async fn find_category_by_slug(&self, slug: &str) -> RepositoryResult<Option<EntityId>> {
        self.record(MockCall::FindCategory {
            slug: slug.to_string(),
        });
        if let Some(err) = self.lookup_failure() {
            return Err(err);
        }
        Ok(read(&self.categories).get(slug).cloned())
    }

    async fn upload_asset(&self, path: &Path) -> RepositoryResult<EntityId> {
        self.record(MockCall::Upload {
            path: path.to_path_buf(),
        });

        let in_flight = self.uploads_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_uploads_in_flight
            .fetch_max(in_flight, Ordering::SeqCst);

        let delay = read(&self.upload_delays).get(path).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.uploads_in_flight.fetch_sub(1, Ordering::SeqCst);

        if read(&self.failing_uploads).contains(path) {
            return Err(RepositoryError::backend(format!(
                "upload rejected: {}",
                path.display()
            )));
        }

        Ok(Self::asset_id(path))
    }

    async fn create_article(&self, payload: &ArticlePayload) -> RepositoryResult<Article> {
        self.record(MockCall::Create {
            title: payload.title.clone(),
        });

        if let Some(reason) = read(&self.fail_create).clone() {
            return Err(RepositoryError::Validation { reason });
        }

        let mut created = write(&self.created);
        created.push(payload.clone());

        Ok(Article {
            id: EntityId::Text(format!("article-{}", created.len())),
            slug: Some(slug::slugify(&payload.title)),
            title: payload.title.clone(),
            description: Some(payload.description.clone()),
            featured: payload.featured,
            publish_date: Some(payload.publish_date),
            published_at: None,
            category: Some(payload.category.clone()),
        })
    }

    async fn publish_article(&self, id: &EntityId) -> RepositoryResult<()> {
        self.record(MockCall::Publish { id: id.clone() });

        match read(&self.fail_publish).clone() {
            Some(reason) => Err(RepositoryError::backend(reason)),
            None => Ok(()),
        }
    }
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
