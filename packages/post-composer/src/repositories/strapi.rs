//! `ContentRepository` and `ArticleQuery` over the Strapi REST API.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::Deserialize;
use strapi_client::{Entry, ListResponse, PageParams, Relation, StrapiClient, StrapiError};
use tracing::debug;

use crate::error::{EntityKind, RepositoryError, RepositoryResult};
use crate::traits::query::{recent_limit, ArticleQuery};
use crate::traits::repository::ContentRepository;
use crate::types::article::{Article, ArticlePayload, Page, PageRequest, Pagination};
use crate::types::EntityId;

const AUTHORS: &str = "authors";
const CATEGORIES: &str = "categories";
const ARTICLES: &str = "articles";

/// Article attributes as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleAttributes {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    featured: Option<bool>,
    #[serde(default)]
    publish_date: Option<DateTime<Utc>>,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    category: Option<Relation<IgnoredAny>>,
}

fn to_article(entry: Entry<ArticleAttributes>) -> Article {
    let attrs = entry.attributes;
    Article {
        id: EntityId::Numeric(entry.id),
        slug: attrs.slug,
        title: attrs.title,
        description: attrs.description,
        featured: attrs.featured.unwrap_or(false),
        publish_date: attrs.publish_date,
        published_at: attrs.published_at,
        category: attrs
            .category
            .and_then(|relation| relation.data)
            .map(|category| EntityId::Numeric(category.id)),
    }
}

fn to_page(resp: ListResponse<Entry<ArticleAttributes>>, request: PageRequest) -> Page<Article> {
    let items: Vec<Article> = resp.data.into_iter().map(to_article).collect();
    let pagination = match resp.meta.pagination {
        Some(p) => Pagination {
            page: p.page,
            page_size: p.page_size,
            page_count: p.page_count,
            total: p.total,
        },
        None => Pagination::new(request, items.len() as u64),
    };
    Page { items, pagination }
}

fn backend(err: StrapiError) -> RepositoryError {
    RepositoryError::Backend(Box::new(err))
}

/// Map errors of the read routes: 404 is a missing entity, 400 a bad query.
fn query_error(err: StrapiError, entity: EntityKind, key: &str) -> RepositoryError {
    match &err {
        StrapiError::Api { status: 404, .. } => RepositoryError::not_found(entity, key),
        StrapiError::Api {
            status: 400,
            message,
        } => RepositoryError::InvalidQuery {
            reason: message.clone(),
        },
        _ => backend(err),
    }
}

fn page_params(page: PageRequest) -> PageParams {
    PageParams {
        page: page.page,
        page_size: page.page_size,
    }
}

/// Repository backed by a Strapi instance.
///
/// # Example
///
/// ```rust,ignore
/// use post_composer::{Publisher, StrapiRepository};
///
/// let repo = StrapiRepository::new(StrapiClient::from_env()?);
/// let article = Publisher::new(repo).publish(&input).await?;
/// ```
#[derive(Clone)]
pub struct StrapiRepository {
    client: StrapiClient,
}

impl StrapiRepository {
    pub fn new(client: StrapiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &StrapiClient {
        &self.client
    }

    async fn first_id(&self, collection: &str, field: &str, value: &str) -> RepositoryResult<Option<EntityId>> {
        let entries: Vec<Entry<IgnoredAny>> = self
            .client
            .find_entries(collection, field, value)
            .await
            .map_err(backend)?;

        debug!(collection, field, value, matches = entries.len(), "Lookup complete");
        Ok(entries.first().map(|entry| EntityId::Numeric(entry.id)))
    }
}

#[async_trait]
impl ContentRepository for StrapiRepository {
    async fn find_author_by_email(&self, email: &str) -> RepositoryResult<Option<EntityId>> {
        self.first_id(AUTHORS, "email", email).await
    }

    async fn find_category_by_slug(&self, slug: &str) -> RepositoryResult<Option<EntityId>> {
        self.first_id(CATEGORIES, "slug", slug).await
    }

    async fn upload_asset(&self, path: &Path) -> RepositoryResult<EntityId> {
        let media = self.client.upload_file(path).await.map_err(backend)?;
        debug!(path = %path.display(), id = media.id, name = %media.name, "Asset uploaded");
        Ok(EntityId::Numeric(media.id))
    }

    async fn create_article(&self, payload: &ArticlePayload) -> RepositoryResult<Article> {
        let entry: Entry<ArticleAttributes> = self
            .client
            .create_entry(ARTICLES, payload)
            .await
            .map_err(|err| match err {
                StrapiError::Api { status: 400, message } => {
                    RepositoryError::Validation { reason: message }
                }
                other => backend(other),
            })?;
        Ok(to_article(entry))
    }

    async fn publish_article(&self, id: &EntityId) -> RepositoryResult<()> {
        let numeric = id.as_u64().ok_or_else(|| RepositoryError::Validation {
            reason: format!("article id {} is not numeric", id),
        })?;

        self.client
            .publish_entry(ARTICLES, numeric)
            .await
            .map_err(|err| query_error(err, EntityKind::Article, &id.to_string()))
    }
}

#[async_trait]
impl ArticleQuery for StrapiRepository {
    async fn featured(&self, page: PageRequest) -> RepositoryResult<Page<Article>> {
        let resp = self
            .client
            .featured_articles(page_params(page))
            .await
            .map_err(backend)?;
        Ok(to_page(resp, page))
    }

    async fn recent(&self, limit: u32) -> RepositoryResult<Page<Article>> {
        let limit = recent_limit(limit);
        let resp = self.client.recent_articles(limit).await.map_err(backend)?;
        Ok(to_page(resp, PageRequest::first(limit)))
    }

    async fn by_category(&self, slug: &str, page: PageRequest) -> RepositoryResult<Page<Article>> {
        if slug.is_empty() {
            return Err(RepositoryError::InvalidQuery {
                reason: "Category slug is required".into(),
            });
        }

        let resp = self
            .client
            .articles_by_category(slug, page_params(page))
            .await
            .map_err(|err| query_error(err, EntityKind::Category, slug))?;
        Ok(to_page(resp, page))
    }

    async fn by_slug(&self, slug: &str) -> RepositoryResult<Article> {
        let entry = self
            .client
            .article_by_slug(slug)
            .await
            .map_err(|err| query_error(err, EntityKind::Article, slug))?;
        Ok(to_article(entry))
    }

    async fn related(&self, slug: &str, limit: u32) -> RepositoryResult<Page<Article>> {
        if slug.is_empty() {
            return Err(RepositoryError::InvalidQuery {
                reason: "Article slug is required".into(),
            });
        }

        let resp = self
            .client
            .related_articles(slug, limit)
            .await
            .map_err(|err| query_error(err, EntityKind::Article, slug))?;
        Ok(to_page(resp, PageRequest::first(limit)))
    }
}
