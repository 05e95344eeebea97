//! Pure Strapi REST API client.
//!
//! A minimal client for a Strapi v4 instance. Supports filtered collection
//! lookups, entry creation and publishing, media uploads, and the custom
//! article listing routes (`featured`, `recent`, `category`, `slug`, `related`).
//!
//! # Example
//!
//! ```rust,ignore
//! use strapi_client::{Entry, StrapiClient};
//!
//! let client = StrapiClient::from_env()?;
//!
//! let authors: Vec<Entry<serde_json::Value>> = client
//!     .find_entries("authors", "email", "john@example.com")
//!     .await?;
//! let cover = client.upload_file("./images/cover.jpg".as_ref()).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{Result, StrapiError};
pub use types::{
    DataRequest, Entry, ListResponse, MediaFile, Meta, PageParams, Pagination, Relation,
    SingleResponse,
};

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use types::ErrorEnvelope;

const DEFAULT_BASE_URL: &str = "http://localhost:1337";

/// Strapi REST API client authenticated with an API token.
#[derive(Clone)]
pub struct StrapiClient {
    http_client: Client,
    base_url: String,
    token: String,
}

impl StrapiClient {
    /// Create a client for the given instance and API token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Create from `STRAPI_URL` (optional) and `STRAPI_API_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("STRAPI_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let token = std::env::var("STRAPI_API_TOKEN")
            .map_err(|_| StrapiError::Config("STRAPI_API_TOKEN not set".into()))?;
        Ok(Self::new(base_url, token))
    }

    /// Use a preconfigured HTTP client (timeouts, proxies).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build `{base_url}/api/{segments...}`, percent-encoding each segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| StrapiError::Config(format!("Invalid base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| StrapiError::Config(format!("Base URL cannot hold a path: {}", self.base_url)))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url, query: &[(String, String)]) -> Result<T> {
        debug!(url = %url, "GET");
        let resp = self
            .http_client
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;
        decode(resp).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, url: Url, body: &B) -> Result<T> {
        debug!(url = %url, "POST");
        let resp = self
            .http_client
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        decode(resp).await
    }

    /// Find entries of a collection whose `field` equals `value`.
    pub async fn find_entries<T: DeserializeOwned>(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Entry<T>>> {
        let url = self.endpoint(&[collection])?;
        let query = vec![(format!("filters[{}][$eq]", field), value.to_string())];
        let resp: ListResponse<Entry<T>> = self.get(url, &query).await?;
        Ok(resp.data)
    }

    /// Create an entry. The body is wrapped as `{ "data": ... }`.
    pub async fn create_entry<B: Serialize, T: DeserializeOwned>(
        &self,
        collection: &str,
        data: &B,
    ) -> Result<Entry<T>> {
        let url = self.endpoint(&[collection])?;
        let resp: SingleResponse<Entry<T>> = self.post(url, &DataRequest { data }).await?;
        Ok(resp.data)
    }

    /// Move a draft entry to the published state.
    pub async fn publish_entry(&self, collection: &str, id: u64) -> Result<()> {
        let url = self.endpoint(&[collection, &id.to_string(), "actions", "publish"])?;
        let _: serde_json::Value = self.post(url, &serde_json::json!({})).await?;
        Ok(())
    }

    /// Upload a local file to the media library.
    pub async fn upload_file(&self, path: &Path) -> Result<MediaFile> {
        let bytes = tokio::fs::read(path).await.map_err(|source| StrapiError::File {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = mime_guess::from_path(path).first_or_octet_stream();

        debug!(path = %path.display(), size = bytes.len(), mime = %mime, "Uploading file");

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime.as_ref())?;
        let form = Form::new().part("files", part);

        let url = self.endpoint(&["upload"])?;
        let resp = self
            .http_client
            .post(url)
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await?;

        let files: Vec<MediaFile> = decode(resp).await?;
        files
            .into_iter()
            .next()
            .ok_or_else(|| StrapiError::Parse("Upload returned no files".into()))
    }

    /// `GET /api/articles/featured`
    pub async fn featured_articles<T: DeserializeOwned>(
        &self,
        page: PageParams,
    ) -> Result<ListResponse<Entry<T>>> {
        let url = self.endpoint(&["articles", "featured"])?;
        self.get(url, &page.to_query()).await
    }

    /// `GET /api/articles/recent?limit=`
    pub async fn recent_articles<T: DeserializeOwned>(
        &self,
        limit: u32,
    ) -> Result<ListResponse<Entry<T>>> {
        let url = self.endpoint(&["articles", "recent"])?;
        self.get(url, &[("limit".to_string(), limit.to_string())])
            .await
    }

    /// `GET /api/articles/category/{slug}`
    pub async fn articles_by_category<T: DeserializeOwned>(
        &self,
        slug: &str,
        page: PageParams,
    ) -> Result<ListResponse<Entry<T>>> {
        let url = self.endpoint(&["articles", "category", slug])?;
        self.get(url, &page.to_query()).await
    }

    /// `GET /api/articles/slug/{slug}`
    pub async fn article_by_slug<T: DeserializeOwned>(&self, slug: &str) -> Result<Entry<T>> {
        let url = self.endpoint(&["articles", "slug", slug])?;
        let resp: SingleResponse<Entry<T>> = self.get(url, &[]).await?;
        Ok(resp.data)
    }

    /// `GET /api/articles/related?slug=&limit=`
    pub async fn related_articles<T: DeserializeOwned>(
        &self,
        slug: &str,
        limit: u32,
    ) -> Result<ListResponse<Entry<T>>> {
        let url = self.endpoint(&["articles", "related"])?;
        let query = vec![
            ("slug".to_string(), slug.to_string()),
            ("limit".to_string(), limit.to_string()),
        ];
        self.get(url, &query).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(api_error(status.as_u16(), &body));
    }

    serde_json::from_str(&body)
        .map_err(|e| StrapiError::Parse(format!("Failed to deserialize response: {}", e)))
}

/// Prefer the message from Strapi's error envelope, fall back to the raw body.
fn api_error(status: u16, body: &str) -> StrapiError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());
    StrapiError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let client = StrapiClient::new("http://localhost:1337", "token");
        let url = client.endpoint(&["articles", "12", "actions", "publish"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:1337/api/articles/12/actions/publish"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes_slug() {
        let client = StrapiClient::new("https://cms.example.com/backend/", "token");
        let url = client.endpoint(&["articles", "slug", "a b/c"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://cms.example.com/backend/api/articles/slug/a%20b%2Fc"
        );
    }

    #[test]
    fn test_endpoint_rejects_invalid_base() {
        let client = StrapiClient::new("not a url", "token");
        assert!(matches!(
            client.endpoint(&["articles"]),
            Err(StrapiError::Config(_))
        ));
    }

    #[test]
    fn test_api_error_uses_envelope_message() {
        let body = r#"{"data":null,"error":{"status":404,"name":"NotFoundError","message":"Article not found","details":{}}}"#;
        let err = api_error(404, body);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "API error (404): Article not found");
    }

    #[test]
    fn test_api_error_falls_back_to_body() {
        let err = api_error(502, "Bad Gateway");
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.to_string(), "API error (502): Bad Gateway");
    }

    #[test]
    fn test_page_params_query() {
        let query = PageParams { page: 2, page_size: 10 }.to_query();
        assert_eq!(
            query,
            vec![
                ("pagination[page]".to_string(), "2".to_string()),
                ("pagination[pageSize]".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_decode_list_response_with_pagination() {
        let body = r#"{
            "data": [{"id": 3, "attributes": {"title": "Hello"}}],
            "meta": {"pagination": {"page": 1, "pageSize": 25, "pageCount": 1, "total": 1}}
        }"#;
        let resp: ListResponse<Entry<serde_json::Value>> = serde_json::from_str(body).unwrap();
        assert_eq!(resp.data[0].id, 3);
        assert_eq!(resp.data[0].attributes["title"], "Hello");
        assert_eq!(resp.meta.pagination.unwrap().total, 1);
    }

    #[test]
    fn test_decode_upload_response() {
        let body = r#"[{"id": 7, "name": "cover.jpg", "url": "/uploads/cover_1a2b.jpg", "mime": "image/jpeg", "size": 12.5}]"#;
        let files: Vec<MediaFile> = serde_json::from_str(body).unwrap();
        assert_eq!(files[0].id, 7);
        assert_eq!(files[0].mime.as_deref(), Some("image/jpeg"));
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_file_error() {
        let client = StrapiClient::new("http://localhost:1337", "token");
        let err = client
            .upload_file(Path::new("/definitely/not/here.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, StrapiError::File { .. }));
    }
}
