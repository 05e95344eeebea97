use serde::{Deserialize, Serialize};

/// A single entry as returned by the REST API (`{ id, attributes }`).
#[derive(Debug, Clone, Deserialize)]
pub struct Entry<T> {
    pub id: u64,
    pub attributes: T,
}

/// Wrapper for collection responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Meta,
}

/// Wrapper for single-entry responses.
#[derive(Debug, Clone, Deserialize)]
pub struct SingleResponse<T> {
    pub data: T,
}

/// Wrapper for request bodies (`{ "data": ... }`).
#[derive(Debug, Clone, Serialize)]
pub struct DataRequest<'a, T> {
    pub data: &'a T,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    pub pagination: Option<Pagination>,
}

/// Pagination block of `meta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub total: u64,
}

/// A populated relation (`{ "data": { id, attributes } | null }`).
#[derive(Debug, Clone, Deserialize)]
pub struct Relation<T> {
    pub data: Option<Entry<T>>,
}

/// Media object returned by `POST /api/upload`.
///
/// The upload endpoint returns bare objects, not `{ id, attributes }` entries.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaFile {
    pub id: u64,
    pub name: String,
    pub url: Option<String>,
    pub mime: Option<String>,
    pub size: Option<f64>,
}

/// Page selection for paginated endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 25,
        }
    }
}

impl PageParams {
    pub fn to_query(self) -> Vec<(String, String)> {
        vec![
            ("pagination[page]".to_string(), self.page.to_string()),
            ("pagination[pageSize]".to_string(), self.page_size.to_string()),
        ]
    }
}

/// Error envelope of non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}
