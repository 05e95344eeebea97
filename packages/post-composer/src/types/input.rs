//! Structured input describing a blog post to assemble.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use super::article::Seo;

/// Reading time in minutes when the input gives none.
pub const DEFAULT_READING_TIME: u32 = 5;

/// Robots directive when the input gives none.
pub const DEFAULT_META_ROBOTS: &str = "index, follow";

/// A blog post as supplied by the caller, before any lookups or uploads.
///
/// Field names follow the camelCase JSON form (`authorEmail`, `categorySlug`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    pub title: String,
    pub description: String,
    pub author_email: String,
    pub category_slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_path: Option<PathBuf>,

    /// Paired by index with `content_sections`.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub content_image_paths: Vec<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub content_sections: Vec<ContentSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,

    /// RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
    #[serde(
        default,
        deserialize_with = "flexible_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub publish_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoOverrides>,

    /// Publish right after creation instead of leaving a draft.
    #[serde(default, deserialize_with = "null_as_default")]
    pub publish: bool,
}

impl PostInput {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        author_email: impl Into<String>,
        category_slug: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            author_email: author_email.into(),
            category_slug: category_slug.into(),
            ..Default::default()
        }
    }

    /// Reading time, falling back to the default when unset or zero.
    pub fn reading_time_or_default(&self) -> u32 {
        self.reading_time
            .filter(|&minutes| minutes > 0)
            .unwrap_or(DEFAULT_READING_TIME)
    }

    pub fn featured_or_default(&self) -> bool {
        self.featured.unwrap_or(false)
    }

    /// Number of uploads the workflow will issue.
    pub fn upload_count(&self) -> usize {
        usize::from(self.cover_image_path.is_some()) + self.content_image_paths.len()
    }
}

/// One section of the post body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,

    /// HTML, emitted verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<Quote>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Caller-supplied SEO fields. Anything missing is derived from the post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_robots: Option<String>,

    #[serde(
        rename = "canonicalURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub canonical_url: Option<String>,
}

impl SeoOverrides {
    /// Resolve the final SEO payload for a post.
    ///
    /// Empty override strings count as unset.
    pub fn resolve(overrides: Option<&SeoOverrides>, input: &PostInput) -> Seo {
        let field = |pick: fn(&SeoOverrides) -> &Option<String>| {
            overrides.and_then(|o| present(pick(o))).map(str::to_string)
        };

        Seo {
            meta_title: field(|o| &o.meta_title).unwrap_or_else(|| input.title.clone()),
            meta_description: field(|o| &o.meta_description)
                .unwrap_or_else(|| input.description.clone()),
            keywords: field(|o| &o.keywords).unwrap_or_else(|| input.tags.join(", ")),
            meta_robots: field(|o| &o.meta_robots)
                .unwrap_or_else(|| DEFAULT_META_ROBOTS.to_string()),
            canonical_url: field(|o| &o.canonical_url),
        }
    }
}

/// Deserialize an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn flexible_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(None),
    };

    if let Ok(timestamp) = raw.parse::<DateTime<Utc>>() {
        return Ok(Some(timestamp));
    }

    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Some(midnight.and_utc()))
        .ok_or_else(|| {
            <D::Error as de::Error>::custom(format!(
                "invalid publishDate {:?}: expected RFC 3339 or YYYY-MM-DD",
                raw
            ))
        })
}

/// Non-empty contents of an optional string.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> PostInput {
        PostInput::new("Title", "Description", "john@example.com", "technology")
    }

    #[test]
    fn test_deserialize_camel_case_input() {
        let json = r#"{
            "title": "Getting Started",
            "description": "Learn things",
            "authorEmail": "john@example.com",
            "categorySlug": "technology",
            "coverImagePath": "./images/cover.jpg",
            "contentImagePaths": ["./images/image1.jpg"],
            "contentSections": [
                {"heading": "Intro", "quote": {"text": "Q"}}
            ],
            "readingTime": 8,
            "tags": ["strapi", "api"],
            "seo": {"canonicalURL": "https://example.com/blog/getting-started"},
            "publish": true
        }"#;

        let input: PostInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.author_email, "john@example.com");
        assert_eq!(input.cover_image_path, Some(PathBuf::from("./images/cover.jpg")));
        assert_eq!(input.content_sections[0].quote.as_ref().unwrap().author, None);
        assert_eq!(input.reading_time_or_default(), 8);
        assert_eq!(
            input.seo.unwrap().canonical_url.as_deref(),
            Some("https://example.com/blog/getting-started")
        );
        assert!(input.publish);
        assert_eq!(input.featured, None);
    }

    #[test]
    fn test_null_fields_count_as_missing() {
        let json = r#"{
            "title": "T",
            "description": "D",
            "authorEmail": "john@example.com",
            "categorySlug": "technology",
            "coverImagePath": null,
            "contentImagePaths": null,
            "contentSections": null,
            "tags": null,
            "publish": null,
            "publishDate": null,
            "seo": null
        }"#;

        let input: PostInput = serde_json::from_str(json).unwrap();
        assert!(input.content_image_paths.is_empty());
        assert!(input.content_sections.is_empty());
        assert!(input.tags.is_empty());
        assert!(!input.publish);
        assert_eq!(input.publish_date, None);
        assert_eq!(input.cover_image_path, None);
    }

    #[test]
    fn test_publish_date_accepts_date_only() {
        let parse = |date: &str| {
            let json = format!(
                r#"{{"title": "T", "description": "D", "authorEmail": "a@b.c", "categorySlug": "c", "publishDate": "{}"}}"#,
                date
            );
            serde_json::from_str::<PostInput>(&json)
        };

        let midnight = DateTime::parse_from_rfc3339("2025-01-15T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parse("2025-01-15").unwrap().publish_date, Some(midnight));

        let exact = parse("2025-01-15T10:30:00.000+02:00").unwrap();
        assert_eq!(
            exact.publish_date,
            Some(DateTime::parse_from_rfc3339("2025-01-15T08:30:00Z").unwrap().with_timezone(&Utc))
        );

        let err = parse("next tuesday").unwrap_err();
        assert!(err.to_string().contains("invalid publishDate"));
    }

    #[test]
    fn test_quote_without_text_is_kept() {
        let section: ContentSection =
            serde_json::from_str(r#"{"quote": {"author": "X"}}"#).unwrap();
        let quote = section.quote.unwrap();
        assert_eq!(quote.text, "");
        assert_eq!(quote.author.as_deref(), Some("X"));
    }

    #[test]
    fn test_reading_time_zero_falls_back() {
        let mut input = input();
        assert_eq!(input.reading_time_or_default(), 5);
        input.reading_time = Some(0);
        assert_eq!(input.reading_time_or_default(), 5);
    }

    #[test]
    fn test_seo_defaults_from_post() {
        let mut input = input();
        input.tags = vec!["rust".into(), "cms".into()];

        let seo = SeoOverrides::resolve(None, &input);
        assert_eq!(seo.meta_title, "Title");
        assert_eq!(seo.meta_description, "Description");
        assert_eq!(seo.keywords, "rust, cms");
        assert_eq!(seo.meta_robots, "index, follow");
        assert_eq!(seo.canonical_url, None);
    }

    #[test]
    fn test_seo_overrides_win_and_empty_counts_as_unset() {
        let overrides = SeoOverrides {
            meta_title: Some("Custom | Site".into()),
            meta_description: Some(String::new()),
            keywords: Some("a, b".into()),
            meta_robots: Some("noindex".into()),
            canonical_url: Some("https://example.com/x".into()),
        };

        let seo = SeoOverrides::resolve(Some(&overrides), &input());
        assert_eq!(seo.meta_title, "Custom | Site");
        assert_eq!(seo.meta_description, "Description");
        assert_eq!(seo.keywords, "a, b");
        assert_eq!(seo.meta_robots, "noindex");
        assert_eq!(seo.canonical_url.as_deref(), Some("https://example.com/x"));
    }

    #[test]
    fn test_upload_count() {
        let mut input = input();
        assert_eq!(input.upload_count(), 0);
        input.cover_image_path = Some("cover.jpg".into());
        input.content_image_paths = vec!["a.jpg".into(), "b.jpg".into()];
        assert_eq!(input.upload_count(), 3);
    }
}
