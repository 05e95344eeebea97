//! Integration tests for the publishing workflow.
//!
//! These tests verify:
//! 1. Lookups short-circuit before any write
//! 2. Upload failures abort without creating an article
//! 3. Content image ids keep input order under concurrent uploads
//! 4. Publish failures are reported apart from create failures
//! 5. Published articles are visible through the listing queries

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use post_composer::testing::{MockCall, MockRepository};
use post_composer::{
    publish_post, ArticleQuery, ContentBlock, ContentSection, EntityId, EntityKind, FixedClock,
    MemoryRepository, PageRequest, PostInput, PublishError, Publisher, Quote, WorkflowStep,
};

const AUTHOR: &str = "john@example.com";
const CATEGORY: &str = "technology";

fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Helper to create a repository that knows the default author and category.
fn seeded_mock() -> MockRepository {
    MockRepository::new()
        .with_author(AUTHOR, 1u64)
        .with_category(CATEGORY, 2u64)
}

/// Helper to create a post with a cover, two sections and two images.
fn full_input() -> PostInput {
    let mut input = PostInput::new(
        "Getting Started with the API",
        "Create posts programmatically",
        AUTHOR,
        CATEGORY,
    );
    input.cover_image_path = Some("./images/cover.jpg".into());
    input.content_image_paths = vec!["./images/one.jpg".into(), "./images/two.jpg".into()];
    input.introduction = Some("Intro".into());
    input.content_sections = vec![
        ContentSection {
            heading: Some("Structure".into()),
            content: Some("<p>REST</p>".into()),
            quote: None,
        },
        ContentSection {
            heading: Some("Blocks".into()),
            content: None,
            quote: Some(Quote {
                text: "Blocks are flexible".into(),
                author: Some("Team".into()),
            }),
        },
    ];
    input.conclusion = Some("Done".into());
    input.tags = vec!["api".into(), "tutorial".into()];
    input.publish = true;
    input
}

#[tokio::test]
async fn test_full_workflow_calls_in_order() {
    let repo = seeded_mock();
    let publisher = Publisher::new(repo.clone()).with_clock(FixedClock::new(fixed_now()));

    let article = publisher.publish(&full_input()).await.unwrap();

    assert_eq!(
        repo.calls(),
        vec![
            MockCall::FindAuthor { email: AUTHOR.into() },
            MockCall::FindCategory { slug: CATEGORY.into() },
            MockCall::Upload { path: "./images/cover.jpg".into() },
            MockCall::Upload { path: "./images/one.jpg".into() },
            MockCall::Upload { path: "./images/two.jpg".into() },
            MockCall::Create { title: "Getting Started with the API".into() },
            MockCall::Publish { id: article.id.clone() },
        ]
    );
    assert_eq!(article.published_at, Some(fixed_now()));
    assert_eq!(article.slug.as_deref(), Some("getting-started-with-the-api"));

    let payloads = repo.created_payloads();
    let payload = &payloads[0];
    assert_eq!(payload.author, EntityId::from(1u64));
    assert_eq!(payload.category, EntityId::from(2u64));
    assert_eq!(payload.cover, Some(MockRepository::asset_id("./images/cover.jpg")));
    assert_eq!(payload.publish_date, fixed_now());
    assert_eq!(payload.seo.keywords, "api, tutorial");
    assert_eq!(
        payload.blocks,
        vec![
            ContentBlock::rich_text("<p>Intro</p>"),
            ContentBlock::media(MockRepository::asset_id("./images/cover.jpg")),
            ContentBlock::rich_text("<h2>Structure</h2>"),
            ContentBlock::rich_text("<p>REST</p>"),
            ContentBlock::media(MockRepository::asset_id("./images/one.jpg")),
            ContentBlock::rich_text("<h2>Blocks</h2>"),
            ContentBlock::media(MockRepository::asset_id("./images/two.jpg")),
            ContentBlock::quote("Blocks are flexible", "Team"),
            ContentBlock::rich_text("<h2>Conclusion</h2><p>Done</p>"),
        ]
    );
}

#[tokio::test]
async fn test_missing_author_short_circuits() {
    let repo = MockRepository::new().with_category(CATEGORY, 2u64);

    let err = Publisher::new(repo.clone())
        .publish(&full_input())
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        PublishError::NotFound { entity: EntityKind::Author, key } if key == AUTHOR
    ));
    assert_eq!(err.step(), WorkflowStep::ResolveAuthor);
    assert_eq!(repo.calls(), vec![MockCall::FindAuthor { email: AUTHOR.into() }]);
    assert_eq!(repo.upload_count(), 0);
    assert_eq!(repo.create_count(), 0);
}

#[tokio::test]
async fn test_missing_category_short_circuits() {
    let repo = MockRepository::new().with_author(AUTHOR, 1u64);

    let err = Publisher::new(repo.clone())
        .publish(&full_input())
        .await
        .unwrap_err();

    assert_eq!(err.step(), WorkflowStep::ResolveCategory);
    assert_eq!(err.to_string(), "category not found: technology");
    assert_eq!(repo.upload_count(), 0);
    assert_eq!(repo.create_count(), 0);
}

#[tokio::test]
async fn test_lookup_backend_failure_is_distinct_from_not_found() {
    let repo = seeded_mock().fail_lookups("connection refused");

    let err = Publisher::new(repo.clone())
        .publish(&full_input())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PublishError::Lookup { entity: EntityKind::Author, .. }
    ));
    assert_eq!(repo.create_count(), 0);
}

#[tokio::test]
async fn test_cover_upload_failure_aborts_before_create() {
    let repo = seeded_mock().fail_upload("./images/cover.jpg");

    let err = Publisher::new(repo.clone())
        .publish(&full_input())
        .await
        .unwrap_err();

    match &err {
        PublishError::Upload { step, path, .. } => {
            assert_eq!(*step, WorkflowStep::UploadCover);
            assert_eq!(path, &PathBuf::from("./images/cover.jpg"));
        }
        other => panic!("expected upload error, got {:?}", other),
    }
    assert_eq!(repo.upload_count(), 1);
    assert_eq!(repo.create_count(), 0);
}

#[tokio::test]
async fn test_content_image_failure_aborts_before_create() {
    let repo = seeded_mock().fail_upload("./images/two.jpg");

    let err = Publisher::new(repo.clone())
        .publish(&full_input())
        .await
        .unwrap_err();

    assert_eq!(err.step(), WorkflowStep::UploadContentImages);
    assert!(err.created_article().is_none());
    assert_eq!(repo.create_count(), 0);
    assert_eq!(repo.publish_count(), 0);
}

#[tokio::test]
async fn test_no_upload_calls_without_image_paths() {
    let repo = seeded_mock();
    let input = PostInput::new("Plain", "No images", AUTHOR, CATEGORY);

    let article = Publisher::new(repo.clone()).publish(&input).await.unwrap();

    assert_eq!(repo.upload_count(), 0);
    assert_eq!(repo.publish_count(), 0);
    assert!(!article.is_published());
    assert!(repo.created_payloads()[0].blocks.is_empty());
}

#[tokio::test]
async fn test_concurrent_uploads_keep_input_order() {
    let paths: Vec<PathBuf> = (0..6).map(|i| PathBuf::from(format!("img-{}.jpg", i))).collect();

    // Earlier paths take longer, so completions arrive in reverse order.
    let repo = paths.iter().enumerate().fold(seeded_mock(), |repo, (i, path)| {
        repo.delay_upload(path.clone(), Duration::from_millis(10 * (6 - i as u64)))
    });

    let mut input = PostInput::new("Gallery", "Many images", AUTHOR, CATEGORY);
    input.content_image_paths = paths.clone();
    input.content_sections = vec![ContentSection::default(); paths.len()];

    let publisher = Publisher::new(repo.clone()).with_upload_concurrency(4);
    let refs = publisher.resolve(&input).await.unwrap();

    let expected: Vec<_> = paths.iter().map(MockRepository::asset_id).collect();
    assert_eq!(refs.content_images, expected);
    assert!(repo.max_uploads_in_flight() > 1);
    assert!(repo.max_uploads_in_flight() <= 4);
}

#[tokio::test]
async fn test_default_uploads_are_sequential() {
    let repo = seeded_mock()
        .delay_upload("./images/one.jpg", Duration::from_millis(20))
        .delay_upload("./images/two.jpg", Duration::from_millis(5));

    Publisher::new(repo.clone())
        .publish(&full_input())
        .await
        .unwrap();

    assert_eq!(repo.max_uploads_in_flight(), 1);
}

#[tokio::test]
async fn test_publish_failure_keeps_created_article() {
    let repo = seeded_mock().fail_publish("publish action forbidden");

    let err = Publisher::new(repo.clone())
        .publish(&full_input())
        .await
        .unwrap_err();

    assert_eq!(err.step(), WorkflowStep::PublishArticle);
    let article = err.created_article().expect("draft should be reported");
    assert_eq!(article.id, EntityId::from("article-1"));
    assert!(!article.is_published());
    assert_eq!(repo.create_count(), 1);
    assert_eq!(repo.publish_count(), 1);
    assert!(err.to_string().contains("article-1 was created but not published"));
}

#[tokio::test]
async fn test_create_failure_is_not_a_publish_failure() {
    let repo = seeded_mock().fail_create("title must be unique");

    let err = Publisher::new(repo.clone())
        .publish(&full_input())
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::Create { .. }));
    assert_eq!(err.step(), WorkflowStep::CreateArticle);
    assert!(err.created_article().is_none());
    assert_eq!(repo.publish_count(), 0);
}

#[tokio::test]
async fn test_draft_is_not_published() {
    let repo = seeded_mock();
    let mut input = full_input();
    input.publish = false;

    let article = publish_post(&input, repo.clone()).await.unwrap();

    assert!(!article.is_published());
    assert_eq!(repo.create_count(), 1);
    assert_eq!(repo.publish_count(), 0);
}

#[tokio::test]
async fn test_published_article_is_queryable() {
    let repo = MemoryRepository::new().with_clock(FixedClock::new(fixed_now()));
    repo.add_author(AUTHOR);
    repo.add_category(CATEGORY, "Technology");
    repo.add_category("life", "Life");

    let mut input = full_input();
    input.featured = Some(true);

    let publisher = Publisher::new(repo).with_upload_concurrency(2);
    let article = publisher.publish(&input).await.unwrap();
    let repo = publisher.repository();

    let by_slug = repo
        .by_slug(article.slug.as_deref().unwrap())
        .await
        .unwrap();
    assert_eq!(by_slug.id, article.id);
    assert!(by_slug.is_published());

    let in_category = repo
        .by_category(CATEGORY, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(in_category.items.len(), 1);

    let other = repo.by_category("life", PageRequest::default()).await.unwrap();
    assert!(other.items.is_empty());

    let featured = repo.featured(PageRequest::default()).await.unwrap();
    assert_eq!(featured.items[0].id, article.id);

    assert_eq!(repo.asset_count(), 3);
    let stored = repo.articles().remove(0);
    assert_eq!(stored.payload.blocks.len(), 9);
}

#[tokio::test]
async fn test_memory_draft_is_hidden_from_queries() {
    let repo = MemoryRepository::new();
    repo.add_author(AUTHOR);
    repo.add_category(CATEGORY, "Technology");

    let mut input = PostInput::new("Hidden", "Draft only", AUTHOR, CATEGORY);
    input.publish = false;

    let publisher = Publisher::new(repo);
    let article = publisher.publish(&input).await.unwrap();

    let err = publisher
        .repository()
        .by_slug(article.slug.as_deref().unwrap())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("article not found"));
}

#[tokio::test]
async fn test_demo_post_composes_in_memory() {
    let input: PostInput =
        serde_json::from_str(include_str!("../../../demos/getting-started.json")).unwrap();

    let repo = MemoryRepository::new()
        .with_author(input.author_email.as_str())
        .with_category(input.category_slug.as_str(), "Technology");

    let publisher = Publisher::new(repo);
    let article = publisher.publish(&input).await.unwrap();

    assert!(article.is_published());
    assert_eq!(article.slug.as_deref(), Some("getting-started-with-strapi-api"));

    let stored = publisher.repository().articles().remove(0);
    assert_eq!(stored.payload.reading_time, 8);
    assert!(stored.payload.featured);
    assert_eq!(stored.payload.seo.keywords, "strapi, api, blog, cms, headless, tutorial");
    // intro, cover, 3 + 4 + 2 section blocks, conclusion
    assert_eq!(stored.payload.blocks.len(), 12);
    assert_eq!(publisher.repository().asset_count(), 3);
}
