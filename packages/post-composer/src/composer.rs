//! Post Composer: turns a `PostInput` plus resolved ids into an article payload.
//!
//! Pure and deterministic for a given clock. Never fails; validating the
//! result is the repository's job.
//!
//! Block order:
//! 1. introduction as `<p>…</p>`
//! 2. cover image
//! 3. per section `i`: `<h2>heading</h2>`, raw content, content image `i`, quote
//! 4. conclusion as `<h2>Conclusion</h2><p>…</p>`

use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::types::article::{ArticlePayload, ResolvedRefs};
use crate::types::block::ContentBlock;
use crate::types::input::{present, PostInput, SeoOverrides};

/// Compose the payload, reading the clock once for a missing `publishDate`.
pub fn compose(input: &PostInput, refs: &ResolvedRefs, clock: &dyn Clock) -> ArticlePayload {
    compose_at(input, refs, clock.now())
}

/// Compose the payload with `now` as the fallback publish date.
pub fn compose_at(input: &PostInput, refs: &ResolvedRefs, now: DateTime<Utc>) -> ArticlePayload {
    ArticlePayload {
        title: input.title.clone(),
        description: input.description.clone(),
        author: refs.author.clone(),
        category: refs.category.clone(),
        cover: refs.cover.clone(),
        publish_date: input.publish_date.unwrap_or(now),
        reading_time: input.reading_time_or_default(),
        featured: input.featured_or_default(),
        tags: input.tags.clone(),
        seo: SeoOverrides::resolve(input.seo.as_ref(), input),
        blocks: build_blocks(input, refs),
    }
}

/// Build the ordered content blocks.
pub fn build_blocks(input: &PostInput, refs: &ResolvedRefs) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();

    if let Some(introduction) = present(&input.introduction) {
        blocks.push(ContentBlock::rich_text(format!("<p>{}</p>", introduction)));
    }

    if let Some(cover) = &refs.cover {
        blocks.push(ContentBlock::media(cover.clone()));
    }

    for (index, section) in input.content_sections.iter().enumerate() {
        if let Some(heading) = present(&section.heading) {
            blocks.push(ContentBlock::rich_text(format!("<h2>{}</h2>", heading)));
        }

        if let Some(content) = present(&section.content) {
            blocks.push(ContentBlock::rich_text(content));
        }

        if let Some(image) = refs.content_images.get(index) {
            blocks.push(ContentBlock::media(image.clone()));
        }

        if let Some(quote) = &section.quote {
            let author = present(&quote.author).unwrap_or_default();
            blocks.push(ContentBlock::quote(quote.text.as_str(), author));
        }
    }

    if let Some(conclusion) = present(&input.conclusion) {
        blocks.push(ContentBlock::rich_text(format!(
            "<h2>Conclusion</h2><p>{}</p>",
            conclusion
        )));
    }

    blocks
}
