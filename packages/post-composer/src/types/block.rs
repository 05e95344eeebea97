use serde::{Deserialize, Serialize};

use super::EntityId;

/// One typed unit of article content, in the CMS dynamic-zone wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "__component")]
pub enum ContentBlock {
    /// HTML body
    #[serde(rename = "shared.rich-text")]
    RichText { body: String },

    /// Reference to an uploaded asset
    #[serde(rename = "shared.media")]
    Media { file: EntityId },

    #[serde(rename = "shared.quote")]
    Quote {
        body: String,
        #[serde(default)]
        author: String,
    },
}

impl ContentBlock {
    pub fn rich_text(body: impl Into<String>) -> Self {
        ContentBlock::RichText { body: body.into() }
    }

    pub fn media(file: impl Into<EntityId>) -> Self {
        ContentBlock::Media { file: file.into() }
    }

    pub fn quote(body: impl Into<String>, author: impl Into<String>) -> Self {
        ContentBlock::Quote {
            body: body.into(),
            author: author.into(),
        }
    }

    /// Component name used by the CMS.
    pub fn component(&self) -> &'static str {
        match self {
            ContentBlock::RichText { .. } => "shared.rich-text",
            ContentBlock::Media { .. } => "shared.media",
            ContentBlock::Quote { .. } => "shared.quote",
        }
    }
}
