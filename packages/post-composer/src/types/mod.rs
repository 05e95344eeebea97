//! Data types for post input, content blocks and articles.

pub mod article;
pub mod block;
pub mod input;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier issued by the content repository.
///
/// The CMS issues integer ids; test doubles and other backends may use text.
/// Serialized untagged so numeric ids stay JSON numbers on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Numeric(u64),
    Text(String),
}

impl EntityId {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            EntityId::Numeric(n) => Some(*n),
            EntityId::Text(s) => s.parse().ok(),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Numeric(n) => write!(f, "{}", n),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        EntityId::Numeric(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        EntityId::Text(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        EntityId::Text(id)
    }
}
