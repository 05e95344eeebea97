//! Repository implementations that live in-process.

pub mod memory;

pub use memory::{CategoryRecord, MemoryRepository, StoredArticle};
