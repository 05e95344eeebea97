//! Interfaces to the external content system.
//!
//! The workflow only talks to these traits, so the REST-backed repository,
//! the in-memory store and the test doubles are interchangeable.

pub mod query;
pub mod repository;
