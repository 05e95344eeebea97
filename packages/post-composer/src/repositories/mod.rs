//! Repository implementations backed by a remote CMS.

#[cfg(feature = "strapi")]
pub mod strapi;

#[cfg(feature = "strapi")]
pub use strapi::StrapiRepository;
