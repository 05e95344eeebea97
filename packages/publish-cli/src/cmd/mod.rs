pub mod create;
pub mod query;

use anyhow::{Context, Result};
use post_composer::StrapiRepository;
use strapi_client::StrapiClient;

use crate::config::Config;

/// How command results are printed
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

/// Build a Strapi-backed repository from the CLI configuration
pub fn connect(config: &Config) -> Result<StrapiRepository> {
    let token = config.require_token()?;

    let http_client = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let client = StrapiClient::new(&config.strapi_url, token).with_http_client(http_client);
    Ok(StrapiRepository::new(client))
}

/// Public URL of an article on the slug route
pub fn article_url(base_url: &str, slug: &str) -> String {
    format!("{}/api/articles/slug/{}", base_url.trim_end_matches('/'), slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_url_trims_trailing_slash() {
        assert_eq!(
            article_url("http://localhost:1337/", "hello-world"),
            "http://localhost:1337/api/articles/slug/hello-world"
        );
    }
}
