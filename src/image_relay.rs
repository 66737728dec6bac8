use std::time::Duration;

use anyhow::{bail, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";
pub const CACHE_CONTROL: &str = "public, max-age=86400";

const RELAY_TIMEOUT_SECS: u64 = 20;

pub struct RelayedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Fetches remote images on behalf of the browser so they can be served from
/// the site's own origin.
pub struct ImageRelay {
    client: Client,
}

impl ImageRelay {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(RELAY_TIMEOUT_SECS))
            .build()?;
        Ok(ImageRelay { client })
    }

    pub async fn fetch(&self, url: &str) -> Result<RelayedImage> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("Unsupported image url {}", url);
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            bail!("Failed to fetch image: {}", status);
        }

        let content_type = content_type_or_default(
            response.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()));
        let bytes = response.bytes().await?.to_vec();

        Ok(RelayedImage {
            content_type,
            bytes,
        })
    }
}

fn content_type_or_default(header: Option<&str>) -> String {
    match header.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => DEFAULT_CONTENT_TYPE.to_string(),
    }
}
