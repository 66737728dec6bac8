use std::time::Duration;

use anyhow::{bail, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde_json::Value;
use spdlog::debug;

use crate::config::WordPress;
use crate::wordpress::raw_post::{decode_posts, RawPost};
use crate::wordpress::PostSource;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub struct WordPressClient {
    client: Client,
    api_url: String,
}

impl WordPressClient {
    pub fn new(config: &WordPress) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)))
            .build()?;

        Ok(WordPressClient {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_posts(&self, url: &str) -> Result<Vec<RawPost>> {
        debug!("Fetching {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            bail!("{} answered {}", url, status);
        }

        let values: Vec<Value> = response.json().await?;
        Ok(decode_posts(values))
    }
}

pub fn category_url(api_url: &str, category_id: u64, per_page: u32) -> String {
    format!("{}/posts?categories={}&per_page={}&orderby=date&order=desc&_embed", api_url, category_id, per_page)
}

pub fn slug_url(api_url: &str, slug: &str) -> String {
    let query = serde_urlencoded::to_string([("slug", slug)]).unwrap_or_default();
    format!("{}/posts?{}&_embed", api_url, query)
}

impl PostSource for WordPressClient {
    async fn posts_in_category(&self, category_id: u64, per_page: u32) -> Result<Vec<RawPost>> {
        self.get_posts(&category_url(&self.api_url, category_id, per_page)).await
    }

    async fn posts_by_slug(&self, slug: &str) -> Result<Vec<RawPost>> {
        self.get_posts(&slug_url(&self.api_url, slug)).await
    }
}
