//! Health headlines from the GNews search API.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, AppResult};

const HEALTH_QUERY: &str = "(medical OR healthcare OR medicine OR health) AND \
                            (research OR study OR treatment OR diagnosis OR prevention)";
const MAX_ARTICLES: &str = "10";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub image: Option<String>,
    pub published_at: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    title: String,
    description: Option<String>,
    url: String,
    image: Option<String>,
    published_at: Option<String>,
    source: Option<RawSource>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    name: Option<String>,
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        Self {
            title: raw.title,
            description: raw.description,
            url: raw.url,
            image: raw.image,
            published_at: raw.published_at,
            source: raw.source.and_then(|s| s.name),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NewsClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl NewsClient {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.gnews_base_url, config.gnews_api_key.clone())
    }

    pub async fn health_headlines(&self) -> AppResult<Vec<Article>> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("q", HEALTH_QUERY),
                ("lang", "en"),
                ("country", "us"),
                ("max", MAX_ARTICLES),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::Upstream(format!("news request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!("news provider returned {status}")));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| {
                AppError::UpstreamFormat(format!("news response: {}", e.without_url()))
            })?;

        Ok(body.articles.into_iter().map(Article::from).collect())
    }
}
