//! Weather headlines from the Google News RSS search feed
//!
//! The feed is searched for `weather <loc>` and each `<item>` is flattened
//! into a [`NewsArticle`].

use quick_xml::de::from_str;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{GatewayError, Result};

pub const DEFAULT_BASE_URL: &str = "https://news.google.com/rss";

/// Query parameters accepted by `GET /news`
#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    pub loc: Option<String>,
}

/// One headline as returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub link: String,
    pub pub_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(rename = "pubDate", default)]
    pub_date: String,
    #[serde(default)]
    source: Option<Source>,
}

/// `<source url="...">Publisher</source>`
#[derive(Debug, Deserialize)]
struct Source {
    #[serde(rename = "$text", default)]
    name: String,
}

/// Search phrase sent to the feed
pub fn search_phrase(loc: &str) -> String {
    let loc = loc.trim();
    if loc.is_empty() {
        "weather".to_string()
    } else {
        format!("weather {loc}")
    }
}

/// Parse an RSS document into articles, in feed order
pub fn parse_feed(xml: &str) -> Result<Vec<NewsArticle>> {
    let rss: Rss = from_str(xml)
        .map_err(|e| GatewayError::Transport(format!("invalid news feed: {e}")))?;

    Ok(rss
        .channel
        .items
        .into_iter()
        .map(|item| NewsArticle {
            title: item.title,
            link: item.link,
            pub_date: item.pub_date,
            source: item.source.map(|s| s.name).filter(|name| !name.is_empty()),
        })
        .collect())
}

/// HTTP client for the news search feed
#[derive(Debug, Clone)]
pub struct NewsClient {
    client: reqwest::Client,
    base_url: String,
}

impl NewsClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build news HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn search(&self, loc: &str) -> Result<Vec<NewsArticle>> {
        let phrase = search_phrase(loc);
        debug!("Searching news feed for '{}'", phrase);

        let resp = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", phrase.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayError::Transport(format!(
                "news feed returned {status}"
            )));
        }

        let xml = resp.text().await?;
        parse_feed(&xml)
    }
}
