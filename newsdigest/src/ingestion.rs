use anyhow::{Context, Result};
use async_trait::async_trait;
use feed_rs::parser;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// One normalized news-feed entry. Fields are extracted from the raw feed
/// model once at this boundary; downstream code never probes the feed
/// format for attribute presence.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub title: String,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub link: String,
}

impl Item {
    /// Normalize a parsed feed entry. Returns None for entries without a
    /// link: those can neither be extracted nor delivered.
    pub fn from_entry(entry: &feed_rs::model::Entry) -> Option<Item> {
        let link = entry.links.first().map(|l| l.href.clone())?;
        let title = entry
            .title
            .as_ref()
            .map(|t| t.content.clone())
            .unwrap_or_default();
        // feed-rs folds the RSS <description> and the Atom <summary> into one
        // field; it lands in `description` here, and `summary` is only ever
        // populated by sources that carry both.
        let description = entry
            .summary
            .as_ref()
            .map(|s| s.content.clone())
            .filter(|s| !s.trim().is_empty());
        let body = entry
            .content
            .as_ref()
            .and_then(|c| c.body.clone())
            .filter(|s| !s.trim().is_empty());

        Some(Item {
            title,
            description,
            summary: None,
            body,
            link,
        })
    }
}

/// Boundary trait for candidate item sources. A failing source yields an
/// error here; the orchestrator converts it to zero items and continues
/// with the remaining sources.
#[async_trait]
pub trait ItemSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<Item>>;
}

/// Production source: fetches a feed over HTTP and parses it with feed-rs.
pub struct FeedSource {
    client: Client,
}

impl FeedSource {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("newsdigest/0.1.0")
            .build()
            .context("failed to build reqwest client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ItemSource for FeedSource {
    /// Fetch and normalize the items of one feed, in feed order.
    /// Retries transient failures (5xx, 429, network) with backoff; client
    /// errors fail immediately.
    async fn fetch(&self, url: &str) -> Result<Vec<Item>> {
        let max_retries = 3;
        let mut last_error = None;

        for attempt in 1..=max_retries {
            if attempt > 1 {
                let backoff = Duration::from_secs(2u64.pow(attempt - 2)); // 1s, 2s, 4s...
                tracing::info!(
                    "Retrying feed fetch for {} (attempt {}/{}) after {:?}...",
                    url,
                    attempt,
                    max_retries,
                    backoff
                );
                tokio::time::sleep(backoff).await;
            }

            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let bytes = response.bytes().await.context("failed to read response body")?;
                        let feed = parser::parse(bytes.as_ref()).context("failed to parse feed")?;
                        let items: Vec<Item> =
                            feed.entries.iter().filter_map(Item::from_entry).collect();
                        debug!("feed {} yielded {} items", url, items.len());
                        return Ok(items);
                    } else if status.is_server_error() {
                        last_error = Some(anyhow::anyhow!("server error: {}", status));
                        continue;
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(anyhow::anyhow!("rate limited: {}", status));
                        continue;
                    } else {
                        // Client error (4xx) - likely permanent, don't retry
                        return Err(anyhow::anyhow!("feed fetch failed with status: {}", status));
                    }
                }
                Err(e) => {
                    // Network error - retry
                    last_error = Some(anyhow::Error::new(e).context("network error during fetch"));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error after retries")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example feed</title>
    <link>https://example.com</link>
    <item>
      <title>Probe reaches orbit</title>
      <description>The probe entered orbit on schedule.</description>
      <link>https://example.com/orbit</link>
    </item>
    <item>
      <title>No link here</title>
      <description>This entry should be dropped.</description>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn normalizes_rss_entries() {
        let feed = parser::parse(RSS_SAMPLE.as_bytes()).expect("parse rss");
        let items: Vec<Item> = feed.entries.iter().filter_map(Item::from_entry).collect();

        assert_eq!(items.len(), 1, "entry without link is dropped");
        let item = &items[0];
        assert_eq!(item.title, "Probe reaches orbit");
        assert_eq!(
            item.description.as_deref(),
            Some("The probe entered orbit on schedule.")
        );
        assert_eq!(item.link, "https://example.com/orbit");
        assert!(item.body.is_none());
    }

    #[test]
    fn normalizes_atom_content_body() {
        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example</title>
  <id>urn:example</id>
  <updated>2024-01-01T00:00:00Z</updated>
  <entry>
    <title>Launch window set</title>
    <id>urn:example:1</id>
    <updated>2024-01-01T00:00:00Z</updated>
    <link href="https://example.com/launch"/>
    <summary>Window opens Tuesday.</summary>
    <content type="text">Full text of the launch story.</content>
  </entry>
</feed>"#;

        let feed = parser::parse(atom.as_bytes()).expect("parse atom");
        let items: Vec<Item> = feed.entries.iter().filter_map(Item::from_entry).collect();

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.title, "Launch window set");
        assert_eq!(item.description.as_deref(), Some("Window opens Tuesday."));
        assert_eq!(
            item.body.as_deref(),
            Some("Full text of the launch story.")
        );
    }
}
