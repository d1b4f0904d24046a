use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::io::Cursor;
use std::time::Duration;
use tracing::{info, warn};

/// Boundary trait for best-effort full-article retrieval. An error or an
/// empty string both mean "use the fallback text"; nothing here aborts a
/// digest request.
#[async_trait]
pub trait ArticleExtractor: Send + Sync {
    async fn fetch_full_text(&self, link: &str) -> Result<String>;
}

/// Production extractor: fetches the page and pulls the main content out
/// with readability, converting the extracted HTML to plain text.
pub struct ReadabilityExtractor {
    client: Client,
}

impl ReadabilityExtractor {
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
impl ArticleExtractor for ReadabilityExtractor {
    async fn fetch_full_text(&self, link: &str) -> Result<String> {
        let response = self
            .client
            .get(link)
            .send()
            .await
            .context("failed to fetch article page")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("article fetch failed with status: {}", status));
        }

        // Readability requires a Reader, so we fetch bytes
        let bytes = response.bytes().await.context("failed to read response body")?;
        let mut reader = Cursor::new(bytes);

        // Readability resolves relative links against the article URL
        let url_obj = url::Url::parse(link).context("failed to parse article URL")?;

        match readability::extractor::extract(&mut reader, &url_obj) {
            Ok(product) => {
                let html = product.content;

                match html2text::from_read(html.as_bytes(), 80) {
                    Ok(text) => {
                        info!(
                            "extract: readability pulled {} chars from {}",
                            text.len(),
                            link
                        );
                        Ok(text)
                    }
                    Err(e) => {
                        warn!("extract: failed to convert extracted HTML to text: {}", e);
                        // readability also provides a plain-text rendering
                        Ok(product.text)
                    }
                }
            }
            Err(e) => {
                warn!("extract: readability failed for {}: {}", link, e);
                // Empty string signals "use fallback text" to the caller
                Ok(String::new())
            }
        }
    }
}
