use tracing::warn;

use crate::classify::snippet;
use crate::ingestion::Item;
use crate::oracle::{GenerateRequest, GeneratorOracle};

/// Fixed text returned when the generation oracle fails.
pub const SUMMARY_UNAVAILABLE: &str = "(summary unavailable)";

/// Pick the text to summarize: the extracted article when available,
/// otherwise title + description.
pub fn select_text(item: &Item, article_text: &str) -> String {
    if !article_text.trim().is_empty() {
        article_text.to_string()
    } else {
        format!(
            "{}. {}",
            item.title,
            item.description.as_deref().unwrap_or("")
        )
    }
}

/// Produce a short synopsis of `text` via the generation oracle.
///
/// The oracle is asked to keep the source language. Large text is passed
/// through as-is; any windowing is the oracle's own. Degrades to a fixed
/// placeholder on failure; never returns an error to the caller.
pub async fn summarize(oracle: &dyn GeneratorOracle, text: &str) -> String {
    let prompt = format!(
        "You are an assistant that summarizes news articles. \
         Write a short, concise summary of the following text, \
         in the same language as the text itself:\n\n{}",
        text
    );

    let request = GenerateRequest {
        prompt,
        max_tokens: None,
        temperature: Some(0.5),
        timeout_seconds: None,
    };

    match oracle.generate(request).await {
        Ok(response) => response.content.trim().to_string(),
        Err(e) => {
            warn!("summary generation failed for '{}': {}", snippet(text), e);
            SUMMARY_UNAVAILABLE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{GenerateResponse, OracleError};

    fn item(title: &str, description: Option<&str>) -> Item {
        Item {
            title: title.to_string(),
            description: description.map(|s| s.to_string()),
            summary: None,
            body: None,
            link: "https://example.com/a".to_string(),
        }
    }

    struct EchoOracle;

    #[async_trait::async_trait]
    impl GeneratorOracle for EchoOracle {
        async fn generate(
            &self,
            request: GenerateRequest,
        ) -> Result<GenerateResponse, OracleError> {
            Ok(GenerateResponse {
                content: format!("  summary of {} chars  ", request.prompt.len()),
                model: "echo".to_string(),
            })
        }
    }

    struct FailingOracle;

    #[async_trait::async_trait]
    impl GeneratorOracle for FailingOracle {
        async fn generate(
            &self,
            _request: GenerateRequest,
        ) -> Result<GenerateResponse, OracleError> {
            Err(OracleError::Api {
                status: 429,
                body: "quota exceeded".to_string(),
            })
        }
    }

    #[test]
    fn prefers_extracted_article_text() {
        let it = item("Probe reaches orbit", Some("Orbit entered."));
        assert_eq!(select_text(&it, "Full article text."), "Full article text.");
    }

    #[test]
    fn falls_back_to_title_and_description() {
        let it = item("Probe reaches orbit", Some("Orbit entered."));
        assert_eq!(select_text(&it, ""), "Probe reaches orbit. Orbit entered.");
        assert_eq!(select_text(&it, "   \n "), "Probe reaches orbit. Orbit entered.");
    }

    #[tokio::test]
    async fn trims_generated_summary() {
        let summary = summarize(&EchoOracle, "Some article text").await;
        assert!(summary.starts_with("summary of"));
        assert!(!summary.starts_with(' '));
    }

    #[tokio::test]
    async fn degrades_to_placeholder_on_failure() {
        let summary = summarize(&FailingOracle, "Some article text").await;
        assert_eq!(summary, SUMMARY_UNAVAILABLE);
    }
}
