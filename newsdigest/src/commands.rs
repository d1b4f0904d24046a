use anyhow::Result;
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::warn;

use crate::digest::{build_digest, DigestContext, DigestOutcome};
use crate::subscriptions;

const SUBSCRIBE_USAGE: &str =
    "Please list your topics separated by commas. Example: subscribe AI, space";

/// Static help text for the start command.
pub fn start_text() -> &'static str {
    "Hi! I am a news digest assistant.\n\n\
     1. Run `subscribe` with a comma-separated topic list, e.g.: subscribe AI, space\n\
     2. Then run `digest` to get a selection of news for your topics."
}

/// Parse a raw comma-separated tag list into normalized tags:
/// comma-split, trimmed, lower-cased, empties dropped.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Replace a user's topics and confirm with the stored set. A missing or
/// empty tag list yields the usage prompt instead of an error.
pub async fn subscribe(pool: &SqlitePool, user_id: i64, raw_tags: Option<&str>) -> Result<String> {
    let tags = raw_tags.map(parse_tags).unwrap_or_default();
    if tags.is_empty() {
        return Ok(SUBSCRIBE_USAGE.to_string());
    }

    subscriptions::set_tags(pool, user_id, &tags).await?;
    Ok(format!("Topics saved: {}", tags.join(", ")))
}

/// Run a digest for one user and render the outcome as the messages to
/// deliver, one per item (guidance outcomes are a single message).
///
/// The whole run is bounded by `request_timeout`; a timed-out run yields a
/// failure message and never a partial digest, so emission order is
/// unaffected by the timeout.
pub async fn digest(ctx: &DigestContext, user_id: i64, request_timeout: Duration) -> Vec<String> {
    let outcome = match tokio::time::timeout(request_timeout, build_digest(ctx, user_id)).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            warn!("digest request failed for user {}: {}", user_id, e);
            return vec![
                "Something went wrong while building your digest. Please try again later."
                    .to_string(),
            ];
        }
        Err(_) => {
            warn!(
                "digest request for user {} timed out after {:?}",
                user_id, request_timeout
            );
            return vec!["Building your digest took too long. Please try again later.".to_string()];
        }
    };

    match outcome {
        DigestOutcome::NoSubscription => vec![
            "You have not picked any topics yet. Run `subscribe` with a topic list first."
                .to_string(),
        ],
        DigestOutcome::NoMatches => vec!["No news matched your topics this time.".to_string()],
        DigestOutcome::Entries(entries) => entries.iter().map(|e| e.render()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_tag_list() {
        assert_eq!(parse_tags("AI, space"), vec!["ai", "space"]);
        assert_eq!(parse_tags("  Rust ,, crypto ,"), vec!["rust", "crypto"]);
        assert_eq!(parse_tags(""), Vec::<String>::new());
        assert_eq!(parse_tags(" , ,"), Vec::<String>::new());
    }
}
