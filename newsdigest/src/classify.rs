use tracing::{debug, warn};

use crate::ingestion::Item;
use crate::oracle::ClassifierOracle;

/// Build the single classification text for an item: title, description,
/// summary and body in fixed order, absent fields skipped, embedded
/// newlines flattened to spaces.
pub fn combined_text(item: &Item) -> String {
    let mut text = String::new();

    let title = item.title.trim();
    if !title.is_empty() {
        text.push_str(title);
        text.push('.');
    }

    for part in [&item.description, &item.summary, &item.body] {
        if let Some(part) = part.as_deref() {
            let part = part.trim();
            if !part.is_empty() {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(part);
            }
        }
    }

    text.replace('\n', " ")
}

/// Decide whether one item matches any of the user's tags.
///
/// A single oracle call ranks all tags as competing candidate labels;
/// the item is relevant iff the top label's score clears `threshold`.
/// Running the tags as one multi-way classification instead of N binary
/// checks keeps generically "newsy" text from clearing every tag at once,
/// and costs one oracle call per item.
///
/// Fails closed: an empty text, an empty tag set or an oracle failure all
/// yield `false`; no error reaches the caller.
pub async fn is_relevant(
    oracle: &dyn ClassifierOracle,
    item: &Item,
    tags: &[String],
    threshold: f32,
) -> bool {
    let text = combined_text(item);
    if text.is_empty() || tags.is_empty() {
        return false;
    }

    match oracle.classify(&text, tags).await {
        Ok(ranked) => match ranked.first() {
            Some(top) => {
                debug!(
                    "classified '{}' -> {} ({:.2})",
                    snippet(&item.title),
                    top.label,
                    top.score
                );
                top.score >= threshold
            }
            None => {
                warn!(
                    "classification for '{}' returned no labels, treating as not relevant",
                    snippet(&item.title)
                );
                false
            }
        },
        Err(e) => {
            warn!(
                "classification failed for '{}', treating as not relevant: {}",
                snippet(&item.title),
                e
            );
            false
        }
    }
}

/// Shorten identifying text for log lines.
pub(crate) fn snippet(s: &str) -> String {
    const MAX_CHARS: usize = 80;
    if s.chars().count() <= MAX_CHARS {
        s.to_string()
    } else {
        let cut: String = s.chars().take(MAX_CHARS).collect();
        format!("{}...", cut)
    }
}
