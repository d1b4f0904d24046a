use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{info, warn};

use crate::classify;
use crate::extract::ArticleExtractor;
use crate::ingestion::{Item, ItemSource};
use crate::oracle::{ClassifierOracle, GeneratorOracle};
use crate::subscriptions;
use crate::summarize;
use crate::trust::{self, TrustBands};

/// Hard cap on digest entries per request.
pub const MAX_MATCHES: usize = 5;

/// Everything one digest request needs: the store pool, the four
/// collaborator handles and the tuning knobs. Constructed once at startup
/// and passed by reference; components hold no global state.
pub struct DigestContext {
    pub pool: SqlitePool,
    pub source: Arc<dyn ItemSource>,
    pub classifier: Arc<dyn ClassifierOracle>,
    pub generator: Arc<dyn GeneratorOracle>,
    pub extractor: Arc<dyn ArticleExtractor>,
    /// Feed URLs in scan order. Earlier sources are favored once the scan
    /// limits cut in; operators control the order through configuration.
    pub source_urls: Vec<String>,
    pub relevance_threshold: f32,
    /// Total items examined across all sources before the scan stops.
    pub max_checked: usize,
    pub trust_bands: TrustBands,
}

/// One per-item output unit.
#[derive(Debug, Clone, PartialEq)]
pub struct DigestEntry {
    pub title: String,
    pub summary: String,
    pub trust_label: &'static str,
    pub link: String,
}

impl DigestEntry {
    /// Display text delivered to the user for one item.
    pub fn render(&self) -> String {
        format!(
            "{}\n\n{}\n\n{}\n{}",
            self.title, self.summary, self.trust_label, self.link
        )
    }
}

/// Outcome of one digest request.
#[derive(Debug)]
pub enum DigestOutcome {
    NoSubscription,
    NoMatches,
    Entries(Vec<DigestEntry>),
}

/// Run the full pipeline for one user: read tags, scan sources under the
/// bounded limits, classify, then trust-score and summarize each match.
///
/// Entries are emitted in strict discovery order (source list order, then
/// feed order); there is no re-ranking by relevance or trust score. Every
/// collaborator call is issued and awaited sequentially.
pub async fn build_digest(ctx: &DigestContext, user_id: i64) -> anyhow::Result<DigestOutcome> {
    let tags = subscriptions::get_tags(&ctx.pool, user_id).await?;
    if tags.is_empty() {
        return Ok(DigestOutcome::NoSubscription);
    }

    let mut matched: Vec<Item> = Vec::new();
    let mut checked = 0usize;

    'scan: for url in &ctx.source_urls {
        if checked >= ctx.max_checked || matched.len() >= MAX_MATCHES {
            break;
        }

        // A failing source contributes zero items; the scan moves on.
        let items = match ctx.source.fetch(url).await {
            Ok(items) => items,
            Err(e) => {
                warn!("source fetch failed for {}, skipping: {}", url, e);
                Vec::new()
            }
        };

        for item in items {
            if checked >= ctx.max_checked || matched.len() >= MAX_MATCHES {
                break 'scan;
            }
            if classify::is_relevant(
                ctx.classifier.as_ref(),
                &item,
                &tags,
                ctx.relevance_threshold,
            )
            .await
            {
                matched.push(item);
            }
            checked += 1;
        }
    }

    info!(
        "scan for user {} finished: {} checked, {} matched",
        user_id,
        checked,
        matched.len()
    );

    if matched.is_empty() {
        return Ok(DigestOutcome::NoMatches);
    }

    let mut entries = Vec::with_capacity(matched.len());
    for item in &matched {
        let trust_text = format!(
            "{}. {}",
            item.title,
            item.description.as_deref().unwrap_or("")
        );
        let tier = trust::assess(ctx.classifier.as_ref(), &trust_text, &ctx.trust_bands).await;

        // Extraction errors mean "use fallback text", same as an empty page.
        let article_text = match ctx.extractor.fetch_full_text(&item.link).await {
            Ok(text) => text,
            Err(e) => {
                warn!("article extraction failed for {}: {}", item.link, e);
                String::new()
            }
        };
        let text = summarize::select_text(item, &article_text);
        let summary = summarize::summarize(ctx.generator.as_ref(), &text).await;

        entries.push(DigestEntry {
            title: item.title.clone(),
            summary,
            trust_label: tier.label(),
            link: item.link.clone(),
        });
    }

    Ok(DigestOutcome::Entries(entries))
}
