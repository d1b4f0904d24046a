use tracing::warn;

use crate::classify::snippet;
use crate::oracle::ClassifierOracle;

pub const RELIABLE_LABEL: &str = "reliable information";
pub const QUESTIONABLE_LABEL: &str = "questionable information";

/// Coarse credibility bucket derived from classifier confidence.
///
/// This is a surface-style heuristic, not fact-checking: it measures how
/// confidently the classifier reads news-register text as "reliable" vs
/// "questionable", not whether the claims are true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustTier {
    High,
    Questionable,
    Low,
    Unknown,
}

impl TrustTier {
    /// Short display label shown in digest entries.
    pub fn label(&self) -> &'static str {
        match self {
            TrustTier::High => "likely reliable",
            TrustTier::Questionable => "possibly unreliable",
            TrustTier::Low => "likely unreliable",
            TrustTier::Unknown => "trust unverified",
        }
    }
}

/// Two-threshold banding for the "questionable" verdict.
#[derive(Debug, Clone, Copy)]
pub struct TrustBands {
    pub low: f32,
    pub high: f32,
    /// A "questionable" verdict below `low` is too weak to act on and falls
    /// back to the trusted tier. Operators who would rather surface those
    /// items as questionable can flip this off.
    pub weak_signal_trusted: bool,
}

impl Default for TrustBands {
    fn default() -> Self {
        Self {
            low: 0.6,
            high: 0.85,
            weak_signal_trusted: true,
        }
    }
}

/// Assign a credibility tier to `text`.
///
/// One oracle call with the two mutually exclusive trust labels; the top
/// verdict is banded by `bands`. Total over the four tiers: any oracle
/// failure yields `Unknown`, never an error.
pub async fn assess(oracle: &dyn ClassifierOracle, text: &str, bands: &TrustBands) -> TrustTier {
    let labels = vec![RELIABLE_LABEL.to_string(), QUESTIONABLE_LABEL.to_string()];

    let ranked = match oracle.classify(text, &labels).await {
        Ok(ranked) => ranked,
        Err(e) => {
            warn!("trust scoring failed for '{}': {}", snippet(text), e);
            return TrustTier::Unknown;
        }
    };

    let Some(top) = ranked.first() else {
        warn!("trust scoring returned no labels for '{}'", snippet(text));
        return TrustTier::Unknown;
    };

    if top.label == RELIABLE_LABEL {
        return TrustTier::High;
    }

    if top.score >= bands.high {
        TrustTier::Low
    } else if top.score >= bands.low {
        TrustTier::Questionable
    } else if bands.weak_signal_trusted {
        TrustTier::High
    } else {
        TrustTier::Questionable
    }
}
