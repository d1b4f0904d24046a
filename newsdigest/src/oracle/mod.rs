use std::time::Duration;
use thiserror::Error;

/// Failure taxonomy for oracle calls. Every variant is caught at the point
/// of call and converted to a safe default (not relevant, unknown tier,
/// placeholder summary); no oracle failure propagates past its component.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("empty input")]
    EmptyInput,
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("api error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// One (label, score) pair of a classification result
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

/// Core trait for classification oracles (zero-shot over arbitrary labels)
#[async_trait::async_trait]
pub trait ClassifierOracle: Send + Sync {
    /// Classify `text` against `candidate_labels`, returning (label, score)
    /// pairs sorted descending by score. Labels are mutually exclusive at
    /// both call sites here, so they compete for probability mass and the
    /// top entry is the oracle's best guess.
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[String],
    ) -> Result<Vec<LabelScore>, OracleError>;
}

/// Request structure for text generation
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
    pub max_tokens: Option<usize>,
    pub temperature: Option<f32>,
    pub timeout_seconds: Option<u64>,
}

/// Response from text generation
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub content: String,
    pub model: String,
}

/// Core trait for generation oracles
#[async_trait::async_trait]
pub trait GeneratorOracle: Send + Sync {
    /// Generate completion for a given prompt
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, OracleError>;
}

pub mod remote;
