use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ClassifierOracle, GenerateRequest, GenerateResponse, GeneratorOracle, LabelScore, OracleError};

/// Remote zero-shot classifier using an HF-style inference HTTP API.
/// The model is addressed by the endpoint URL.
pub struct RemoteClassifier {
    api_url: String,
    api_key: String,
    default_timeout: Duration,
    client: reqwest::Client,
}

impl RemoteClassifier {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            default_timeout: Duration::from_secs(20),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.default_timeout = Duration::from_secs(timeout_secs);
        self
    }
}

#[async_trait::async_trait]
impl ClassifierOracle for RemoteClassifier {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[String],
    ) -> Result<Vec<LabelScore>, OracleError> {
        if text.trim().is_empty() || candidate_labels.is_empty() {
            return Err(OracleError::EmptyInput);
        }

        let req_body = ZeroShotRequest {
            inputs: text.to_string(),
            parameters: ZeroShotParameters {
                candidate_labels: candidate_labels.to_vec(),
            },
        };

        let response = tokio::time::timeout(
            self.default_timeout,
            self.client
                .post(&self.api_url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&req_body)
                .send(),
        )
        .await
        .map_err(|_| OracleError::Timeout(self.default_timeout))??;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Api { status, body });
        }

        let body_text = response.text().await?;
        let resp_body: ZeroShotResponse = serde_json::from_str(&body_text)
            .map_err(|e| OracleError::Malformed(format!("{} (body: {})", e, body_text)))?;

        if resp_body.labels.is_empty() || resp_body.labels.len() != resp_body.scores.len() {
            return Err(OracleError::Malformed(format!(
                "{} labels vs {} scores",
                resp_body.labels.len(),
                resp_body.scores.len()
            )));
        }

        Ok(resp_body
            .labels
            .into_iter()
            .zip(resp_body.scores)
            .map(|(label, score)| LabelScore { label, score })
            .collect())
    }
}

/// Remote text generator using an OpenAI-compatible chat HTTP API
pub struct RemoteGenerator {
    api_url: String,
    api_key: String,
    model: String,
    default_timeout: Duration,
    default_max_tokens: usize,
    default_temperature: f32,
    client: reqwest::Client,
}

impl RemoteGenerator {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            default_timeout: Duration::from_secs(30),
            default_max_tokens: 500,
            default_temperature: 0.5,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_defaults(mut self, timeout_secs: u64, max_tokens: usize, temperature: f32) -> Self {
        self.default_timeout = Duration::from_secs(timeout_secs);
        self.default_max_tokens = max_tokens;
        self.default_temperature = temperature;
        self
    }
}

#[async_trait::async_trait]
impl GeneratorOracle for RemoteGenerator {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, OracleError> {
        if request.prompt.trim().is_empty() {
            return Err(OracleError::EmptyInput);
        }

        let timeout = request
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout);

        let max_tokens = request.max_tokens.unwrap_or(self.default_max_tokens);
        let temperature = request.temperature.unwrap_or(self.default_temperature);

        let req_body = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: request.prompt,
            }],
            max_tokens: Some(max_tokens),
            temperature: Some(temperature),
        };

        let response = tokio::time::timeout(
            timeout,
            self.client
                .post(&self.api_url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&req_body)
                .send(),
        )
        .await
        .map_err(|_| OracleError::Timeout(timeout))??;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Api { status, body });
        }

        let body_text = response.text().await?;
        let resp_body: ChatResponse = serde_json::from_str(&body_text)
            .map_err(|e| OracleError::Malformed(format!("{} (body: {})", e, body_text)))?;

        let choice = resp_body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| OracleError::Malformed("response has no choices".to_string()))?;

        Ok(GenerateResponse {
            content: choice.message.content,
            model: resp_body.model.unwrap_or_else(|| self.model.clone()),
        })
    }
}

// Zero-shot API request/response structures
#[derive(Debug, Serialize)]
struct ZeroShotRequest {
    inputs: String,
    parameters: ZeroShotParameters,
}

#[derive(Debug, Serialize)]
struct ZeroShotParameters {
    candidate_labels: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ZeroShotResponse {
    labels: Vec<String>,
    scores: Vec<f32>,
}

// OpenAI-compatible chat request/response structures
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: Option<String>,
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}
