// ai tutor - turns a question plus a topic into an answer and a category

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use super::classify::{ResponseType, classify};
use super::provider::{ChatCompletions, ChatTurn, CompletionProvider, CompletionRequest};

pub const DEFAULT_CONTEXT: &str = "general learning";
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 1024;

// the sample config ships with this in place of a real key
const PLACEHOLDER_KEY: &str = "your_groq_api_key";

pub const CONFIG_ERROR_TEXT: &str = "AI service configuration error. Please check API key.";
pub const UNEXPECTED_RESPONSE_TEXT: &str = "I received an unexpected response from the AI service.";
const PROVIDER_ERROR_TEXT: &str =
    "I'm experiencing technical difficulties. Please try again later. Error: ";

#[derive(Debug, Clone)]
pub struct TutorConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
}

impl TutorConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            ..Self::default()
        }
    }

    /// The api key, if it is set to something that could actually work.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !k.to_lowercase().contains(PLACEHOLDER_KEY))
    }
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TutorError {
    #[error("api key missing or still the placeholder")]
    Config,

    #[error("provider error: {0}")]
    Provider(String),

    #[error("unexpected provider response: {0}")]
    Parse(String),
}

impl TutorError {
    // the text a student sees instead of an answer
    fn fallback_text(&self) -> String {
        match self {
            Self::Config => CONFIG_ERROR_TEXT.to_string(),
            Self::Provider(detail) => format!("{PROVIDER_ERROR_TEXT}{detail}"),
            Self::Parse(_) => UNEXPECTED_RESPONSE_TEXT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TutorReply {
    pub text: String,
    pub kind: ResponseType,
}

pub struct Tutor {
    config: TutorConfig,
    provider: Arc<dyn CompletionProvider>,
}

impl Tutor {
    pub fn new(config: TutorConfig) -> Self {
        let provider: Arc<dyn CompletionProvider> =
            Arc::new(ChatCompletions::new(config.endpoint.clone()));
        Self { config, provider }
    }

    pub fn with_provider(config: TutorConfig, provider: Arc<dyn CompletionProvider>) -> Self {
        Self { config, provider }
    }

    pub fn config(&self) -> &TutorConfig {
        &self.config
    }

    /// Answer a question. Never fails: provider and config problems come back
    /// as an apologetic answer so callers always have something to show.
    pub async fn answer(&self, question: &str, context: Option<&str>) -> TutorReply {
        let text = match self.ask(question, context).await {
            Ok(text) => {
                info!("tutor answer generated");
                text
            }
            Err(e) => {
                match &e {
                    TutorError::Config => error!("tutor api key not configured"),
                    TutorError::Provider(detail) => {
                        error!(error = %detail, "completion provider failed")
                    }
                    TutorError::Parse(detail) => {
                        warn!(error = %detail, "unexpected completion response")
                    }
                }
                e.fallback_text()
            }
        };

        let kind = classify(Some(text.as_str()));
        TutorReply { text, kind }
    }

    async fn ask(&self, question: &str, context: Option<&str>) -> Result<String, TutorError> {
        let api_key = self.config.credential().ok_or(TutorError::Config)?;

        let request = self.request(question, context);
        let body = self.provider.complete(api_key, &request).await?;

        extract_content(&body)
    }

    pub fn request(&self, question: &str, context: Option<&str>) -> CompletionRequest {
        let context = context.filter(|c| !c.trim().is_empty()).unwrap_or(DEFAULT_CONTEXT);

        CompletionRequest {
            messages: vec![
                ChatTurn::system(format!(
                    "You are an AI tutor specializing in {context}. Be helpful and educational."
                )),
                ChatTurn::user(question),
            ],
            model: self.config.model.clone(),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}

// choices[0].message.content, or a parse error saying what was missing
fn extract_content(body: &serde_json::Value) -> Result<String, TutorError> {
    let choices = body
        .get("choices")
        .and_then(|c| c.as_array())
        .ok_or_else(|| TutorError::Parse("no choices in response".to_string()))?;

    let first = choices
        .first()
        .ok_or_else(|| TutorError::Parse("empty choices".to_string()))?;

    first
        .pointer("/message/content")
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| TutorError::Parse("first choice has no message content".to_string()))
}
