// chat completion provider - the only outbound call the tutor makes
// speaks the openai-style /chat/completions shape (groq by default)

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::tutor::TutorError;

// what we send to the provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub messages: Vec<ChatTurn>,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTurn {
    pub role: &'static str,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// Sends a completion request and hands back the raw JSON body.
///
/// Picking the answer out of the body is the tutor's job, so a provider only
/// fails for transport problems, non-2xx statuses, or bodies that are not JSON.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<serde_json::Value, TutorError>;
}

pub struct ChatCompletions {
    client: reqwest::Client,
    endpoint: String,
}

impl ChatCompletions {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletions {
    async fn complete(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<serde_json::Value, TutorError> {
        debug!(endpoint = %self.endpoint, model = %request.model, "sending completion request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| TutorError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.text().await {
                Ok(body) => format!("HTTP {status}: {body}"),
                Err(e) => format!("HTTP {status} (body unreadable: {e})"),
            };
            return Err(TutorError::Provider(detail));
        }

        response
            .json()
            .await
            .map_err(|e| TutorError::Provider(e.to_string()))
    }
}
