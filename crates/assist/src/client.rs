//! Client for an OpenAI-compatible `/chat/completions` endpoint.

use std::time::Duration;

use serde::Deserialize;

use crate::config::AssistConfig;
use crate::error::AssistError;
use crate::prompt::ChatMessage;

/// Completions with long documents can take a while.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const TEMPERATURE: f32 = 0.2;

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// A model reply.
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    /// Model reported by the API, falling back to the configured one.
    pub model: String,
}

pub struct CompletionClient {
    client: reqwest::Client,
    config: AssistConfig,
}

impl CompletionClient {
    pub fn new(config: AssistConfig) -> Result<Self, AssistError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn max_document_chars(&self) -> usize {
        self.config.max_document_chars
    }

    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion, AssistError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": TEMPERATURE,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AssistError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletion = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| AssistError::Upstream {
                status: status.as_u16(),
                body: "completion without content".to_string(),
            })?;

        Ok(Completion {
            content,
            model: completion.model.unwrap_or_else(|| self.config.model.clone()),
        })
    }
}
