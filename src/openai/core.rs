use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Upper bound on the length of each reply.
pub const MAX_TOKENS: u32 = 150;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

impl Role {
    /// Role name with the first letter capitalized, the way it
    /// appears in a transcript line.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// A single role/content pair as sent to the chat completion API.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }
}

/// The boundary to the language model. Takes the entire history and
/// returns the next reply. Anything that goes wrong on the way
/// (network, auth, quota) comes back as an error and is not retried.
#[async_trait]
pub trait Completion {
    async fn complete(&self, history: &[Message]) -> Result<String, Error>;
}

pub type BoxedCompletion = Box<dyn Completion + Send + Sync + 'static>;

pub async fn completion(
    messages: &[Message],
    api_hostname: &str,
    api_key: &str,
    model: &str,
    max_tokens: u32,
) -> Result<Value, Error> {
    let payload = json!({
        "model": model,
        "messages": messages,
        "max_tokens": max_tokens,
    });
    let url = format!("{}/v1/chat/completions", api_hostname.trim_end_matches("/"));
    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(60 * 10))
        .json(&payload)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(response)
}

/// `Completion` backed by an OpenAI compatible chat completions API.
#[derive(Clone, Debug)]
pub struct OpenAiClient {
    api_hostname: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiClient {
    pub fn new(api_hostname: &str, api_key: &str, model: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens: MAX_TOKENS,
        }
    }
}

#[async_trait]
impl Completion for OpenAiClient {
    async fn complete(&self, history: &[Message]) -> Result<String, Error> {
        tracing::debug!(
            "Requesting completion from {} with {} messages",
            &self.model,
            history.len()
        );

        let resp = completion(
            history,
            &self.api_hostname,
            &self.api_key,
            &self.model,
            self.max_tokens,
        )
        .await?;

        let content = resp["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(anyhow!("No message received. Resp:\n\n {}", resp))?;

        Ok(content.trim().to_string())
    }
}
