// src/respond/openai.rs

//! Low-level OpenAI chat-completions client used for generated replies.
//! No wrappers; just reqwest and Rust.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::config::Config;

/// External generative-text capability. One attempt per call, no retries.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Backend name for logging/debugging
    fn name(&self) -> &'static str;

    /// Complete `user` under `system`, bounded by `temperature` and
    /// `max_tokens`. May fail with auth, network, or quota errors.
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String>;
}

#[derive(Clone)]
pub struct OpenAiBackend {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl OpenAiBackend {
    pub fn new(config: &Config) -> Result<Self> {
        if config.openai_api_key.is_empty() {
            return Err(anyhow!("OPENAI_API_KEY not set"));
        }
        let client = Client::builder().timeout(config.chat_timeout()).build()?;
        Ok(Self {
            client,
            api_key: config.openai_api_key.clone(),
            api_base: config.openai_base_url.clone(),
            model: config.chat_model.clone(),
        })
    }

    fn auth_header(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.api_key))
    }
}

#[async_trait]
impl GenerativeBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai-chat"
    }

    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_base);
        let req_body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user }
            ],
            "temperature": temperature,
            "max_tokens": max_tokens
        });

        let resp = self
            .client
            .post(&url)
            .header(self.auth_header().0, self.auth_header().1.clone())
            .json(&req_body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(anyhow!(
                "OpenAI chat call failed: {}",
                resp.text().await.unwrap_or_default()
            ));
        }

        let resp_json: serde_json::Value = resp.json().await?;
        let content = resp_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow!("no message content in OpenAI response"))?;

        Ok(content.trim().to_string())
    }
}
