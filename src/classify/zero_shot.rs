// src/classify/zero_shot.rs
// Zero-shot classification capability: trait plus the Hugging Face
// inference API adapter. Backend choice is made from configuration at
// startup, never by probing at request time.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;

/// Ranked output of a zero-shot call. `labels[i]` pairs with `scores[i]`,
/// ordered by descending score.
#[derive(Debug, Clone, Deserialize)]
pub struct ZeroShotOutput {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

/// External zero-shot text classification capability
#[async_trait]
pub trait ZeroShotBackend: Send + Sync {
    /// Backend name for logging/debugging
    fn name(&self) -> &'static str;

    /// Classify `text` against the candidate labels. Any transport or
    /// protocol problem is an ordinary error; callers fall back on it.
    async fn classify(&self, text: &str, candidate_labels: &[&str]) -> Result<ZeroShotOutput>;
}

/// Hugging Face hosted inference adapter for zero-shot classification.
#[derive(Clone)]
pub struct HfInferenceBackend {
    client: Client,
    api_token: String,
    api_base: String,
    model: String,
}

impl HfInferenceBackend {
    pub fn new(config: &Config) -> Result<Self> {
        if config.hf_api_token.is_empty() {
            return Err(anyhow!("HF_API_TOKEN not set"));
        }
        let client = Client::builder()
            .timeout(config.model_timeout())
            .build()?;
        Ok(Self {
            client,
            api_token: config.hf_api_token.clone(),
            api_base: config.hf_api_base.clone(),
            model: config.zero_shot_model.clone(),
        })
    }

    fn auth_header(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.api_token))
    }
}

#[async_trait]
impl ZeroShotBackend for HfInferenceBackend {
    fn name(&self) -> &'static str {
        "hf-inference"
    }

    async fn classify(&self, text: &str, candidate_labels: &[&str]) -> Result<ZeroShotOutput> {
        let url = format!("{}/models/{}", self.api_base, self.model);
        let req_body = json!({
            "inputs": text,
            "parameters": { "candidate_labels": candidate_labels }
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
                "HF zero-shot call failed: {}",
                resp.text().await.unwrap_or_default()
            ));
        }

        let output: ZeroShotOutput = resp.json().await?;
        if output.labels.len() != output.scores.len() {
            return Err(anyhow!(
                "HF zero-shot response misaligned: {} labels vs {} scores",
                output.labels.len(),
                output.scores.len()
            ));
        }
        Ok(output)
    }
}
