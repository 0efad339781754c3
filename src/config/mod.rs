// src/config/mod.rs
// All values come from the environment (with a .env file loaded first if present).

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // ── Server Configuration
    pub host: String,
    pub port: u16,

    // ── CORS / Upload limits
    pub frontend_origins: String,
    pub max_upload_mb: usize,

    // ── Zero-shot classifier backend
    pub classifier_backend: String,
    pub hf_api_token: String,
    pub hf_api_base: String,
    pub zero_shot_model: String,
    pub model_timeout_secs: u64,

    // ── Generative reply backend
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub chat_model: String,
    pub chat_timeout_secs: u64,
    pub use_generative: bool,

    // ── Logging
    pub log_level: String,
}

// Tolerates values with trailing comments and whitespace, e.g. `PORT=5000 # dev`.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            eprintln!("Warning: .env file not found. Using environment variables and defaults.");
        }

        Self {
            host: env_var_or("TRIAGE_HOST", "0.0.0.0".to_string()),
            port: env_var_or("PORT", 5000),
            frontend_origins: env_var_or("FRONTEND_ORIGINS", String::new()),
            max_upload_mb: env_var_or("MAX_CONTENT_LENGTH_MB", 5),
            classifier_backend: env_var_or("TRIAGE_CLASSIFIER_BACKEND", "hf".to_string()),
            hf_api_token: env_var_or("HF_API_TOKEN", String::new()),
            hf_api_base: env_var_or(
                "HF_API_BASE",
                "https://api-inference.huggingface.co".to_string(),
            ),
            zero_shot_model: env_var_or(
                "ZERO_SHOT_MODEL",
                "facebook/bart-large-mnli".to_string(),
            ),
            model_timeout_secs: env_var_or("TRIAGE_MODEL_TIMEOUT", 30),
            openai_api_key: env_var_or("OPENAI_API_KEY", String::new()),
            openai_base_url: env_var_or(
                "OPENAI_BASE_URL",
                "https://api.openai.com/v1".to_string(),
            ),
            chat_model: env_var_or("TRIAGE_CHAT_MODEL", "gpt-3.5-turbo".to_string()),
            chat_timeout_secs: env_var_or("TRIAGE_CHAT_TIMEOUT", 30),
            use_generative: env_var_or("TRIAGE_USE_GENERATIVE", true),
            log_level: env_var_or("TRIAGE_LOG_LEVEL", "info".to_string()),
        }
    }

    // --- Convenience Methods for Common Operations ---

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Upload cap in bytes for the multipart endpoint
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }

    /// Allowed CORS origins, falling back to the common dev set when unset
    pub fn allowed_origins(&self) -> Vec<String> {
        let configured: Vec<String> = self
            .frontend_origins
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if !configured.is_empty() {
            return configured;
        }
        [
            "http://127.0.0.1:5000",
            "http://localhost:5000",
            "http://127.0.0.1:3000",
            "http://localhost:3000",
            "http://127.0.0.1:5173",
            "http://localhost:5173",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }

    pub fn chat_timeout(&self) -> Duration {
        Duration::from_secs(self.chat_timeout_secs)
    }
}

// Global config instance - loaded once at startup
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
