// src/classify/mod.rs
// Classification coordinator: prefers the zero-shot model, degrades to the
// lexical scorer, and always returns a result.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::config::Config;

pub mod lexical;
pub mod zero_shot;

pub use zero_shot::{HfInferenceBackend, ZeroShotBackend, ZeroShotOutput};

/// Closed label set. No dynamic label discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Productive,
    Unproductive,
}

impl Label {
    pub const ALL: [Label; 2] = [Label::Productive, Label::Unproductive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Productive => "Productive",
            Label::Unproductive => "Unproductive",
        }
    }

    /// Exact-match parse of the caller-facing label string.
    pub fn parse(s: &str) -> Option<Label> {
        match s {
            "Productive" => Some(Label::Productive),
            "Unproductive" => Some(Label::Unproductive),
            _ => None,
        }
    }
}

/// Candidate labels handed to the zero-shot backend, in wire form.
pub const CANDIDATE_LABELS: [&str; 2] = ["Productive", "Unproductive"];

/// Per-class scores. Both labels are always present by construction;
/// values are in [0, 1] but only the model path guarantees they sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    #[serde(rename = "Productive")]
    pub productive: f64,
    #[serde(rename = "Unproductive")]
    pub unproductive: f64,
}

impl Scores {
    pub fn new(productive: f64, unproductive: f64) -> Self {
        Self {
            productive,
            unproductive,
        }
    }

    pub fn get(&self, label: Label) -> f64 {
        match label {
            Label::Productive => self.productive,
            Label::Unproductive => self.unproductive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub label: Label,
    pub scores: Scores,
}

type BackendFactory = Box<dyn Fn() -> Result<Arc<dyn ZeroShotBackend>> + Send + Sync>;

/// Coordinator over the zero-shot backend and the lexical scorer.
///
/// The backend is acquired lazily on the first classify (or health) call.
/// `OnceCell` guarantees at most one construction attempt even under racing
/// first requests, and a failed attempt is cached for the life of the
/// process: retrying an expensive failed load on every request is not worth
/// it, the lexical path is good enough in the meantime.
pub struct Classifier {
    backend: OnceCell<Option<Arc<dyn ZeroShotBackend>>>,
    factory: BackendFactory,
}

impl Classifier {
    /// Build from configuration. `TRIAGE_CLASSIFIER_BACKEND=none` disables
    /// the model path entirely without any construction attempt.
    pub fn from_config(config: &Config) -> Self {
        match config.classifier_backend.as_str() {
            "none" => Self::disabled(),
            other => {
                if other != "hf" {
                    warn!(backend = other, "unknown classifier backend, assuming 'hf'");
                }
                let config = config.clone();
                Self::with_factory(move || {
                    Ok(Arc::new(HfInferenceBackend::new(&config)?) as Arc<dyn ZeroShotBackend>)
                })
            }
        }
    }

    /// Lazy construction through `factory`, invoked at most once.
    pub fn with_factory(
        factory: impl Fn() -> Result<Arc<dyn ZeroShotBackend>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            backend: OnceCell::new(),
            factory: Box::new(factory),
        }
    }

    /// Pre-resolved backend, mainly for tests exercising the model path.
    pub fn with_backend(backend: Arc<dyn ZeroShotBackend>) -> Self {
        Self {
            backend: OnceCell::new_with(Some(Some(backend))),
            factory: Box::new(|| -> Result<Arc<dyn ZeroShotBackend>> {
                unreachable!("backend already resolved")
            }),
        }
    }

    /// Lexical-only classifier; the model path is permanently off.
    pub fn disabled() -> Self {
        Self {
            backend: OnceCell::new_with(Some(None)),
            factory: Box::new(|| -> Result<Arc<dyn ZeroShotBackend>> {
                unreachable!("classifier backend disabled")
            }),
        }
    }

    /// Classify email text. Never fails: every failure mode inside degrades
    /// to the lexical scorer.
    pub async fn classify(&self, text: &str) -> ClassificationResult {
        let text = text.trim();

        // Empty content defaults to "no action needed" by policy, without
        // touching any classifier.
        if text.is_empty() {
            return ClassificationResult {
                label: Label::Unproductive,
                scores: Scores::new(0.0, 1.0),
            };
        }

        if let Some(backend) = self.backend().await {
            match backend.classify(text, &CANDIDATE_LABELS).await {
                Ok(output) => match result_from_output(&output) {
                    Some(result) => return result,
                    None => {
                        warn!(
                            backend = backend.name(),
                            "zero-shot output unusable, falling back to lexical scorer"
                        );
                    }
                },
                Err(e) => {
                    warn!(
                        backend = backend.name(),
                        "zero-shot inference failed, falling back to lexical scorer: {e:#}"
                    );
                }
            }
        }

        lexical::score(text)
    }

    /// Whether the model path is live. Probing triggers the lazy load, so a
    /// health check warms the backend.
    pub async fn model_active(&self) -> bool {
        self.backend().await.is_some()
    }

    async fn backend(&self) -> Option<Arc<dyn ZeroShotBackend>> {
        self.backend
            .get_or_init(|| async {
                match (self.factory)() {
                    Ok(backend) => {
                        info!(backend = backend.name(), "zero-shot backend ready");
                        Some(backend)
                    }
                    Err(e) => {
                        warn!("zero-shot backend unavailable, lexical fallback only: {e:#}");
                        None
                    }
                }
            })
            .await
            .clone()
    }
}

/// Shape the backend's ranked output into a result. Labels the backend
/// omitted get score 0.0; a top label outside the closed set (or an empty
/// ranking) is unusable and yields `None`.
fn result_from_output(output: &ZeroShotOutput) -> Option<ClassificationResult> {
    let predicted = Label::parse(output.labels.first()?)?;

    let mut scores = Scores::new(0.0, 0.0);
    for label in Label::ALL {
        let value = output
            .labels
            .iter()
            .position(|l| l == label.as_str())
            .and_then(|i| output.scores.get(i).copied())
            .unwrap_or(0.0);
        match label {
            Label::Productive => scores.productive = value,
            Label::Unproductive => scores.unproductive = value,
        }
    }

    Some(ClassificationResult {
        label: predicted,
        scores,
    })
}
