// src/state.rs

use std::sync::Arc;

use crate::classify::Classifier;
use crate::config::Config;
use crate::respond::Responder;

/// Shared application state handed to every handler.
pub struct AppState {
    pub classifier: Arc<Classifier>,
    pub responder: Arc<Responder>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            classifier: Arc::new(Classifier::from_config(config)),
            responder: Arc::new(Responder::from_config(config)),
        }
    }

    /// Assemble from pre-built services, mainly for tests.
    pub fn new(classifier: Classifier, responder: Responder) -> Self {
        Self {
            classifier: Arc::new(classifier),
            responder: Arc::new(responder),
        }
    }
}
