// src/main.rs

use std::sync::Arc;

use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use email_triage::api::api_router;
use email_triage::config::CONFIG;
use email_triage::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let level = CONFIG.log_level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting email-triage backend");
    info!("Classifier backend: {}", CONFIG.classifier_backend);
    info!(
        "Generative replies: {}",
        if CONFIG.use_generative && !CONFIG.openai_api_key.is_empty() {
            "enabled"
        } else {
            "canned only"
        }
    );

    let app_state = Arc::new(AppState::from_config(&CONFIG));
    let app = api_router(app_state);

    let bind_address = CONFIG.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
