//! Image classification service command.

use crate::server::{self, router::classifier_router, state::ClassifierState};
use anyhow::{Context, Result};
use ricewise_config::Config;
use ricewise_vision::Classifier;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use tracing::info;

/// Load the model, then serve predictions until shutdown.
pub fn run(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let classifier = Classifier::from_config(&config.classifier)
        .context("Failed to load the image classifier")?;
    info!(
        "Classifier ready with {} classes",
        classifier.class_names().len()
    );

    let host = host.unwrap_or_else(|| config.server.classifier_host.clone());
    let port = port.unwrap_or(config.server.classifier_port);
    let bind_addr = format!("{}:{}", host, port);

    let rt = Runtime::new().context("Failed to create async runtime")?;
    rt.block_on(async {
        let listener = TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("Failed to bind to {}", bind_addr))?;
        info!("Classifier service listening on {}", listener.local_addr()?);

        let app = classifier_router(
            Arc::new(ClassifierState::new(classifier)),
            &config.server.cors_allowed_origins,
            config.classifier.max_upload_bytes,
        );
        server::serve(listener, app).await
    })
}
