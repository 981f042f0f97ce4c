use super::providers::{build_embedder, build_generator, build_pipeline};
use anyhow::Result;
use docqa_config::{Config, InitMode};
use docqa_core::readiness::{InitPolicy, ReadinessController};
use docqa_server::AppState;
use std::net::SocketAddr;
use std::sync::Arc;

pub async fn handle_serve(config: Config, port: Option<u16>) -> Result<()> {
    let policy = match config.server.init {
        InitMode::Eager => InitPolicy::Eager,
        InitMode::Lazy => InitPolicy::Lazy,
    };

    let controller = Arc::new(ReadinessController::new(
        build_pipeline(&config),
        build_embedder(&config)?,
        build_generator(&config)?,
        config.retrieval.top_k,
        policy,
    ));

    if policy == InitPolicy::Eager {
        // A failed eager init leaves the service degraded but serving, so
        // /status and /health still respond and the cause is inspectable.
        if let Err(e) = controller.initialize().await {
            tracing::error!(error = %e, "initialization failed, serving degraded");
        }
    }

    let port = port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", config.server.host, port).parse()?;
    let state = AppState {
        controller,
        config: Arc::new(config),
    };
    docqa_server::run(state, addr).await
}
