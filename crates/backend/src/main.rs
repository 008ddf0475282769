pub mod api;
pub mod domain;
pub mod routes;
pub mod shared;
pub mod system;

use std::sync::Arc;

use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = shared::config::load_config()?;
    let addr = config.server.bind;

    if config.llm.api_key().is_none() {
        // Сервер стартует, но анализ будет отвечать ошибкой до появления ключа
        tracing::warn!(
            "Environment variable {} is not set: analysis requests will fail",
            config.llm.api_key_env
        );
    }
    tracing::info!(
        "LLM endpoint {} with models [{}]",
        config.llm.api_base,
        config.llm.models.join(", ")
    );

    let app = routes::configure_routes(Arc::new(config));

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    addr.port()
                );
            } else {
                tracing::error!("Failed to bind to {}. Error: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
