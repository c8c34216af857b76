mod application;
mod config;
mod domain;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod test_support;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::infrastructure::AppContainer;
use crate::presentation::http::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    info!(
        "Starting Mind Mentor PDF assistant v{} on port {}",
        env!("CARGO_PKG_VERSION"),
        config.port
    );

    let container = AppContainer::new(&config)?;
    let server = HttpServer::new(
        container.document_handler,
        container.chat_handler,
        Some(config.port),
    );

    server.run().await
}
