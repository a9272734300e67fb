use std::sync::Arc;

use anyhow::Context;
use uv_radiation::{SystemClock, UvConfig, UvService, telemetry, web};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = UvConfig::load().context("Failed to load configuration")?;
    telemetry::init(&config.logging)?;

    tracing::info!(
        version = uv_radiation::VERSION,
        environment = %config.server.environment,
        "Starting UV radiation service"
    );

    let service = UvService::from_config(&config, Arc::new(SystemClock))
        .context("Failed to initialize providers")?;

    web::run(&config.server, Arc::new(service)).await
}
