use anyhow::Context;

use warbler_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    warbler_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    let app = warbler_api::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        token_ttl_ms = config.auth.token_ttl().num_milliseconds(),
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
