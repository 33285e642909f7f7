use anyhow::Context;

use moneta_gateway::config::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    moneta_observability::init("moneta-gateway");

    let config = GatewayConfig::from_env()?;
    tracing::info!(ledger = %config.ledger_api_url, users = %config.users_api_url, "backend targets");
    let app = moneta_gateway::app::build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
