use std::sync::Arc;
use subscription_payments::config::AppConfig;
use subscription_payments::gateways::mock::MockGateway;
use subscription_payments::http::mock_gateway::router;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();
    let app = router(Arc::new(MockGateway::new()));

    let listener = tokio::net::TcpListener::bind(&cfg.mock_gateway_bind_addr).await?;
    tracing::info!("mock payment gateway listening on {}", cfg.mock_gateway_bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
