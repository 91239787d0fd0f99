use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use subscription_payments::config::AppConfig;
use subscription_payments::gateways::build_gateway;
use subscription_payments::http::router::build_router;
use subscription_payments::repo::account_plans_repo::AccountPlansRepo;
use subscription_payments::repo::billing_uow::PgBillingUnitOfWork;
use subscription_payments::repo::users_repo::UsersRepo;
use subscription_payments::service::payment_service::PaymentService;
use subscription_payments::service::refund_service::RefundService;
use subscription_payments::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let gateway = build_gateway(&cfg);
    let payment_service = PaymentService {
        gateway: gateway.clone(),
        users: Arc::new(UsersRepo { pool: pool.clone() }),
        plans: Arc::new(AccountPlansRepo { pool: pool.clone() }),
        billing: Arc::new(PgBillingUnitOfWork { pool: pool.clone() }),
        command_timeout: cfg.command_timeout_ms.map(Duration::from_millis),
    };
    let refund_service = RefundService { gateway };

    let state = AppState {
        payment_service,
        refund_service,
        pool,
    };
    let app = build_router(state, cfg.internal_api_key.clone());

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
