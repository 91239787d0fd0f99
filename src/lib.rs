pub mod config;
pub mod domain {
    pub mod account_plan;
    pub mod payment;
    pub mod response;
    pub mod user;
}
pub mod error;
pub mod gateways;
pub mod http {
    pub mod handlers {
        pub mod ops;
        pub mod payments;
        pub mod refunds;
    }
    pub mod middleware {
        pub mod admin_auth;
    }
    pub mod mock_gateway;
    pub mod router;
}
pub mod repo {
    pub mod account_plans_repo;
    pub mod billing_uow;
    pub mod in_memory;
    pub mod ports;
    pub mod users_repo;
}
pub mod service {
    pub mod payment_service;
    pub mod refund_service;
}

#[derive(Clone)]
pub struct AppState {
    pub payment_service: service::payment_service::PaymentService,
    pub refund_service: service::refund_service::RefundService,
    pub pool: sqlx::PgPool,
}
