pub mod containers;
pub mod health;
pub mod lines;

use crate::config::Config;
use crate::db::Repository;
use crate::orchestration::BillingEngine;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Config,
    pub billing: Arc<BillingEngine>,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, config: Config, billing: Arc<BillingEngine>) -> Self {
        Self {
            repo,
            config,
            billing,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/lines/generate", post(lines::generate_lines))
        .route("/v1/lines", get(lines::get_lines).put(lines::update_line))
        .route("/v1/lines/:id/void", post(lines::void_line))
        .route("/v1/invoices/:id", get(containers::get_invoice))
        .route(
            "/v1/load-confirmations/:id",
            get(containers::get_load_confirmation),
        )
        .layer(cors)
        .with_state(state)
}
