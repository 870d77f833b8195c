pub mod admin;
pub mod auth;
pub mod boosts;
pub mod health;
pub mod wallet;

use crate::api::auth::Authenticator;
use crate::db::Repository;
use crate::engine::{AdmissionController, LifecycleEngine, WalletLedger};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub admission: Arc<AdmissionController>,
    pub lifecycle: Arc<LifecycleEngine>,
    pub wallet: Arc<WalletLedger>,
    pub authenticator: Arc<dyn Authenticator>,
}

impl AppState {
    pub fn new(
        repo: Arc<Repository>,
        admission: Arc<AdmissionController>,
        lifecycle: Arc<LifecycleEngine>,
        wallet: Arc<WalletLedger>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            repo,
            admission,
            lifecycle,
            wallet,
            authenticator,
        }
    }
}

/// Success half of the response envelope; failures come from `AppError`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: bool,
    pub data: T,
}

pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope { status: true, data })
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/add-boost", post(boosts::add_boost))
        .route("/boost/:id", put(boosts::update_boost))
        .route("/boosts", get(boosts::list_boosts))
        .route("/:id/stop", post(boosts::stop_boost))
        .route("/:id", delete(boosts::delete_boost))
        .route("/admin", get(admin::list_boosts))
        .route("/update-status", post(admin::update_status))
        .route("/wallet", get(wallet::get_wallet))
        .route("/wallet/topup", post(wallet::topup))
        .layer(cors)
        .with_state(state)
}
