//! Vendor wallet endpoints: balance statement and top-up.

use crate::api::auth::AuthContext;
use crate::api::{ok, AppState, Envelope};
use crate::domain::{Decimal, Role, WalletTransaction};
use crate::error::AppError;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct WalletStatement {
    pub balance: Decimal,
    /// Ledger entries, oldest first.
    pub transactions: Vec<WalletTransaction>,
}

pub async fn get_wallet(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Envelope<WalletStatement>>, AppError> {
    auth.require_role(Role::Vendor)?;

    let (balance, transactions) = state.wallet.statement(&auth.principal).await?;
    Ok(ok(WalletStatement {
        balance,
        transactions,
    }))
}

#[derive(Debug, Deserialize)]
pub struct TopupRequest {
    pub amount: Decimal,
    pub description: Option<String>,
}

pub async fn topup(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<TopupRequest>,
) -> Result<Json<Envelope<WalletTransaction>>, AppError> {
    auth.require_role(Role::Vendor)?;

    let tx = state
        .wallet
        .topup(&auth.principal, req.amount, req.description)
        .await?;
    Ok(ok(tx))
}
