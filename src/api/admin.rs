//! Admin endpoints: full boost listing with vendor info, and the status
//! override escape hatch.

use crate::api::auth::AuthContext;
use crate::api::{ok, AppState, Envelope};
use crate::domain::{Boost, BoostId, BoostStatus, Decimal, Role};
use crate::error::AppError;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One row of the admin listing: the boost plus the owning vendor's wallet
/// balance.
#[derive(Debug, Serialize)]
pub struct AdminBoostRow {
    #[serde(flatten)]
    pub boost: Boost,
    pub wallet_balance: Decimal,
}

pub async fn list_boosts(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Envelope<Vec<AdminBoostRow>>>, AppError> {
    auth.require_role(Role::Admin)?;

    let rows = state.repo.list_all_boosts().await?;
    let data = rows
        .into_iter()
        .map(|(boost, wallet_balance)| AdminBoostRow {
            boost,
            wallet_balance,
        })
        .collect();
    Ok(ok(data))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub id: String,
    pub status: String,
}

pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Envelope<Boost>>, AppError> {
    auth.require_role(Role::Admin)?;

    let target = BoostStatus::from_str(&req.status).map_err(AppError::Validation)?;
    let boost = state
        .lifecycle
        .admin_set_status(auth.principal.as_str(), &BoostId::new(req.id), target)
        .await?;
    Ok(ok(boost))
}
