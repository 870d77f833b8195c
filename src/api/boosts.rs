//! Vendor-facing boost endpoints.

use crate::api::auth::AuthContext;
use crate::api::{ok, AppState, Envelope};
use crate::domain::{Boost, BoostId, BoostPatch, BoostType, NewBoost, Role};
use crate::error::AppError;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use std::str::FromStr;

pub async fn add_boost(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<NewBoost>,
) -> Result<Json<Envelope<Boost>>, AppError> {
    auth.require_role(Role::Vendor)?;
    let boost = state.admission.create_boost(&auth.principal, req).await?;
    Ok(ok(boost))
}

pub async fn update_boost(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    Json(patch): Json<BoostPatch>,
) -> Result<Json<Envelope<Boost>>, AppError> {
    auth.require_role(Role::Vendor)?;
    let boost = state
        .admission
        .update_boost(&auth.principal, &BoostId::new(id), patch)
        .await?;
    Ok(ok(boost))
}

#[derive(Debug, Deserialize)]
pub struct ListBoostsQuery {
    #[serde(rename = "boostType")]
    pub boost_type: Option<String>,
}

pub async fn list_boosts(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(params): Query<ListBoostsQuery>,
) -> Result<Json<Envelope<Vec<Boost>>>, AppError> {
    auth.require_role(Role::Vendor)?;

    let boost_type = match params.boost_type.as_deref() {
        Some(raw) => Some(BoostType::from_str(raw).map_err(AppError::Validation)?),
        None => None,
    };

    let boosts = state
        .admission
        .list_boosts(&auth.principal, boost_type)
        .await?;
    Ok(ok(boosts))
}

pub async fn stop_boost(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Boost>>, AppError> {
    auth.require_role(Role::Vendor)?;
    let boost = state
        .lifecycle
        .stop_boost(&auth.principal, &BoostId::new(id))
        .await?;
    Ok(ok(boost))
}

pub async fn delete_boost(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Boost>>, AppError> {
    auth.require_role(Role::Vendor)?;
    let boost = state
        .lifecycle
        .delete_boost(&auth.principal, &BoostId::new(id))
        .await?;
    Ok(ok(boost))
}
