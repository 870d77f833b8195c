//! Admission controller: the check-then-commit gate for boosts.
//!
//! Creation and update run their conflict scan, the boost write, and the
//! wallet debit inside one `BEGIN IMMEDIATE` transaction, so concurrent
//! callers observe admission as atomic: either the boost and its charge both
//! land, or neither does.

use crate::catalog::PricingCatalog;
use crate::db::repo::{boosts, wallet};
use crate::db::Repository;
use crate::domain::{
    parse_start_date, Boost, BoostDuration, BoostId, BoostPatch, BoostStatus, BoostType, Decimal,
    NewBoost, ReferenceType, ScopeId, TimeMs, VendorId,
};
use crate::engine::conflict::windows_overlap;
use crate::error::AppError;
use sqlx::sqlite::SqliteConnection;
use std::sync::Arc;

pub struct AdmissionController {
    repo: Arc<Repository>,
    catalog: Arc<dyn PricingCatalog>,
}

impl AdmissionController {
    pub fn new(repo: Arc<Repository>, catalog: Arc<dyn PricingCatalog>) -> Self {
        Self { repo, catalog }
    }

    /// Admit a new boost for a vendor: validate, scan for conflicts, persist
    /// as `scheduled`, and charge the wallet. Rejections leave no trace.
    pub async fn create_boost(
        &self,
        vendor_id: &VendorId,
        req: NewBoost,
    ) -> Result<Boost, AppError> {
        let now = TimeMs::now();
        let scope_ids = normalize_scope_ids(req.scope_ids)?;
        validate_duration(&req.duration)?;
        let start_ms = parse_start(&req.start_date)?;
        let price = self
            .resolve_price(req.price, req.boost_type, &req.duration)
            .await?;

        let boost = Boost {
            id: BoostId::generate(),
            vendor_id: vendor_id.clone(),
            boost_type: req.boost_type,
            scope_type: req.scope_type,
            scope_ids,
            start_ms,
            end_ms: req.duration.end_from(start_ms),
            duration: req.duration,
            price,
            priority: 0,
            status: BoostStatus::Scheduled,
            is_deleted: false,
            admin_flagged: false,
            created_at_ms: now,
            updated_at_ms: now,
        };

        let mut conn = self.repo.begin_immediate().await?;
        match self.admit(&mut conn, &boost, now).await {
            Ok(()) => {
                Repository::commit(conn).await?;
                tracing::info!(
                    vendor = %boost.vendor_id,
                    boost = %boost.id,
                    boost_type = %boost.boost_type,
                    price = %boost.price,
                    "boost admitted"
                );
                Ok(boost)
            }
            Err(e) => {
                Repository::rollback(conn).await;
                Err(e)
            }
        }
    }

    /// Apply a partial update. The conflict scan excludes the boost itself,
    /// the window is re-derived, and the status is reset to `scheduled` —
    /// updates always re-schedule, even when the boost was active. No new
    /// charge is taken.
    pub async fn update_boost(
        &self,
        vendor_id: &VendorId,
        boost_id: &BoostId,
        patch: BoostPatch,
    ) -> Result<Boost, AppError> {
        let now = TimeMs::now();
        let mut conn = self.repo.begin_immediate().await?;
        match self
            .apply_update(&mut conn, vendor_id, boost_id, patch, now)
            .await
        {
            Ok(boost) => {
                Repository::commit(conn).await?;
                tracing::info!(vendor = %vendor_id, boost = %boost_id, "boost updated and re-scheduled");
                Ok(boost)
            }
            Err(e) => {
                Repository::rollback(conn).await;
                Err(e)
            }
        }
    }

    /// A vendor's boosts, newest first, optionally filtered by type.
    pub async fn list_boosts(
        &self,
        vendor_id: &VendorId,
        boost_type: Option<BoostType>,
    ) -> Result<Vec<Boost>, AppError> {
        Ok(self.repo.list_boosts(vendor_id, boost_type).await?)
    }

    async fn apply_update(
        &self,
        conn: &mut SqliteConnection,
        vendor_id: &VendorId,
        boost_id: &BoostId,
        patch: BoostPatch,
        now: TimeMs,
    ) -> Result<Boost, AppError> {
        let existing = boosts::get_boost_in_tx(conn, vendor_id, boost_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("no boost {} for vendor {}", boost_id, vendor_id))
            })?;

        let mut updated = existing;
        if let Some(boost_type) = patch.boost_type {
            updated.boost_type = boost_type;
        }
        if let Some(scope_type) = patch.scope_type {
            updated.scope_type = scope_type;
        }
        if let Some(scope_ids) = patch.scope_ids {
            updated.scope_ids = normalize_scope_ids(scope_ids)?;
        }
        if let Some(duration) = patch.duration {
            validate_duration(&duration)?;
            updated.duration = duration;
        }
        if let Some(start_date) = patch.start_date {
            updated.start_ms = parse_start(&start_date)?;
        }
        updated.end_ms = updated.duration.end_from(updated.start_ms);
        updated.status = BoostStatus::Scheduled;
        updated.updated_at_ms = now;

        self.check_conflicts(conn, &updated, Some(boost_id)).await?;
        boosts::update_boost(conn, &updated).await?;
        Ok(updated)
    }

    /// Conflict scan + insert + debit, inside the caller's transaction.
    async fn admit(
        &self,
        conn: &mut SqliteConnection,
        boost: &Boost,
        now: TimeMs,
    ) -> Result<(), AppError> {
        self.check_conflicts(conn, boost, None).await?;
        boosts::insert_boost(conn, boost).await?;

        let description = format!(
            "{} boost over {} {} scope(s)",
            boost.boost_type,
            boost.scope_ids.len(),
            boost.scope_type
        );
        wallet::debit(
            conn,
            &boost.vendor_id,
            boost.price,
            ReferenceType::Boost,
            boost.id.as_str(),
            &description,
            now,
        )
        .await?;
        Ok(())
    }

    async fn check_conflicts(
        &self,
        conn: &mut SqliteConnection,
        boost: &Boost,
        exclude: Option<&BoostId>,
    ) -> Result<(), AppError> {
        let candidates = boosts::find_conflicting(
            conn,
            &boost.vendor_id,
            boost.boost_type,
            boost.scope_type,
            &boost.scope_ids,
            exclude,
        )
        .await?;

        if let Some(hit) = candidates
            .iter()
            .find(|c| windows_overlap(boost.start_ms, boost.end_ms, c.start_ms, c.end_ms))
        {
            return Err(AppError::Conflict(format!(
                "scope already boosted by {} in an overlapping window",
                hit.id
            )));
        }
        Ok(())
    }

    async fn resolve_price(
        &self,
        supplied: Option<Decimal>,
        boost_type: BoostType,
        duration: &BoostDuration,
    ) -> Result<Decimal, AppError> {
        match supplied {
            Some(price) => {
                if price.is_negative() {
                    return Err(AppError::Validation("price must be >= 0".to_string()));
                }
                Ok(price)
            }
            None => {
                let per_unit = self.catalog.price_per_unit(boost_type).await?;
                Ok(per_unit.times(duration.value))
            }
        }
    }
}

/// Reject empty scope sets and collapse duplicates; order is canonicalized.
fn normalize_scope_ids(scope_ids: Vec<ScopeId>) -> Result<Vec<ScopeId>, AppError> {
    if scope_ids.is_empty() {
        return Err(AppError::Validation(
            "scope_ids must not be empty".to_string(),
        ));
    }
    let mut ids = scope_ids;
    ids.sort();
    ids.dedup();
    Ok(ids)
}

fn validate_duration(duration: &BoostDuration) -> Result<(), AppError> {
    if duration.value < 1 {
        return Err(AppError::Validation(
            "duration value must be >= 1".to_string(),
        ));
    }
    Ok(())
}

fn parse_start(start_date: &str) -> Result<TimeMs, AppError> {
    parse_start_date(start_date).ok_or_else(|| {
        AppError::Validation(format!("start_date {:?} is not a valid date", start_date))
    })
}
