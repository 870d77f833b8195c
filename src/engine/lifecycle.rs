//! Boost lifecycle transitions outside admission: manual stop, soft delete,
//! and the admin override escape hatch.
//!
//! Vendor-triggered transitions are guarded compare-and-swap updates, so a
//! racing sweep cannot be overwritten: the status precondition is checked by
//! the same statement that applies the change.

use crate::db::Repository;
use crate::domain::{Boost, BoostId, BoostStatus, TimeMs, VendorId};
use crate::error::AppError;
use std::sync::Arc;

pub struct LifecycleEngine {
    repo: Arc<Repository>,
}

impl LifecycleEngine {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// Stop a boost that is currently active. Cuts the window short:
    /// `end_ms` becomes now. Anything not exactly `active` surfaces as
    /// not-found, matching the lookup-by-active-status contract.
    pub async fn stop_boost(
        &self,
        vendor_id: &VendorId,
        boost_id: &BoostId,
    ) -> Result<Boost, AppError> {
        let now = TimeMs::now();
        let stopped = self.repo.stop_active_boost(vendor_id, boost_id, now).await?;
        if !stopped {
            return Err(AppError::NotFound(format!(
                "no active boost {} for vendor {}",
                boost_id, vendor_id
            )));
        }

        tracing::info!(vendor = %vendor_id, boost = %boost_id, "boost stopped");
        self.repo
            .get_boost(vendor_id, boost_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("stopped boost {} vanished", boost_id)))
    }

    /// Soft-delete a boost. Only legal from draft or expired; the record
    /// itself is kept.
    pub async fn delete_boost(
        &self,
        vendor_id: &VendorId,
        boost_id: &BoostId,
    ) -> Result<Boost, AppError> {
        let boost = self
            .repo
            .get_boost(vendor_id, boost_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("no boost {} for vendor {}", boost_id, vendor_id))
            })?;

        if !boost.status.is_deletable() {
            return Err(AppError::Validation(format!(
                "cannot delete a {} boost; only draft or expired boosts may be deleted",
                boost.status
            )));
        }

        let now = TimeMs::now();
        let deleted = self.repo.soft_delete_boost(vendor_id, boost_id, now).await?;
        if !deleted {
            // Lost a race with a status transition since the read above.
            return Err(AppError::Validation(format!(
                "boost {} is no longer deletable",
                boost_id
            )));
        }

        tracing::info!(vendor = %vendor_id, boost = %boost_id, "boost soft-deleted");
        let mut gone = boost;
        gone.is_deleted = true;
        gone.updated_at_ms = now;
        Ok(gone)
    }

    /// Admin override: force a boost to active, expired, or stopped,
    /// bypassing the transition table. Idempotent when the boost already
    /// holds the target status. Flags the row and emits an audit record.
    pub async fn admin_set_status(
        &self,
        admin: &str,
        boost_id: &BoostId,
        target: BoostStatus,
    ) -> Result<Boost, AppError> {
        if !matches!(
            target,
            BoostStatus::Active | BoostStatus::Expired | BoostStatus::Stopped
        ) {
            return Err(AppError::Validation(format!(
                "override target must be active, expired, or stopped, got {}",
                target
            )));
        }

        let boost = self
            .repo
            .get_boost_by_id(boost_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no boost {}", boost_id)))?;

        if boost.status == target {
            return Ok(boost);
        }

        let now = TimeMs::now();
        let end_override = (target == BoostStatus::Stopped).then_some(now);
        let changed = self
            .repo
            .force_status(boost_id, target, end_override, now)
            .await?;
        if !changed {
            return Err(AppError::NotFound(format!("no boost {}", boost_id)));
        }

        tracing::warn!(
            admin = %admin,
            boost = %boost_id,
            from = %boost.status,
            to = %target,
            "admin status override"
        );

        self.repo
            .get_boost_by_id(boost_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("overridden boost {} vanished", boost_id)))
    }
}
