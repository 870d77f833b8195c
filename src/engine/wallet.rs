//! Wallet ledger operations that stand on their own, outside the admission
//! transaction: vendor top-ups and balance statements.

use crate::db::repo::wallet;
use crate::db::Repository;
use crate::domain::{Decimal, ReferenceType, TimeMs, VendorId, WalletTransaction};
use crate::error::AppError;
use std::sync::Arc;

pub struct WalletLedger {
    repo: Arc<Repository>,
}

impl WalletLedger {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// Credit a vendor's wallet. This is the funding path that makes the
    /// non-negative-balance rule workable; corrections use it too, as
    /// compensating entries.
    pub async fn topup(
        &self,
        vendor_id: &VendorId,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<WalletTransaction, AppError> {
        if amount.is_zero() || amount.is_negative() {
            return Err(AppError::Validation(
                "top-up amount must be > 0".to_string(),
            ));
        }

        let now = TimeMs::now();
        let reference_id = uuid::Uuid::new_v4().to_string();
        let mut conn = self.repo.begin_immediate().await?;
        let result = wallet::credit(
            &mut conn,
            vendor_id,
            amount,
            ReferenceType::Topup,
            &reference_id,
            description.as_deref().unwrap_or("wallet top-up"),
            now,
        )
        .await;

        match result {
            Ok(tx) => {
                Repository::commit(conn).await?;
                tracing::info!(vendor = %vendor_id, amount = %amount, "wallet topped up");
                Ok(tx)
            }
            Err(e) => {
                Repository::rollback(conn).await;
                Err(e.into())
            }
        }
    }

    /// Current balance plus the full ledger, oldest entry first.
    pub async fn statement(
        &self,
        vendor_id: &VendorId,
    ) -> Result<(Decimal, Vec<WalletTransaction>), AppError> {
        let balance = self.repo.balance_of(vendor_id).await?;
        let transactions = self.repo.list_wallet_transactions(vendor_id).await?;
        Ok((balance, transactions))
    }
}
