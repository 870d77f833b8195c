//! Wallet ledger persistence.
//!
//! Entries are append-only; the cached account balance is updated in the
//! same transaction that writes the entry, so it can never drift from the
//! ledger fold while the database is consistent.

use crate::db::Repository;
use crate::domain::{Decimal, ReferenceType, TimeMs, VendorId, WalletAccount, WalletTransaction};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("balance {balance} is insufficient for a debit of {amount}")]
    InsufficientFunds { balance: Decimal, amount: Decimal },
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

fn transaction_from_row(row: &SqliteRow) -> WalletTransaction {
    let reference_type: String = row.get("reference_type");
    let amount: String = row.get("amount");
    let balance_after: String = row.get("balance_after");

    WalletTransaction {
        id: row.get("id"),
        vendor_id: VendorId::new(row.get("vendor_id")),
        reference_type: ReferenceType::from_str(&reference_type)
            .unwrap_or(ReferenceType::Adjustment),
        reference_id: row.get("reference_id"),
        amount: Decimal::from_str(&amount).unwrap_or_default(),
        balance_after: Decimal::from_str(&balance_after).unwrap_or_default(),
        description: row.get("description"),
        created_at_ms: TimeMs::new(row.get("created_at_ms")),
    }
}

/// Append one signed ledger entry for a vendor and refresh the cached
/// balance. The account row is created lazily on the first write.
///
/// Rejects entries that would take the balance negative. Must run inside a
/// write transaction so that `balance_after` ordering is never ambiguous.
pub async fn post_entry(
    conn: &mut SqliteConnection,
    vendor_id: &VendorId,
    amount: Decimal,
    reference_type: ReferenceType,
    reference_id: &str,
    description: &str,
    now: TimeMs,
) -> Result<WalletTransaction, LedgerError> {
    let account = sqlx::query("SELECT balance FROM wallet_accounts WHERE vendor_id = ?")
        .bind(vendor_id.as_str())
        .fetch_optional(&mut *conn)
        .await?;

    let balance = match &account {
        Some(row) => {
            let raw: String = row.get("balance");
            Decimal::from_str(&raw).unwrap_or_default()
        }
        None => Decimal::zero(),
    };

    let balance_after = balance + amount;
    if balance_after.is_negative() {
        return Err(LedgerError::InsufficientFunds {
            balance,
            amount: -amount,
        });
    }

    let result = sqlx::query(
        r#"
        INSERT INTO wallet_transactions (
            vendor_id, reference_type, reference_id, amount,
            balance_after, description, created_at_ms
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(vendor_id.as_str())
    .bind(reference_type.as_str())
    .bind(reference_id)
    .bind(amount.to_canonical_string())
    .bind(balance_after.to_canonical_string())
    .bind(description)
    .bind(now.as_ms())
    .execute(&mut *conn)
    .await?;

    if account.is_some() {
        sqlx::query("UPDATE wallet_accounts SET balance = ?, updated_at_ms = ? WHERE vendor_id = ?")
            .bind(balance_after.to_canonical_string())
            .bind(now.as_ms())
            .bind(vendor_id.as_str())
            .execute(&mut *conn)
            .await?;
    } else {
        sqlx::query(
            "INSERT INTO wallet_accounts (vendor_id, balance, created_at_ms, updated_at_ms) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(vendor_id.as_str())
        .bind(balance_after.to_canonical_string())
        .bind(now.as_ms())
        .bind(now.as_ms())
        .execute(&mut *conn)
        .await?;
    }

    Ok(WalletTransaction {
        id: result.last_insert_rowid(),
        vendor_id: vendor_id.clone(),
        reference_type,
        reference_id: reference_id.to_string(),
        amount,
        balance_after,
        description: description.to_string(),
        created_at_ms: now,
    })
}

/// Charge a vendor: appends a negative entry for `amount`.
pub async fn debit(
    conn: &mut SqliteConnection,
    vendor_id: &VendorId,
    amount: Decimal,
    reference_type: ReferenceType,
    reference_id: &str,
    description: &str,
    now: TimeMs,
) -> Result<WalletTransaction, LedgerError> {
    post_entry(
        conn,
        vendor_id,
        -amount,
        reference_type,
        reference_id,
        description,
        now,
    )
    .await
}

/// Fund a vendor: appends a positive entry for `amount`. Corrections are
/// written through here as compensating entries, never as edits.
pub async fn credit(
    conn: &mut SqliteConnection,
    vendor_id: &VendorId,
    amount: Decimal,
    reference_type: ReferenceType,
    reference_id: &str,
    description: &str,
    now: TimeMs,
) -> Result<WalletTransaction, LedgerError> {
    post_entry(
        conn,
        vendor_id,
        amount,
        reference_type,
        reference_id,
        description,
        now,
    )
    .await
}

impl Repository {
    /// Cached balance for a vendor; zero when no account exists yet.
    pub async fn balance_of(&self, vendor_id: &VendorId) -> Result<Decimal, sqlx::Error> {
        let row = sqlx::query("SELECT balance FROM wallet_accounts WHERE vendor_id = ?")
            .bind(vendor_id.as_str())
            .fetch_optional(self.pool())
            .await?;
        Ok(match row {
            Some(row) => {
                let raw: String = row.get("balance");
                Decimal::from_str(&raw).unwrap_or_default()
            }
            None => Decimal::zero(),
        })
    }

    pub async fn get_wallet_account(
        &self,
        vendor_id: &VendorId,
    ) -> Result<Option<WalletAccount>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT vendor_id, balance, created_at_ms, updated_at_ms \
             FROM wallet_accounts WHERE vendor_id = ?",
        )
        .bind(vendor_id.as_str())
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(|row| {
            let balance: String = row.get("balance");
            WalletAccount {
                vendor_id: VendorId::new(row.get("vendor_id")),
                balance: Decimal::from_str(&balance).unwrap_or_default(),
                created_at_ms: TimeMs::new(row.get("created_at_ms")),
                updated_at_ms: TimeMs::new(row.get("updated_at_ms")),
            }
        }))
    }

    /// A vendor's ledger entries, oldest first. The ordering makes the chain
    /// invariant directly checkable by callers.
    pub async fn list_wallet_transactions(
        &self,
        vendor_id: &VendorId,
    ) -> Result<Vec<WalletTransaction>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT id, vendor_id, reference_type, reference_id, amount, \
                    balance_after, description, created_at_ms \
             FROM wallet_transactions WHERE vendor_id = ? ORDER BY id ASC",
        )
        .bind(vendor_id.as_str())
        .fetch_all(self.pool())
        .await?;

        Ok(rows.iter().map(transaction_from_row).collect())
    }
}
