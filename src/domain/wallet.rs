//! Wallet types: the per-vendor account and the append-only transaction log.
//!
//! The ledger is the source of financial truth. The account's cached balance
//! is a convenience that must always equal the fold of the vendor's entries
//! and the newest entry's `balance_after`.

use crate::domain::{Decimal, TimeMs, VendorId};
use serde::{Deserialize, Serialize};

/// One balance per vendor, created lazily on the first ledger write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletAccount {
    pub vendor_id: VendorId,
    pub balance: Decimal,
    pub created_at_ms: TimeMs,
    pub updated_at_ms: TimeMs,
}

/// What a ledger entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    Boost,
    Topup,
    Adjustment,
}

impl ReferenceType {
    pub fn as_str(&self) -> &str {
        match self {
            ReferenceType::Boost => "boost",
            ReferenceType::Topup => "topup",
            ReferenceType::Adjustment => "adjustment",
        }
    }
}

impl std::str::FromStr for ReferenceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boost" => Ok(ReferenceType::Boost),
            "topup" => Ok(ReferenceType::Topup),
            "adjustment" => Ok(ReferenceType::Adjustment),
            other => Err(format!("unknown reference type: {}", other)),
        }
    }
}

/// Immutable append-only ledger entry. Never updated or deleted; corrections
/// are written as compensating entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTransaction {
    /// Monotonic per-database sequence; the newest entry for a vendor is the
    /// one with the largest id.
    pub id: i64,
    pub vendor_id: VendorId,
    pub reference_type: ReferenceType,
    pub reference_id: String,
    /// Signed amount: debits are negative, credits positive.
    pub amount: Decimal,
    /// Running balance after applying `amount`.
    pub balance_after: Decimal,
    pub description: String,
    pub created_at_ms: TimeMs,
}

/// Fold a vendor's entries into a balance, oldest first.
pub fn fold_balance(entries: &[WalletTransaction]) -> Decimal {
    entries
        .iter()
        .fold(Decimal::zero(), |acc, tx| acc + tx.amount)
}

/// Check the chain invariant: each entry's `balance_after` equals the
/// previous entry's `balance_after` (0 if none) plus its `amount`.
/// Entries must be ordered oldest first.
pub fn chain_is_consistent(entries: &[WalletTransaction]) -> bool {
    let mut running = Decimal::zero();
    for tx in entries {
        running = running + tx.amount;
        if tx.balance_after != running {
            return false;
        }
    }
    true
}
