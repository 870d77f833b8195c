//! Domain types for the boost admission and wallet subsystem.
//!
//! This module provides:
//! - Lossless money handling via the Decimal wrapper
//! - Domain primitives: TimeMs, VendorId, BoostId, ScopeId, Role
//! - Boost record, status vocabulary, and admission request/patch shapes
//! - Wallet account and append-only ledger entry types

pub mod boost;
pub mod decimal;
pub mod primitives;
pub mod wallet;

pub use boost::{
    parse_start_date, Boost, BoostDuration, BoostPatch, BoostStatus, BoostType, DurationUnit,
    NewBoost, ScopeType,
};
pub use decimal::Decimal;
pub use primitives::{BoostId, Role, ScopeId, TimeMs, VendorId};
pub use wallet::{
    chain_is_consistent, fold_balance, ReferenceType, WalletAccount, WalletTransaction,
};
