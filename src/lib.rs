pub mod api;
pub mod catalog;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;

pub use catalog::{FixedPricingCatalog, PricingCatalog, SqlitePricingCatalog};
pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{
    Boost, BoostDuration, BoostId, BoostPatch, BoostStatus, BoostType, Decimal, DurationUnit,
    NewBoost, Role, ScopeId, ScopeType, TimeMs, VendorId, WalletAccount, WalletTransaction,
};
pub use engine::{AdmissionController, LifecycleEngine, SweepDriver, WalletLedger};
pub use error::AppError;
