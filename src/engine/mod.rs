//! Business logic engines: admission control, lifecycle transitions, the
//! wallet ledger surface, and the expiry/activation sweep driver.

pub mod admission;
pub mod conflict;
pub mod driver;
pub mod lifecycle;
pub mod wallet;

pub use admission::AdmissionController;
pub use driver::{SweepDriver, SweepStats};
pub use lifecycle::LifecycleEngine;
pub use wallet::WalletLedger;
