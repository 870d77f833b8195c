//! Pricing catalog: an external collaborator from the core's point of view.
//!
//! The admission controller only ever asks it one question: the price per
//! duration unit for a boost type. The production implementation reads the
//! pricing table; the fixed implementation serves tests.

use crate::db::Repository;
use crate::domain::{BoostType, Decimal};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no price configured for boost type {0}")]
    Missing(BoostType),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Read-only price lookup, injected into the admission controller.
#[async_trait]
pub trait PricingCatalog: Send + Sync {
    async fn price_per_unit(&self, boost_type: BoostType) -> Result<Decimal, CatalogError>;
}

/// Catalog backed by the `boost_prices` table.
pub struct SqlitePricingCatalog {
    repo: Arc<Repository>,
}

impl SqlitePricingCatalog {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl PricingCatalog for SqlitePricingCatalog {
    async fn price_per_unit(&self, boost_type: BoostType) -> Result<Decimal, CatalogError> {
        self.repo
            .price_per_unit(boost_type)
            .await?
            .ok_or(CatalogError::Missing(boost_type))
    }
}

/// In-memory catalog with fixed prices, for tests.
#[derive(Default)]
pub struct FixedPricingCatalog {
    prices: HashMap<BoostType, Decimal>,
}

impl FixedPricingCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, boost_type: BoostType, price: Decimal) -> Self {
        self.prices.insert(boost_type, price);
        self
    }
}

#[async_trait]
impl PricingCatalog for FixedPricingCatalog {
    async fn price_per_unit(&self, boost_type: BoostType) -> Result<Decimal, CatalogError> {
        self.prices
            .get(&boost_type)
            .copied()
            .ok_or(CatalogError::Missing(boost_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::init_db;
    use crate::domain::TimeMs;
    use std::str::FromStr;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fixed_catalog_serves_configured_price() {
        let catalog = FixedPricingCatalog::new()
            .with_price(BoostType::Featured, Decimal::from_str("5").unwrap());

        let price = catalog.price_per_unit(BoostType::Featured).await.unwrap();
        assert_eq!(price, Decimal::from_str("5").unwrap());

        let missing = catalog.price_per_unit(BoostType::Highlight).await;
        assert!(matches!(missing, Err(CatalogError::Missing(_))));
    }

    #[tokio::test]
    async fn test_sqlite_catalog_reads_seeded_table() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        let repo = Arc::new(Repository::new(pool));
        repo.seed_default_prices(TimeMs::new(0)).await.unwrap();

        let catalog = SqlitePricingCatalog::new(repo);
        let price = catalog.price_per_unit(BoostType::TopOfList).await.unwrap();
        assert_eq!(price, Decimal::zero());
    }
}
