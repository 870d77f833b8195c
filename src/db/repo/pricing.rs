//! Pricing table persistence. The catalog itself is read-only to the core;
//! the only write is the zero-default seeding at first boot.

use crate::db::Repository;
use crate::domain::{BoostType, Decimal, TimeMs};
use sqlx::Row;
use std::str::FromStr;

impl Repository {
    /// Seed a zero price for every boost type if the table is empty.
    /// Safe to call on every boot.
    pub async fn seed_default_prices(&self, now: TimeMs) -> Result<(), sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM boost_prices")
            .fetch_one(self.pool())
            .await?;
        if count.0 > 0 {
            return Ok(());
        }

        for boost_type in BoostType::ALL {
            sqlx::query(
                "INSERT INTO boost_prices (boost_type, price_per_unit, updated_at_ms) \
                 VALUES (?, '0', ?) \
                 ON CONFLICT(boost_type) DO NOTHING",
            )
            .bind(boost_type.as_str())
            .bind(now.as_ms())
            .execute(self.pool())
            .await?;
        }

        tracing::info!("seeded default boost prices");
        Ok(())
    }

    /// Catalog price per duration unit for a boost type.
    pub async fn price_per_unit(
        &self,
        boost_type: BoostType,
    ) -> Result<Option<Decimal>, sqlx::Error> {
        let row = sqlx::query("SELECT price_per_unit FROM boost_prices WHERE boost_type = ?")
            .bind(boost_type.as_str())
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(|row| {
            let raw: String = row.get("price_per_unit");
            Decimal::from_str(&raw).unwrap_or_default()
        }))
    }
}
