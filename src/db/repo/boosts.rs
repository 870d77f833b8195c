//! Boost persistence: admission writes, conflict scanning, status updates.

use crate::db::Repository;
use crate::domain::{
    Boost, BoostDuration, BoostId, BoostStatus, BoostType, Decimal, DurationUnit, ScopeId,
    ScopeType, TimeMs, VendorId,
};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;
use std::str::FromStr;

const BOOST_COLUMNS: &str = "id, vendor_id, boost_type, scope_type, start_ms, end_ms, \
     duration_value, duration_unit, price, priority, status, is_deleted, admin_flagged, \
     created_at_ms, updated_at_ms";

/// A stored boost that matched the conflict scan's vendor/type/scope filter.
/// The time-window predicate is applied to these by the admission controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictCandidate {
    pub id: BoostId,
    pub start_ms: TimeMs,
    pub end_ms: TimeMs,
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn boost_from_row(row: &SqliteRow, scope_ids: Vec<ScopeId>) -> Boost {
    let boost_type: String = row.get("boost_type");
    let scope_type: String = row.get("scope_type");
    let duration_unit: String = row.get("duration_unit");
    let price: String = row.get("price");
    let status: String = row.get("status");

    Boost {
        id: BoostId::new(row.get("id")),
        vendor_id: VendorId::new(row.get("vendor_id")),
        boost_type: BoostType::from_str(&boost_type).unwrap_or(BoostType::Featured),
        scope_type: ScopeType::from_str(&scope_type).unwrap_or(ScopeType::Product),
        scope_ids,
        start_ms: TimeMs::new(row.get("start_ms")),
        end_ms: TimeMs::new(row.get("end_ms")),
        duration: BoostDuration {
            value: row.get("duration_value"),
            unit: DurationUnit::from_str(&duration_unit).unwrap_or(DurationUnit::Day),
        },
        price: Decimal::from_str(&price).unwrap_or_default(),
        priority: row.get("priority"),
        status: BoostStatus::from_str(&status).unwrap_or(BoostStatus::Draft),
        is_deleted: row.get::<i64, _>("is_deleted") != 0,
        admin_flagged: row.get::<i64, _>("admin_flagged") != 0,
        created_at_ms: TimeMs::new(row.get("created_at_ms")),
        updated_at_ms: TimeMs::new(row.get("updated_at_ms")),
    }
}

async fn load_scope_ids(
    conn: &mut SqliteConnection,
    boost_id: &BoostId,
) -> Result<Vec<ScopeId>, sqlx::Error> {
    let rows = sqlx::query("SELECT scope_id FROM boost_scopes WHERE boost_id = ? ORDER BY scope_id")
        .bind(boost_id.as_str())
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows
        .iter()
        .map(|r| ScopeId::new(r.get("scope_id")))
        .collect())
}

/// Insert a freshly admitted boost and its scope rows.
///
/// Must run inside the admission transaction.
pub async fn insert_boost(conn: &mut SqliteConnection, boost: &Boost) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO boosts (
            id, vendor_id, boost_type, scope_type, start_ms, end_ms,
            duration_value, duration_unit, price, priority, status,
            is_deleted, admin_flagged, created_at_ms, updated_at_ms
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(boost.id.as_str())
    .bind(boost.vendor_id.as_str())
    .bind(boost.boost_type.as_str())
    .bind(boost.scope_type.as_str())
    .bind(boost.start_ms.as_ms())
    .bind(boost.end_ms.as_ms())
    .bind(boost.duration.value)
    .bind(boost.duration.unit.as_str())
    .bind(boost.price.to_canonical_string())
    .bind(boost.priority)
    .bind(boost.status.as_str())
    .bind(boost.is_deleted as i64)
    .bind(boost.admin_flagged as i64)
    .bind(boost.created_at_ms.as_ms())
    .bind(boost.updated_at_ms.as_ms())
    .execute(&mut *conn)
    .await?;

    for scope_id in &boost.scope_ids {
        sqlx::query("INSERT INTO boost_scopes (boost_id, scope_id) VALUES (?, ?)")
            .bind(boost.id.as_str())
            .bind(scope_id.as_str())
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// Rewrite an existing boost's mutable fields and replace its scope rows.
///
/// Must run inside the admission transaction.
pub async fn update_boost(conn: &mut SqliteConnection, boost: &Boost) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE boosts SET
            boost_type = ?, scope_type = ?, start_ms = ?, end_ms = ?,
            duration_value = ?, duration_unit = ?, status = ?, updated_at_ms = ?
        WHERE id = ? AND vendor_id = ?
        "#,
    )
    .bind(boost.boost_type.as_str())
    .bind(boost.scope_type.as_str())
    .bind(boost.start_ms.as_ms())
    .bind(boost.end_ms.as_ms())
    .bind(boost.duration.value)
    .bind(boost.duration.unit.as_str())
    .bind(boost.status.as_str())
    .bind(boost.updated_at_ms.as_ms())
    .bind(boost.id.as_str())
    .bind(boost.vendor_id.as_str())
    .execute(&mut *conn)
    .await?;

    sqlx::query("DELETE FROM boost_scopes WHERE boost_id = ?")
        .bind(boost.id.as_str())
        .execute(&mut *conn)
        .await?;
    for scope_id in &boost.scope_ids {
        sqlx::query("INSERT INTO boost_scopes (boost_id, scope_id) VALUES (?, ?)")
            .bind(boost.id.as_str())
            .bind(scope_id.as_str())
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// Scan for stored boosts that could conflict with a candidate: same vendor,
/// same boost type, same scope type, at least one shared scope id, status in
/// {scheduled, active}, not soft-deleted. `exclude` drops the boost being
/// updated from the scan.
pub async fn find_conflicting(
    conn: &mut SqliteConnection,
    vendor_id: &VendorId,
    boost_type: BoostType,
    scope_type: ScopeType,
    scope_ids: &[ScopeId],
    exclude: Option<&BoostId>,
) -> Result<Vec<ConflictCandidate>, sqlx::Error> {
    if scope_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut sql = format!(
        "SELECT DISTINCT b.id, b.start_ms, b.end_ms \
         FROM boosts b \
         JOIN boost_scopes s ON s.boost_id = b.id \
         WHERE b.vendor_id = ? AND b.boost_type = ? AND b.scope_type = ? \
           AND b.is_deleted = 0 \
           AND b.status IN ('scheduled', 'active') \
           AND s.scope_id IN ({})",
        placeholders(scope_ids.len())
    );
    if exclude.is_some() {
        sql.push_str(" AND b.id != ?");
    }

    let mut query = sqlx::query(&sql)
        .bind(vendor_id.as_str())
        .bind(boost_type.as_str())
        .bind(scope_type.as_str());
    for scope_id in scope_ids {
        query = query.bind(scope_id.as_str());
    }
    if let Some(id) = exclude {
        query = query.bind(id.as_str());
    }

    let rows = query.fetch_all(&mut *conn).await?;
    Ok(rows
        .iter()
        .map(|r| ConflictCandidate {
            id: BoostId::new(r.get("id")),
            start_ms: TimeMs::new(r.get("start_ms")),
            end_ms: TimeMs::new(r.get("end_ms")),
        })
        .collect())
}

/// Fetch a vendor's boost inside an open transaction (update path).
pub async fn get_boost_in_tx(
    conn: &mut SqliteConnection,
    vendor_id: &VendorId,
    boost_id: &BoostId,
) -> Result<Option<Boost>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM boosts WHERE id = ? AND vendor_id = ? AND is_deleted = 0",
        BOOST_COLUMNS
    );
    let row = sqlx::query(&sql)
        .bind(boost_id.as_str())
        .bind(vendor_id.as_str())
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(row) => {
            let scope_ids = load_scope_ids(conn, boost_id).await?;
            Ok(Some(boost_from_row(&row, scope_ids)))
        }
        None => Ok(None),
    }
}

impl Repository {
    /// Fetch a vendor's boost by id. Soft-deleted rows are invisible.
    pub async fn get_boost(
        &self,
        vendor_id: &VendorId,
        boost_id: &BoostId,
    ) -> Result<Option<Boost>, sqlx::Error> {
        let mut conn = self.pool().acquire().await?;
        get_boost_in_tx(&mut conn, vendor_id, boost_id).await
    }

    /// Fetch any boost by id regardless of owner (admin path).
    pub async fn get_boost_by_id(&self, boost_id: &BoostId) -> Result<Option<Boost>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM boosts WHERE id = ? AND is_deleted = 0",
            BOOST_COLUMNS
        );
        let mut conn = self.pool().acquire().await?;
        let row = sqlx::query(&sql)
            .bind(boost_id.as_str())
            .fetch_optional(&mut *conn)
            .await?;

        match row {
            Some(row) => {
                let scope_ids = load_scope_ids(&mut conn, boost_id).await?;
                Ok(Some(boost_from_row(&row, scope_ids)))
            }
            None => Ok(None),
        }
    }

    /// List a vendor's boosts, newest first, optionally filtered by type.
    pub async fn list_boosts(
        &self,
        vendor_id: &VendorId,
        boost_type: Option<BoostType>,
    ) -> Result<Vec<Boost>, sqlx::Error> {
        let (sql, binds_type) = if boost_type.is_some() {
            (
                format!(
                    "SELECT {} FROM boosts \
                     WHERE vendor_id = ? AND boost_type = ? AND is_deleted = 0 \
                     ORDER BY created_at_ms DESC, id DESC",
                    BOOST_COLUMNS
                ),
                true,
            )
        } else {
            (
                format!(
                    "SELECT {} FROM boosts \
                     WHERE vendor_id = ? AND is_deleted = 0 \
                     ORDER BY created_at_ms DESC, id DESC",
                    BOOST_COLUMNS
                ),
                false,
            )
        };

        let mut conn = self.pool().acquire().await?;
        let mut query = sqlx::query(&sql).bind(vendor_id.as_str());
        if binds_type {
            query = query.bind(
                boost_type
                    .as_ref()
                    .expect("binds_type implies type is Some")
                    .as_str(),
            );
        }
        let rows = query.fetch_all(&mut *conn).await?;

        let mut boosts = Vec::with_capacity(rows.len());
        for row in &rows {
            let id = BoostId::new(row.get("id"));
            let scope_ids = load_scope_ids(&mut conn, &id).await?;
            boosts.push(boost_from_row(row, scope_ids));
        }
        Ok(boosts)
    }

    /// List all boosts with the owning vendor's wallet balance (admin view),
    /// newest first.
    pub async fn list_all_boosts(&self) -> Result<Vec<(Boost, Decimal)>, sqlx::Error> {
        let sql = format!(
            "SELECT {}, COALESCE(w.balance, '0') AS wallet_balance \
             FROM boosts b \
             LEFT JOIN wallet_accounts w ON w.vendor_id = b.vendor_id \
             WHERE b.is_deleted = 0 \
             ORDER BY b.created_at_ms DESC, b.id DESC",
            BOOST_COLUMNS
                .split(", ")
                .map(|c| format!("b.{}", c))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut conn = self.pool().acquire().await?;
        let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let id = BoostId::new(row.get("id"));
            let scope_ids = load_scope_ids(&mut conn, &id).await?;
            let balance: String = row.get("wallet_balance");
            out.push((
                boost_from_row(row, scope_ids),
                Decimal::from_str(&balance).unwrap_or_default(),
            ));
        }
        Ok(out)
    }

    /// Stop a boost that is currently active. The status guard makes this a
    /// compare-and-swap: it returns false when the boost does not exist, is
    /// not owned by the vendor, or is not exactly `active`.
    pub async fn stop_active_boost(
        &self,
        vendor_id: &VendorId,
        boost_id: &BoostId,
        now: TimeMs,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE boosts SET status = 'stopped', end_ms = ?, updated_at_ms = ? \
             WHERE id = ? AND vendor_id = ? AND status = 'active' AND is_deleted = 0",
        )
        .bind(now.as_ms())
        .bind(now.as_ms())
        .bind(boost_id.as_str())
        .bind(vendor_id.as_str())
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete a boost. Guarded on the deletable statuses so a racing
    /// activation cannot be deleted from under the vendor.
    pub async fn soft_delete_boost(
        &self,
        vendor_id: &VendorId,
        boost_id: &BoostId,
        now: TimeMs,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE boosts SET is_deleted = 1, updated_at_ms = ? \
             WHERE id = ? AND vendor_id = ? AND status IN ('draft', 'expired') \
               AND is_deleted = 0",
        )
        .bind(now.as_ms())
        .bind(boost_id.as_str())
        .bind(vendor_id.as_str())
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Force a status, bypassing transition rules (admin override).
    /// Flags the row for audit. `end_override` rewrites the window end
    /// (used when forcing `stopped`).
    pub async fn force_status(
        &self,
        boost_id: &BoostId,
        target: BoostStatus,
        end_override: Option<TimeMs>,
        now: TimeMs,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE boosts SET status = ?, admin_flagged = 1, \
                 end_ms = COALESCE(?, end_ms), updated_at_ms = ? \
             WHERE id = ? AND is_deleted = 0",
        )
        .bind(target.as_str())
        .bind(end_override.map(|t| t.as_ms()))
        .bind(now.as_ms())
        .bind(boost_id.as_str())
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Promote scheduled boosts whose window has opened. Idempotent: already
    /// active rows no longer match the guard.
    pub async fn activate_due(&self, now: TimeMs) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE boosts SET status = 'active', updated_at_ms = ? \
             WHERE status = 'scheduled' AND start_ms <= ? AND is_deleted = 0",
        )
        .bind(now.as_ms())
        .bind(now.as_ms())
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected())
    }

    /// Expire active boosts whose window has closed. Idempotent.
    pub async fn expire_due(&self, now: TimeMs) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE boosts SET status = 'expired', updated_at_ms = ? \
             WHERE status = 'active' AND end_ms <= ? AND is_deleted = 0",
        )
        .bind(now.as_ms())
        .bind(now.as_ms())
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::init_db;
    use tempfile::TempDir;

    async fn setup() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        (Repository::new(pool), temp_dir)
    }

    fn sample_boost(vendor: &str, scopes: &[&str], status: BoostStatus) -> Boost {
        let duration = BoostDuration {
            value: 7,
            unit: DurationUnit::Day,
        };
        let start = TimeMs::new(1_000_000);
        Boost {
            id: BoostId::generate(),
            vendor_id: VendorId::new(vendor.to_string()),
            boost_type: BoostType::Featured,
            scope_type: ScopeType::Product,
            scope_ids: scopes.iter().map(|s| ScopeId::new(s.to_string())).collect(),
            start_ms: start,
            end_ms: duration.end_from(start),
            duration,
            price: Decimal::from_str("49.99").unwrap(),
            priority: 0,
            status,
            is_deleted: false,
            admin_flagged: false,
            created_at_ms: TimeMs::new(500),
            updated_at_ms: TimeMs::new(500),
        }
    }

    async fn persist(repo: &Repository, boost: &Boost) {
        let mut conn = repo.begin_immediate().await.expect("begin failed");
        insert_boost(&mut conn, boost).await.expect("insert failed");
        Repository::commit(conn).await.expect("commit failed");
    }

    #[tokio::test]
    async fn test_insert_and_get_roundtrip() {
        let (repo, _temp) = setup().await;
        let boost = sample_boost("v-1", &["p-1", "p-2"], BoostStatus::Scheduled);
        persist(&repo, &boost).await;

        let fetched = repo
            .get_boost(&boost.vendor_id, &boost.id)
            .await
            .expect("get failed")
            .expect("boost missing");
        assert_eq!(fetched, boost);
    }

    #[tokio::test]
    async fn test_get_boost_hides_other_vendor() {
        let (repo, _temp) = setup().await;
        let boost = sample_boost("v-1", &["p-1"], BoostStatus::Scheduled);
        persist(&repo, &boost).await;

        let other = VendorId::new("v-2".to_string());
        let fetched = repo.get_boost(&other, &boost.id).await.expect("get failed");
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_conflict_scan_matches_shared_scope() {
        let (repo, _temp) = setup().await;
        let stored = sample_boost("v-1", &["p-1"], BoostStatus::Scheduled);
        persist(&repo, &stored).await;

        let mut conn = repo.begin_immediate().await.unwrap();
        let hits = find_conflicting(
            &mut conn,
            &stored.vendor_id,
            BoostType::Featured,
            ScopeType::Product,
            &[ScopeId::new("p-1".to_string()), ScopeId::new("p-9".to_string())],
            None,
        )
        .await
        .expect("scan failed");
        Repository::rollback(conn).await;

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, stored.id);
    }

    #[tokio::test]
    async fn test_conflict_scan_ignores_disjoint_scope_and_other_type() {
        let (repo, _temp) = setup().await;
        let stored = sample_boost("v-1", &["p-1"], BoostStatus::Active);
        persist(&repo, &stored).await;

        let mut conn = repo.begin_immediate().await.unwrap();
        let disjoint = find_conflicting(
            &mut conn,
            &stored.vendor_id,
            BoostType::Featured,
            ScopeType::Product,
            &[ScopeId::new("p-2".to_string())],
            None,
        )
        .await
        .unwrap();
        let other_type = find_conflicting(
            &mut conn,
            &stored.vendor_id,
            BoostType::Highlight,
            ScopeType::Product,
            &[ScopeId::new("p-1".to_string())],
            None,
        )
        .await
        .unwrap();
        Repository::rollback(conn).await;

        assert!(disjoint.is_empty());
        assert!(other_type.is_empty());
    }

    #[tokio::test]
    async fn test_conflict_scan_ignores_settled_statuses() {
        let (repo, _temp) = setup().await;
        for status in [BoostStatus::Draft, BoostStatus::Expired, BoostStatus::Stopped] {
            persist(&repo, &sample_boost("v-1", &["p-1"], status)).await;
        }

        let mut conn = repo.begin_immediate().await.unwrap();
        let hits = find_conflicting(
            &mut conn,
            &VendorId::new("v-1".to_string()),
            BoostType::Featured,
            ScopeType::Product,
            &[ScopeId::new("p-1".to_string())],
            None,
        )
        .await
        .unwrap();
        Repository::rollback(conn).await;

        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_conflict_scan_excludes_given_id() {
        let (repo, _temp) = setup().await;
        let stored = sample_boost("v-1", &["p-1"], BoostStatus::Scheduled);
        persist(&repo, &stored).await;

        let mut conn = repo.begin_immediate().await.unwrap();
        let hits = find_conflicting(
            &mut conn,
            &stored.vendor_id,
            BoostType::Featured,
            ScopeType::Product,
            &[ScopeId::new("p-1".to_string())],
            Some(&stored.id),
        )
        .await
        .unwrap();
        Repository::rollback(conn).await;

        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_list_boosts_newest_first_with_filter() {
        let (repo, _temp) = setup().await;
        let mut older = sample_boost("v-1", &["p-1"], BoostStatus::Scheduled);
        older.created_at_ms = TimeMs::new(100);
        let mut newer = sample_boost("v-1", &["p-2"], BoostStatus::Scheduled);
        newer.created_at_ms = TimeMs::new(200);
        let mut highlight = sample_boost("v-1", &["p-3"], BoostStatus::Scheduled);
        highlight.boost_type = BoostType::Highlight;
        highlight.created_at_ms = TimeMs::new(300);

        for b in [&older, &newer, &highlight] {
            persist(&repo, b).await;
        }

        let all = repo
            .list_boosts(&older.vendor_id, None)
            .await
            .expect("list failed");
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, highlight.id);
        assert_eq!(all[2].id, older.id);

        let featured = repo
            .list_boosts(&older.vendor_id, Some(BoostType::Featured))
            .await
            .expect("list failed");
        assert_eq!(featured.len(), 2);
        assert_eq!(featured[0].id, newer.id);
    }

    #[tokio::test]
    async fn test_stop_active_boost_cas() {
        let (repo, _temp) = setup().await;
        let active = sample_boost("v-1", &["p-1"], BoostStatus::Active);
        let scheduled = sample_boost("v-1", &["p-2"], BoostStatus::Scheduled);
        persist(&repo, &active).await;
        persist(&repo, &scheduled).await;

        let now = TimeMs::new(2_000_000);
        assert!(repo
            .stop_active_boost(&active.vendor_id, &active.id, now)
            .await
            .unwrap());
        assert!(!repo
            .stop_active_boost(&scheduled.vendor_id, &scheduled.id, now)
            .await
            .unwrap());
        // Second stop finds nothing active.
        assert!(!repo
            .stop_active_boost(&active.vendor_id, &active.id, now)
            .await
            .unwrap());

        let stopped = repo
            .get_boost(&active.vendor_id, &active.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stopped.status, BoostStatus::Stopped);
        assert_eq!(stopped.end_ms, now);
    }

    #[tokio::test]
    async fn test_soft_delete_guarded_by_status() {
        let (repo, _temp) = setup().await;
        let expired = sample_boost("v-1", &["p-1"], BoostStatus::Expired);
        let active = sample_boost("v-1", &["p-2"], BoostStatus::Active);
        persist(&repo, &expired).await;
        persist(&repo, &active).await;

        let now = TimeMs::new(2_000_000);
        assert!(repo
            .soft_delete_boost(&expired.vendor_id, &expired.id, now)
            .await
            .unwrap());
        assert!(!repo
            .soft_delete_boost(&active.vendor_id, &active.id, now)
            .await
            .unwrap());

        // Deleted rows are invisible.
        assert!(repo
            .get_boost(&expired.vendor_id, &expired.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_activate_and_expire_due_idempotent() {
        let (repo, _temp) = setup().await;
        let boost = sample_boost("v-1", &["p-1"], BoostStatus::Scheduled);
        persist(&repo, &boost).await;

        let mid = TimeMs::new(boost.start_ms.as_ms() + 1);
        assert_eq!(repo.activate_due(mid).await.unwrap(), 1);
        assert_eq!(repo.activate_due(mid).await.unwrap(), 0);

        let after_end = TimeMs::new(boost.end_ms.as_ms() + 1);
        assert_eq!(repo.expire_due(after_end).await.unwrap(), 1);
        assert_eq!(repo.expire_due(after_end).await.unwrap(), 0);

        let settled = repo.get_boost(&boost.vendor_id, &boost.id).await.unwrap().unwrap();
        assert_eq!(settled.status, BoostStatus::Expired);
    }

    #[tokio::test]
    async fn test_force_status_flags_row() {
        let (repo, _temp) = setup().await;
        let boost = sample_boost("v-1", &["p-1"], BoostStatus::Scheduled);
        persist(&repo, &boost).await;

        let now = TimeMs::new(2_000_000);
        assert!(repo
            .force_status(&boost.id, BoostStatus::Expired, None, now)
            .await
            .unwrap());

        let forced = repo.get_boost(&boost.vendor_id, &boost.id).await.unwrap().unwrap();
        assert_eq!(forced.status, BoostStatus::Expired);
        assert!(forced.admin_flagged);
        assert_eq!(forced.end_ms, boost.end_ms);
    }
}
