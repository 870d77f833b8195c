//! Boost types: the promotional grant record, its status machine vocabulary,
//! and the request/patch shapes accepted by the admission controller.

use crate::domain::{BoostId, Decimal, ScopeId, TimeMs, VendorId};
use serde::{Deserialize, Serialize};

/// Kind of promotional placement being purchased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostType {
    Featured,
    TopOfList,
    Highlight,
}

impl BoostType {
    /// All boost types, in catalog seeding order.
    pub const ALL: [BoostType; 3] = [BoostType::Featured, BoostType::TopOfList, BoostType::Highlight];

    pub fn as_str(&self) -> &str {
        match self {
            BoostType::Featured => "featured",
            BoostType::TopOfList => "top_of_list",
            BoostType::Highlight => "highlight",
        }
    }
}

impl std::str::FromStr for BoostType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(BoostType::Featured),
            "top_of_list" => Ok(BoostType::TopOfList),
            "highlight" => Ok(BoostType::Highlight),
            other => Err(format!("unknown boost type: {}", other)),
        }
    }
}

impl std::fmt::Display for BoostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the scope ids refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeType {
    Product,
    Category,
}

impl ScopeType {
    pub fn as_str(&self) -> &str {
        match self {
            ScopeType::Product => "product",
            ScopeType::Category => "category",
        }
    }
}

impl std::str::FromStr for ScopeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(ScopeType::Product),
            "category" => Ok(ScopeType::Category),
            other => Err(format!("unknown scope type: {}", other)),
        }
    }
}

impl std::fmt::Display for ScopeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unit of a boost duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Day,
    Hour,
}

impl DurationUnit {
    pub fn as_str(&self) -> &str {
        match self {
            DurationUnit::Day => "day",
            DurationUnit::Hour => "hour",
        }
    }

    fn ms_per_unit(&self) -> i64 {
        match self {
            DurationUnit::Day => 86_400_000,
            DurationUnit::Hour => 3_600_000,
        }
    }
}

impl std::str::FromStr for DurationUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(DurationUnit::Day),
            "hour" => Ok(DurationUnit::Hour),
            other => Err(format!("unknown duration unit: {}", other)),
        }
    }
}

/// Requested length of a boost window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostDuration {
    pub value: i64,
    pub unit: DurationUnit,
}

impl BoostDuration {
    /// Compute the window end for a window starting at `start`.
    ///
    /// Each unit has its own explicit path: days advance by 86 400 000 ms,
    /// hours by 3 600 000 ms.
    pub fn end_from(&self, start: TimeMs) -> TimeMs {
        TimeMs::new(start.as_ms() + self.value * self.unit.ms_per_unit())
    }
}

/// Status of a boost record.
///
/// Vendors create boosts in `scheduled`; the sweep driver moves them to
/// `active` and `expired` on wall-clock time; `stopped` is a manual cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostStatus {
    Draft,
    Scheduled,
    Active,
    Expired,
    Stopped,
}

impl BoostStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BoostStatus::Draft => "draft",
            BoostStatus::Scheduled => "scheduled",
            BoostStatus::Active => "active",
            BoostStatus::Expired => "expired",
            BoostStatus::Stopped => "stopped",
        }
    }

    /// Soft deletion is only legal from draft or expired.
    pub fn is_deletable(&self) -> bool {
        matches!(self, BoostStatus::Draft | BoostStatus::Expired)
    }
}

impl std::str::FromStr for BoostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(BoostStatus::Draft),
            "scheduled" => Ok(BoostStatus::Scheduled),
            "active" => Ok(BoostStatus::Active),
            "expired" => Ok(BoostStatus::Expired),
            "stopped" => Ok(BoostStatus::Stopped),
            other => Err(format!("unknown boost status: {}", other)),
        }
    }
}

impl std::fmt::Display for BoostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One promotional grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boost {
    pub id: BoostId,
    pub vendor_id: VendorId,
    pub boost_type: BoostType,
    pub scope_type: ScopeType,
    pub scope_ids: Vec<ScopeId>,
    /// Window start, epoch milliseconds.
    pub start_ms: TimeMs,
    /// Window end, epoch milliseconds. Always >= start_ms.
    pub end_ms: TimeMs,
    pub duration: BoostDuration,
    /// Price captured at admission time; immutable afterwards.
    pub price: Decimal,
    /// Display tie-break weight. Assigned by the ranking side, not here.
    pub priority: i64,
    pub status: BoostStatus,
    pub is_deleted: bool,
    /// Set when an admin forced a status outside the normal transitions.
    pub admin_flagged: bool,
    pub created_at_ms: TimeMs,
    pub updated_at_ms: TimeMs,
}

/// Admission request for a new boost.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBoost {
    pub boost_type: BoostType,
    pub scope_type: ScopeType,
    pub scope_ids: Vec<ScopeId>,
    pub duration: BoostDuration,
    /// Explicit price; when absent the catalog price is used.
    pub price: Option<Decimal>,
    pub start_date: String,
}

/// Partial update for an existing boost. Only fields present in the request
/// are applied; each goes through the same validation as creation. The price
/// is not patchable: it was captured when the boost was charged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoostPatch {
    pub boost_type: Option<BoostType>,
    pub scope_type: Option<ScopeType>,
    pub scope_ids: Option<Vec<ScopeId>>,
    pub duration: Option<BoostDuration>,
    pub start_date: Option<String>,
}

/// Parse a start date into an instant.
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_start_date(s: &str) -> Option<TimeMs> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(TimeMs::new(dt.timestamp_millis()));
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let dt = date.and_hms_opt(0, 0, 0)?.and_utc();
        return Some(TimeMs::new(dt.timestamp_millis()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_end_from_day_unit() {
        let start = TimeMs::new(1_000);
        let d = BoostDuration {
            value: 7,
            unit: DurationUnit::Day,
        };
        assert_eq!(d.end_from(start).as_ms(), 1_000 + 7 * 86_400_000);
    }

    #[test]
    fn test_end_from_hour_unit() {
        let start = TimeMs::new(1_000);
        let d = BoostDuration {
            value: 36,
            unit: DurationUnit::Hour,
        };
        assert_eq!(d.end_from(start).as_ms(), 1_000 + 36 * 3_600_000);
    }

    #[test]
    fn test_boost_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&BoostType::TopOfList).unwrap(),
            "\"top_of_list\""
        );
        assert_eq!(BoostType::from_str("featured").unwrap(), BoostType::Featured);
        assert!(BoostType::from_str("banner").is_err());
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            BoostStatus::Draft,
            BoostStatus::Scheduled,
            BoostStatus::Active,
            BoostStatus::Expired,
            BoostStatus::Stopped,
        ] {
            assert_eq!(BoostStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_deletable_statuses() {
        assert!(BoostStatus::Draft.is_deletable());
        assert!(BoostStatus::Expired.is_deletable());
        assert!(!BoostStatus::Scheduled.is_deletable());
        assert!(!BoostStatus::Active.is_deletable());
        assert!(!BoostStatus::Stopped.is_deletable());
    }

    #[test]
    fn test_parse_start_date_rfc3339() {
        let t = parse_start_date("2026-03-01T12:30:00Z").unwrap();
        assert_eq!(t.as_ms(), 1_772_368_200_000);
    }

    #[test]
    fn test_parse_start_date_bare_date() {
        let t = parse_start_date("2026-03-01").unwrap();
        assert_eq!(t.as_ms() % 86_400_000, 0);
    }

    #[test]
    fn test_parse_start_date_rejects_garbage() {
        assert!(parse_start_date("next tuesday").is_none());
        assert!(parse_start_date("").is_none());
    }
}
