//! Audit search and aggregation contracts

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Search criteria over the audit trail. All fields are optional and
/// compose with AND semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFilter {
    /// Case-insensitive substring matched against the actor's display
    /// name or email
    pub actor: Option<String>,
    /// Case-insensitive substring matched against the stored action
    pub action: Option<String>,
    /// Exact module match
    pub module: Option<String>,
    /// Events on or after this date (midnight UTC)
    pub from: Option<NaiveDate>,
    /// Events up to and including this date; implemented as strictly
    /// before the following midnight
    pub to: Option<NaiveDate>,
}

impl AuditFilter {
    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.actor.is_none()
            && self.action.is_none()
            && self.module.is_none()
            && self.from.is_none()
            && self.to.is_none()
    }
}

/// One (key, count) aggregation row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBucket {
    /// Grouping key: a module or an action
    pub key: String,
    /// Events in the group
    pub count: u64,
}

/// Aggregate counts rendered by the audit dashboard. Window counts are
/// calendar-based: same date, since the most recent Sunday, since the
/// first of the month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStatistics {
    /// All events ever recorded
    pub total: u64,
    /// Events dated today
    pub today: u64,
    /// Events since the start of the week
    pub this_week: u64,
    /// Events since the first of the month
    pub this_month: u64,
    /// Per-module counts, descending, ties by name
    pub by_module: Vec<CountBucket>,
    /// Per-action counts, descending, ties by name
    pub by_action: Vec<CountBucket>,
}
