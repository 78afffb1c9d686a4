//! User domain types.
//!
//! These types represent the immutable roster records identity resolution
//! works with. No create/update/delete operations exist in this crate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tradewinds_core::{AccountStatus, Email, Role, UserId};

/// A dashboard user (domain type).
///
/// Roster records are statically seeded and immutable; resolution only
/// ever reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address (unique within a roster).
    pub email: Email,
    /// Dashboard role.
    pub role: Role,
    /// Account standing.
    pub status: AccountStatus,
    /// When the account was created.
    pub created_at: NaiveDate,
    /// Most recent day of activity.
    pub last_active: NaiveDate,
    /// Avatar image URL.
    pub avatar: String,
}
