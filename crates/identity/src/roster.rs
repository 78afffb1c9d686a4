//! The roster: the read-only collection of known users.
//!
//! The roster is injected into [`crate::SessionResolver`] by the consumer
//! rather than living as a process-wide singleton, so resolution stays
//! testable against arbitrary rosters.

use chrono::NaiveDate;

use tradewinds_core::{AccountStatus, Email, Role, UserId};

use crate::models::UserRecord;

/// An insertion-ordered, read-only collection of [`UserRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    records: Vec<UserRecord>,
}

impl Roster {
    /// Create a roster from a list of records, preserving their order.
    #[must_use]
    pub const fn new(records: Vec<UserRecord>) -> Self {
        Self { records }
    }

    /// The sample roster the dashboard ships with.
    ///
    /// Contains exactly one record with [`Role::Admin`].
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(vec![
            seed_user(
                1,
                "Sarah Johnson",
                "sarah.johnson@example.com",
                Role::Manager,
                AccountStatus::Active,
                date(2022, 11, 3),
                date(2024, 1, 12),
            ),
            seed_user(
                2,
                "David Kim",
                "david.kim@example.com",
                Role::Admin,
                AccountStatus::Active,
                date(2022, 8, 19),
                date(2024, 1, 14),
            ),
            seed_user(
                3,
                "Mike Chen",
                "mike.chen@example.com",
                Role::Editor,
                AccountStatus::Active,
                date(2023, 3, 22),
                date(2024, 1, 10),
            ),
            seed_user(
                4,
                "Emma Wilson",
                "emma.wilson@example.com",
                Role::Viewer,
                AccountStatus::Pending,
                date(2023, 9, 7),
                date(2023, 12, 28),
            ),
            seed_user(
                5,
                "Lisa Anderson",
                "lisa.anderson@example.com",
                Role::Editor,
                AccountStatus::Suspended,
                date(2023, 5, 30),
                date(2023, 11, 2),
            ),
        ])
    }

    /// Iterate over the records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &UserRecord> {
        self.records.iter()
    }

    /// The first record with the given role, in insertion order.
    ///
    /// Returns `None` when no record matches.
    #[must_use]
    pub fn first_with_role(&self, role: Role) -> Option<&UserRecord> {
        self.records.iter().find(|record| record.role == role)
    }

    /// Number of records in the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the roster has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<UserRecord>> for Roster {
    fn from(records: Vec<UserRecord>) -> Self {
        Self::new(records)
    }
}

fn seed_user(
    id: i64,
    name: &str,
    email: &str,
    role: Role,
    status: AccountStatus,
    created_at: NaiveDate,
    last_active: NaiveDate,
) -> UserRecord {
    UserRecord {
        id: UserId::new(id),
        name: name.to_string(),
        email: Email::parse(email).expect("seed email is valid"),
        role,
        status,
        created_at,
        last_active,
        avatar: format!("https://i.pravatar.cc/150?img={id}"),
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("seed date is valid")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_roster_has_exactly_one_admin() {
        let roster = Roster::seeded();
        let admins = roster.iter().filter(|u| u.role == Role::Admin).count();
        assert_eq!(admins, 1);
    }

    #[test]
    fn test_seeded_roster_emails_are_unique() {
        let roster = Roster::seeded();
        let mut emails: Vec<_> = roster.iter().map(|u| u.email.as_str()).collect();
        emails.sort_unstable();
        emails.dedup();
        assert_eq!(emails.len(), roster.len());
    }

    #[test]
    fn test_first_with_role_respects_insertion_order() {
        let roster = Roster::seeded();
        // Two editors are seeded; the scan must pick the earlier one.
        let editor = roster.first_with_role(Role::Editor).unwrap();
        assert_eq!(editor.name, "Mike Chen");
    }

    #[test]
    fn test_first_with_role_none_when_absent() {
        let viewers_only: Vec<UserRecord> = Roster::seeded()
            .iter()
            .filter(|u| u.role == Role::Viewer)
            .cloned()
            .collect();
        let roster = Roster::new(viewers_only);
        assert!(roster.first_with_role(Role::Admin).is_none());
    }

    #[test]
    fn test_empty_roster() {
        let roster = Roster::new(Vec::new());
        assert!(roster.is_empty());
        assert_eq!(roster.len(), 0);
        assert!(roster.first_with_role(Role::Admin).is_none());
    }
}
