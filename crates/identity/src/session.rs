//! Session resolution: determine the current dashboard user.
//!
//! The resolver settles once, after a fixed delay, by scanning the
//! injected roster for its admin record. There is no I/O and no failure
//! path; a roster without an admin simply settles with no current user.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use tradewinds_core::Role;

use crate::models::UserRecord;
use crate::roster::Roster;

/// Read-only view of session resolution.
///
/// Created as `{current_user: None, loading: true}` and transitions
/// exactly once to the settled state.
#[derive(Debug, Clone)]
pub struct SessionState {
    current_user: Option<UserRecord>,
    loading: bool,
}

impl SessionState {
    const fn pending() -> Self {
        Self {
            current_user: None,
            loading: true,
        }
    }

    /// The resolved user, once settled.
    #[must_use]
    pub const fn current_user(&self) -> Option<&UserRecord> {
        self.current_user.as_ref()
    }

    /// Whether the current user holds the admin role.
    ///
    /// Always derived from [`Self::current_user`]; there is no stored
    /// flag that could drift from it.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current_user
            .as_ref()
            .is_some_and(|user| user.role == Role::Admin)
    }

    /// Whether resolution is still pending.
    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }
}

/// One-shot asynchronous resolution of the current user.
///
/// Spawned onto the Tokio runtime; consumers observe progress through
/// [`SessionResolver::state`], [`SessionResolver::subscribe`], or
/// [`SessionResolver::settled`]. Dropping the resolver before the delay
/// elapses cancels the pending resolution, so no state mutation is
/// observable after teardown.
pub struct SessionResolver {
    rx: watch::Receiver<SessionState>,
    task: JoinHandle<()>,
}

impl SessionResolver {
    /// Start resolving against `roster`, settling after `delay`.
    #[must_use]
    pub fn spawn(roster: Roster, delay: Duration) -> Self {
        let (tx, rx) = watch::channel(SessionState::pending());

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let current_user = roster.first_with_role(Role::Admin).cloned();
            debug!(
                resolved = current_user.is_some(),
                roster_size = roster.len(),
                "session resolution settled"
            );

            // Receivers may all be gone; the settle itself is still valid.
            let _ = tx.send(SessionState {
                current_user,
                loading: false,
            });
        });

        Self { rx, task }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.rx.borrow().clone()
    }

    /// Subscribe to state changes.
    ///
    /// The receiver keeps observing the last published state after the
    /// resolver is dropped, but will see no further changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.rx.clone()
    }

    /// Wait until resolution has settled and return the settled state.
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.rx.clone();
        match rx.wait_for(|state| !state.loading()).await {
            Ok(state) => state.clone(),
            // Sender gone without settling; report what we have.
            Err(_) => self.rx.borrow().clone(),
        }
    }
}

impl Drop for SessionResolver {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::roster::Roster;
    use tradewinds_core::Role;

    const DELAY: Duration = Duration::from_millis(1000);

    fn roster_without_admin() -> Roster {
        let records = Roster::seeded()
            .iter()
            .filter(|u| u.role != Role::Admin)
            .cloned()
            .collect();
        Roster::new(records)
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_immediately_after_activation() {
        let resolver = SessionResolver::spawn(Roster::seeded(), DELAY);
        let state = resolver.state();
        assert!(state.loading());
        assert!(state.current_user().is_none());
        assert!(!state.is_admin());
    }

    #[tokio::test(start_paused = true)]
    async fn test_settles_on_first_admin_after_delay() {
        let resolver = SessionResolver::spawn(Roster::seeded(), DELAY);
        let state = resolver.settled().await;

        assert!(!state.loading());
        let user = state.current_user().unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.email.as_str(), "david.kim@example.com");
        assert!(state.is_admin());
    }

    #[tokio::test(start_paused = true)]
    async fn test_settles_absent_for_roster_without_admin() {
        let resolver = SessionResolver::spawn(roster_without_admin(), DELAY);
        let state = resolver.settled().await;

        assert!(!state.loading());
        assert!(state.current_user().is_none());
        assert!(!state.is_admin());
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_settled_before_delay_elapses() {
        let resolver = SessionResolver::spawn(Roster::seeded(), DELAY);
        tokio::time::advance(DELAY - Duration::from_millis(1)).await;
        assert!(resolver.state().loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_settles_exactly_once() {
        let resolver = SessionResolver::spawn(Roster::seeded(), DELAY);
        let mut rx = resolver.subscribe();

        rx.changed().await.unwrap();
        assert!(!rx.borrow().loading());

        // The sender is dropped once settled, so no further change can
        // ever be observed.
        assert!(rx.has_changed().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_before_delay_cancels_resolution() {
        let resolver = SessionResolver::spawn(Roster::seeded(), DELAY);
        let rx = resolver.subscribe();
        drop(resolver);

        tokio::time::advance(DELAY * 2).await;
        // Yield so an (incorrectly) surviving task would get a chance to
        // run before we assert.
        tokio::task::yield_now().await;

        assert!(rx.borrow().loading());
        assert!(rx.borrow().current_user().is_none());
    }
}
