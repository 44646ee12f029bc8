//! Per-account installation state machine.
//!
//! Replaces ad-hoc "seen" sets with an explicit tracker: each account is in
//! exactly one of `NotStarted`, `InProgress`, or `Done`, and the transition
//! out of `NotStarted` is atomic, so two concurrent callers can never both
//! start an installation for the same account.

use std::collections::HashMap;
use std::sync::Mutex;

/// Installation state for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallState {
    #[default]
    NotStarted,
    InProgress,
    Done,
}

/// Outcome of attempting to begin an installation.
#[derive(Debug, PartialEq, Eq)]
pub enum BeginOutcome {
    /// This caller owns the installation; it must call `finish`.
    Started,
    /// Another caller is mid-installation.
    Busy,
    /// A previous installation already completed.
    AlreadyDone,
}

/// Tracks installation state per account id.
#[derive(Debug, Default)]
pub struct InstallTracker {
    states: Mutex<HashMap<String, InstallState>>,
}

impl InstallTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim the installation for an account.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn begin(&self, account_id: &str) -> BeginOutcome {
        let mut states = self.states.lock().expect("tracker lock poisoned");
        match states.get(account_id).copied().unwrap_or_default() {
            InstallState::Done => BeginOutcome::AlreadyDone,
            InstallState::InProgress => BeginOutcome::Busy,
            InstallState::NotStarted => {
                states.insert(account_id.to_string(), InstallState::InProgress);
                BeginOutcome::Started
            }
        }
    }

    /// Release a claimed installation. Success transitions to `Done`;
    /// failure returns the account to `NotStarted` so it can be retried.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn finish(&self, account_id: &str, success: bool) {
        let mut states = self.states.lock().expect("tracker lock poisoned");
        let state = if success {
            InstallState::Done
        } else {
            InstallState::NotStarted
        };
        states.insert(account_id.to_string(), state);
    }

    /// Current state for an account.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn state(&self, account_id: &str) -> InstallState {
        self.states
            .lock()
            .expect("tracker lock poisoned")
            .get(account_id)
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn second_caller_cannot_also_start() {
        let tracker = InstallTracker::new();
        assert_eq!(tracker.begin("acct-1"), BeginOutcome::Started);
        assert_eq!(tracker.begin("acct-1"), BeginOutcome::Busy);
    }

    #[test]
    fn completed_install_short_circuits() {
        let tracker = InstallTracker::new();
        assert_eq!(tracker.begin("acct-1"), BeginOutcome::Started);
        tracker.finish("acct-1", true);
        assert_eq!(tracker.begin("acct-1"), BeginOutcome::AlreadyDone);
        assert_eq!(tracker.state("acct-1"), InstallState::Done);
    }

    #[test]
    fn failed_install_can_be_retried() {
        let tracker = InstallTracker::new();
        assert_eq!(tracker.begin("acct-1"), BeginOutcome::Started);
        tracker.finish("acct-1", false);
        assert_eq!(tracker.begin("acct-1"), BeginOutcome::Started);
    }

    #[test]
    fn accounts_are_independent() {
        let tracker = InstallTracker::new();
        assert_eq!(tracker.begin("acct-1"), BeginOutcome::Started);
        assert_eq!(tracker.begin("acct-2"), BeginOutcome::Started);
    }
}
