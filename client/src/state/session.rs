//! Session store: the signed-in user and the last hospital result.
//!
//! SYSTEM CONTEXT
//! ==============
//! Provided app-wide as `RwSignal<SessionStore>`. The identity gateway's
//! subscription is the only writer of the session; the dashboard controller
//! is the only writer of the hospital result. Everything else reads a cloned
//! snapshot through the signal.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::types::{HospitalResult, Session};

/// App-wide session and result state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionStore {
    session: Option<Session>,
    hospitals: Option<HospitalResult>,
    /// False until the identity gateway has reported the session once.
    resolved: bool,
    /// Incremented every time a session ends (sign-out, expiry, user switch).
    sign_out_epoch: u64,
}

impl SessionStore {
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn hospitals(&self) -> Option<&HospitalResult> {
        self.hospitals.as_ref()
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    #[must_use]
    pub fn sign_out_epoch(&self) -> u64 {
        self.sign_out_epoch
    }

    /// Record a session transition reported by the identity gateway.
    ///
    /// Ending a session (or switching to another user) bumps the sign-out
    /// epoch and drops the previous user's hospital result. Returns `true`
    /// when the stored session changed.
    pub fn set_session(&mut self, session: Option<Session>) -> bool {
        self.resolved = true;
        if self.session == session {
            return false;
        }
        let previous_uid = self.session.as_ref().map(|s| s.uid.as_str());
        let next_uid = session.as_ref().map(|s| s.uid.as_str());
        if previous_uid.is_some() && previous_uid != next_uid {
            self.sign_out_epoch += 1;
            self.hospitals = None;
        }
        self.session = session;
        true
    }

    /// Replace the stored hospital result wholesale.
    pub fn replace_hospitals(&mut self, result: HospitalResult) {
        self.hospitals = Some(result);
    }
}
