//! Operator context for one run of the console.
//!
//! Nothing here is validated for consistency: a token issued for one user may
//! sit next to the id of another. The last write wins.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{
    identity::{AccessToken, UserId},
    thread::ThreadMember,
};

#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    value: String,
    expires_on: Option<DateTime<Utc>>,
}

impl SessionToken {
    /// Token pasted by the operator; its expiry is unknown.
    pub fn manual(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_on: None,
        }
    }

    pub fn issued(token: AccessToken) -> Self {
        Self {
            value: token.token,
            expires_on: Some(token.expires_on),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_on(&self) -> Option<DateTime<Utc>> {
        self.expires_on
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("value", &"[REDACTED]")
            .field("expires_on", &self.expires_on)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<SessionToken>,
    user_id: Option<UserId>,
    display_name: Option<String>,
}

impl Session {
    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_token_set(&self) -> bool {
        self.token.is_some()
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn set_token(&mut self, token: SessionToken) {
        self.token = Some(token);
    }

    pub fn set_user(&mut self, user_id: UserId, display_name: impl Into<String>) {
        self.user_id = Some(user_id);
        self.display_name = Some(display_name.into());
    }

    /// The active user expressed as a thread member, if a user is set.
    pub fn active_member(&self) -> Option<ThreadMember> {
        self.user_id.as_ref().map(|user_id| ThreadMember {
            user_id: user_id.clone(),
            display_name: self.display_name.clone().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_empty() {
        let session = Session::default();

        assert!(!session.is_token_set());
        assert!(session.user_id().is_none());
        assert!(session.display_name().is_none());
        assert!(session.active_member().is_none());
    }

    #[test]
    fn later_writes_replace_earlier_ones() {
        let mut session = Session::default();
        session.set_user(UserId::new("8:acs:first"), "First");
        session.set_token(SessionToken::manual("one"));

        session.set_user(UserId::new("8:acs:second"), "Second");
        session.set_token(SessionToken::manual("two"));

        assert_eq!(session.user_id(), Some(&UserId::new("8:acs:second")));
        assert_eq!(session.display_name(), Some("Second"));
        assert_eq!(session.token().map(SessionToken::value), Some("two"));
    }

    #[test]
    fn manual_token_has_no_known_expiry() {
        let token = SessionToken::manual("pasted");

        assert!(token.expires_on().is_none());
        assert_eq!(token.value(), "pasted");
    }

    #[test]
    fn debug_output_never_contains_token_value() {
        let mut session = Session::default();
        session.set_token(SessionToken::manual("super-secret-token-value"));

        let rendered = format!("{session:?}");

        assert!(!rendered.contains("super-secret-token-value"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn active_member_carries_display_name() {
        let mut session = Session::default();
        session.set_user(UserId::new("8:acs:alice"), "Alice");

        let member = session.active_member().expect("member must exist");

        assert_eq!(member.user_id.as_str(), "8:acs:alice");
        assert_eq!(member.display_name, "Alice");
    }
}
