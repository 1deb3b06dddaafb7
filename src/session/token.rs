use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime of a token issued without "remember me".
pub const SESSION_DAYS: i64 = 1;

/// Lifetime of a token issued with "remember me".
pub const REMEMBER_ME_DAYS: i64 = 30;

/// A bearer token and the instant it stops being sent.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Issues a token valid from now.
    pub fn issue(value: impl Into<String>, remember_me: bool) -> Self {
        Self::issue_at(value, remember_me, Utc::now())
    }

    pub fn issue_at(value: impl Into<String>, remember_me: bool, now: DateTime<Utc>) -> Self {
        let days = if remember_me { REMEMBER_ME_DAYS } else { SESSION_DAYS };
        Self::new(value, now + Duration::days(days))
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

// Keep the secret out of logs.
impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
