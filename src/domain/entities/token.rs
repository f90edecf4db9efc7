//! Identity token claims and token pairs.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Caller identity carried in the `sub` claim (a user id).
pub type Subject = i64;

/// Discriminates short-lived access credentials from long-lived refresh
/// credentials. Serialized as `"access"` / `"refresh"`; any other value fails
/// to deserialize and the token is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenClass {
    Access,
    Refresh,
}

impl TokenClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenClass::Access => "access",
            TokenClass::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed token payload.
///
/// Timestamps are seconds since the Unix epoch. `sub` is the decimal user id
/// (JWT subjects are strings); use [`Claims::subject`] to read it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub token_type: TokenClass,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub iss: String,
    /// Random token id; keeps tokens minted in the same second distinct.
    pub jti: String,
}

impl Claims {
    /// Parses the subject back into a user id.
    pub fn subject(&self) -> Option<Subject> {
        self.sub.parse().ok()
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// Returns true once `now` has reached `exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Returns true while `now` is still before `nbf`.
    pub fn is_premature_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() < self.nbf
    }
}

/// Access and refresh token minted together for one subject.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}
