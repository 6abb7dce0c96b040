// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token claims and authenticated user representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Numeric user identifier assigned by the user store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(pub u64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        UserId(value)
    }
}

/// Claims carried inside a session token.
///
/// `sub` is the user id as a decimal string (JWT subjects are strings).
/// `iat` and `exp` are Unix timestamps in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

impl SessionClaims {
    /// Build claims for `user_id` valid from `issued_at` for `ttl_secs` seconds.
    pub fn new(user_id: UserId, issued_at: i64, ttl_secs: i64) -> Self {
        Self {
            sub: user_id.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(ttl_secs),
        }
    }

    /// Parse the subject back into a [`UserId`].
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse::<u64>().ok().map(UserId)
    }
}

/// Authenticated user information resolved from a verified token.
///
/// The request gate inserts this into request extensions; handlers read it
/// through the [`Auth`](super::Auth) extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Owner of the request
    pub user_id: UserId,
    /// When the presented token was minted
    pub issued_at: DateTime<Utc>,
    /// When the presented token stops being accepted
    pub expires_at: DateTime<Utc>,
}

impl AuthenticatedUser {
    /// Build from verified claims. Returns `None` when the subject or the
    /// timestamps cannot be interpreted.
    pub fn from_claims(claims: &SessionClaims) -> Option<Self> {
        Some(Self {
            user_id: claims.user_id()?,
            issued_at: DateTime::from_timestamp(claims.iat, 0)?,
            expires_at: DateTime::from_timestamp(claims.exp, 0)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_encode_subject_as_decimal_string() {
        let claims = SessionClaims::new(UserId(42), 1_700_000_000, 3600);
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.exp, 1_700_003_600);
        assert_eq!(claims.user_id(), Some(UserId(42)));
    }

    #[test]
    fn non_numeric_subject_has_no_user_id() {
        let claims = SessionClaims {
            sub: "user_123".to_string(),
            iat: 0,
            exp: 10,
        };
        assert_eq!(claims.user_id(), None);
        assert!(AuthenticatedUser::from_claims(&claims).is_none());
    }

    #[test]
    fn from_claims_extracts_user_and_times() {
        let claims = SessionClaims::new(UserId(7), 1_700_000_000, 60);
        let user = AuthenticatedUser::from_claims(&claims).unwrap();

        assert_eq!(user.user_id, UserId(7));
        assert_eq!(user.issued_at.timestamp(), 1_700_000_000);
        assert_eq!(user.expires_at.timestamp(), 1_700_000_060);
    }
}
