// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stateless session tokens.
//!
//! Tokens are HS256-signed JWTs carrying `{sub, iat, exp}`. Nothing is stored
//! server-side: a token stays valid until `exp`, and the only way to
//! invalidate every outstanding token is to change the signing secret.
//!
//! ## Verification Order
//!
//! 1. Signature over header and claims (`Tampered`)
//! 2. Expiry against the caller-supplied `now` (`Expired`)
//! 3. Claim shape, including a numeric subject (`Malformed`)
//!
//! Expiry is checked against the `now` argument rather than the system clock
//! so the boundary is exact and testable: a token is accepted while
//! `now <= exp`.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::claims::{AuthenticatedUser, SessionClaims, UserId};

/// Secrets shorter than this are accepted but flagged at startup.
pub const RECOMMENDED_SECRET_LEN: usize = 32;

/// Why a token was rejected or could not be minted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token signature does not match its claims")]
    Tampered,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Server-held HMAC key. Constructed once at startup and never rotated at runtime.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the secret is shorter than [`RECOMMENDED_SECRET_LEN`].
    pub fn is_weak(&self) -> bool {
        self.0.len() < RECOMMENDED_SECRET_LEN
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningSecret([REDACTED; {} bytes])", self.0.len())
    }
}

/// A freshly minted token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies session tokens with a fixed secret and TTL.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
}

impl TokenService {
    pub fn new(secret: &SigningSecret, ttl: TimeDelta) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's `now` in `verify`.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Mint a token for `user_id` valid from `now` until `now + ttl`.
    pub fn issue(&self, user_id: UserId, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let claims = SessionClaims::new(user_id, now.timestamp(), self.ttl.num_seconds());
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or_else(|| {
            TokenError::Signing("expiry is outside the representable range".to_string())
        })?;

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        tracing::debug!(user_id = %user_id, expires_at = %expires_at, "Issued session token");

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token and resolve the identity it carries.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AuthenticatedUser, TokenError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::Tampered,
                _ => TokenError::Malformed,
            })?;

        let claims = token_data.claims;

        if now.timestamp() > claims.exp {
            return Err(TokenError::Expired);
        }

        AuthenticatedUser::from_claims(&claims).ok_or(TokenError::Malformed)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
