// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration and login.
//!
//! [`AuthService`] ties the password hasher, the credential store and the
//! token service together. It is transport-agnostic: errors are typed here
//! and mapped to HTTP statuses in `crate::error`.
//!
//! ## Enumeration Resistance
//!
//! Login returns the same [`AuthServiceError::InvalidCredentials`] for an
//! unknown email and for a wrong password. For an unknown email the password
//! is still verified against a placeholder hash so both paths cost one Argon2
//! verification.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info};

use super::claims::UserId;
use super::password::{PasswordError, PasswordHasher};
use super::store::{CredentialStore, CredentialStoreError, NewUser, User};
use super::token::{IssuedToken, TokenError, TokenService};

/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Upper bound on email length (RFC 5321 path limit).
pub const MAX_EMAIL_LEN: usize = 254;

/// Errors returned by [`AuthService`].
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("email is already registered")]
    DuplicateEmail,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Store(CredentialStoreError),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: IssuedToken,
}

/// Orchestrates registration and login.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
    placeholder_hash: Arc<str>,
}

impl AuthService {
    /// Build the service. Computes one placeholder hash up front, so this
    /// blocks for the duration of a single Argon2 run.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        tokens: Arc<TokenService>,
    ) -> Result<Self, PasswordError> {
        let hasher = PasswordHasher::new();
        let placeholder_hash = hasher.hash("placeholder-for-unknown-accounts")?;

        Ok(Self {
            store,
            hasher,
            tokens,
            placeholder_hash: placeholder_hash.into(),
        })
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Register a new account.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<User, AuthServiceError> {
        validate_credentials(email, password)?;

        if self
            .store
            .find_by_email(email)
            .map_err(AuthServiceError::Store)?
            .is_some()
        {
            info!("Registration rejected: email already registered");
            return Err(AuthServiceError::DuplicateEmail);
        }

        let hasher = self.hasher.clone();
        let plaintext = password.to_owned();
        let password_hash = run_blocking(move || hasher.hash(&plaintext))
            .await?
            .map_err(|e| AuthServiceError::Hashing(e.to_string()))?;

        let user = self
            .store
            .insert(NewUser {
                email: email.to_owned(),
                password_hash,
                created_at: now,
            })
            .map_err(|e| match e {
                // Lost a race with a concurrent registration.
                CredentialStoreError::Conflict => AuthServiceError::DuplicateEmail,
                other => AuthServiceError::Store(other),
            })?;

        info!(user_id = %user.id, "Registered new user");
        Ok(user)
    }

    /// Check credentials and mint a session token.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, AuthServiceError> {
        validate_credentials(email, password)?;

        let user = self
            .store
            .find_by_email(email)
            .map_err(AuthServiceError::Store)?;

        let stored_hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.placeholder_hash.to_string(),
        };

        let hasher = self.hasher.clone();
        let plaintext = password.to_owned();
        let verified = run_blocking(move || hasher.verify(&plaintext, &stored_hash)).await?;

        let matches = match verified {
            Ok(matches) => matches,
            Err(PasswordError::MalformedHash(reason)) => {
                error!(
                    user_id = ?user.as_ref().map(|u| u.id),
                    %reason,
                    "Stored password hash is malformed"
                );
                false
            }
            Err(e) => return Err(AuthServiceError::Hashing(e.to_string())),
        };

        let user = match user {
            Some(user) if matches => user,
            _ => {
                info!("Login rejected: invalid credentials");
                return Err(AuthServiceError::InvalidCredentials);
            }
        };

        let token = self.tokens.issue(user.id, now)?;
        info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome { user, token })
    }

    /// Look up the account behind an authenticated request.
    pub fn find_user(&self, id: UserId) -> Result<Option<User>, AuthServiceError> {
        self.store.find_by_id(id).map_err(AuthServiceError::Store)
    }
}

/// Run CPU-heavy hashing work off the async worker threads.
async fn run_blocking<T, F>(work: F) -> Result<T, AuthServiceError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AuthServiceError::Hashing(format!("hashing task failed: {e}")))
}

/// Check email shape and password length.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), AuthServiceError> {
    if email.is_empty() {
        return Err(AuthServiceError::Validation("email is required".to_string()));
    }
    if !is_valid_email(email) {
        return Err(AuthServiceError::Validation(
            "email must be a valid email address".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthServiceError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN || email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels
            .iter()
            .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'))
}
