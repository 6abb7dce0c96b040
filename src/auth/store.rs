// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential storage interface consumed by the auth service.
//!
//! The storage layer implements [`CredentialStore`]; the auth core never
//! touches the database directly. Email uniqueness is the store's job and its
//! insert-time conflict is the authoritative duplicate check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::claims::UserId;

/// A registered user as held by the credential store.
///
/// `password_hash` is a PHC string. This type is never returned from the
/// HTTP layer; see `models::UserResponse` for the outward shape.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// A user about to be inserted; the store assigns the id.
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Errors surfaced by a credential store.
#[derive(Debug, thiserror::Error)]
pub enum CredentialStoreError {
    #[error("a user with this email already exists")]
    Conflict,

    #[error("credential store failure: {0}")]
    Backend(String),
}

/// User lookup and insertion, implemented by the storage layer.
pub trait CredentialStore: Send + Sync {
    /// Exact, case-sensitive email lookup.
    fn find_by_email(&self, email: &str) -> Result<Option<User>, CredentialStoreError>;

    fn find_by_id(&self, id: UserId) -> Result<Option<User>, CredentialStoreError>;

    /// Insert a new user, failing with [`CredentialStoreError::Conflict`] if
    /// the email is already taken.
    fn insert(&self, user: NewUser) -> Result<User, CredentialStoreError>;
}
