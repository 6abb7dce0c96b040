// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize` and/or `Deserialize` plus
//! `ToSchema` for automatic JSON handling and OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Accounts**: registration, login and the current user
//! - **Vocabulary**: create/update payloads and list/detail envelopes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{User, UserId};
use crate::storage::VocabularyEntry;

// =============================================================================
// Account Models
// =============================================================================

/// Email and password, used by both register and login.
#[derive(Clone, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    /// Account email.
    #[schema(example = "alice@x.com")]
    #[serde(default)]
    pub email: String,
    /// Plaintext password (at least 6 characters).
    #[schema(example = "secret1")]
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserResponse {
    /// Account id.
    pub id: UserId,
    /// Account email.
    pub email: String,
    /// When the account was registered.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Signed session token; send it as `Authorization: Bearer <token>`.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// The logged-in user.
    pub user: UserResponse,
}

// =============================================================================
// Vocabulary Models
// =============================================================================

/// Request to create a vocabulary entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateVocabularyRequest {
    /// The word (required).
    #[serde(default)]
    pub word: String,
    /// Its meaning (required).
    #[serde(default)]
    pub meaning: String,
    /// Example sentence.
    #[serde(default)]
    pub example: String,
    /// Day in `YYYY-MM-DD` form (required).
    #[schema(example = "2025-01-31")]
    #[serde(default)]
    pub date: String,
    /// `review_needed` (default) or `mastered`.
    #[serde(default)]
    pub status: Option<String>,
}

/// Request to update a vocabulary entry. Empty or absent fields are left as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateVocabularyRequest {
    #[serde(default)]
    pub word: Option<String>,
    #[serde(default)]
    pub meaning: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    /// `review_needed` or `mastered`.
    #[serde(default)]
    pub status: Option<String>,
}

/// Response for listing vocabulary entries.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VocabularyListResponse {
    pub vocabularies: Vec<VocabularyEntry>,
    pub count: usize,
}

impl From<Vec<VocabularyEntry>> for VocabularyListResponse {
    fn from(vocabularies: Vec<VocabularyEntry>) -> Self {
        let count = vocabularies.len();
        Self {
            vocabularies,
            count,
        }
    }
}

/// A confirmation message together with the affected entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VocabularyResponse {
    pub message: String,
    pub vocabulary: VocabularyEntry,
}

/// A bare confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
