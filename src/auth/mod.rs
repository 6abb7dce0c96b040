// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Password login and stateless session tokens for the Vocab Tracker API.
//!
//! ## Auth Flow
//!
//! 1. Client registers with `POST /auth/register` (email + password)
//! 2. Client logs in with `POST /auth/login` and receives a signed token
//! 3. Client sends `Authorization: Bearer <token>` (or the bare token)
//! 4. Server:
//!    - Verifies the HS256 signature with the server secret
//!    - Checks `exp` against the current time
//!    - Extracts `sub` → owner `user_id` for vocabulary access
//!
//! ## Security
//!
//! - Passwords are hashed with Argon2id and a random salt per hash
//! - Hashing runs on the blocking pool, never on async workers
//! - Login failures never reveal whether the email exists
//! - Token failures never reveal whether a token expired or was altered
//! - No server-side sessions: tokens end only by expiry

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod service;
pub mod store;
pub mod token;

pub use claims::{AuthenticatedUser, UserId};
pub use error::AuthError;
pub use extractor::Auth;
pub use password::{PasswordError, PasswordHasher};
pub use service::{AuthService, AuthServiceError, LoginOutcome};
pub use store::{CredentialStore, CredentialStoreError, NewUser, User};
pub use token::{IssuedToken, SigningSecret, TokenError, TokenService};
