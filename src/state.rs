// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};

use crate::auth::{AuthService, PasswordError, TokenService};
use crate::config::AuthSettings;
use crate::storage::{Storage, UserRepository};

/// Shared handler state. Cheap to clone; everything inside is read-only
/// after startup.
#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub auth: Arc<AuthService>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl AppState {
    /// Wire the auth core to `storage` using the system clock.
    pub fn new(storage: Storage, settings: &AuthSettings) -> Result<Self, PasswordError> {
        Self::with_clock(storage, settings, Arc::new(DefaultClock))
    }

    pub fn with_clock(
        storage: Storage,
        settings: &AuthSettings,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Result<Self, PasswordError> {
        let tokens = Arc::new(TokenService::new(&settings.secret, settings.token_ttl));
        let users = Arc::new(UserRepository::new(storage.clone()));
        let auth = AuthService::new(users, tokens)?;

        Ok(Self {
            storage,
            auth: Arc::new(auth),
            clock,
        })
    }

    /// Current time as seen by token issue and verification.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }
}
