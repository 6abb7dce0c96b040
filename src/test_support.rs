// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::auth::SigningSecret;
use crate::config::AuthSettings;
use crate::state::AppState;
use crate::storage::Storage;

/// 2025-01-01T00:00:00Z
pub const T0: i64 = 1_735_689_600;

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-123456";

pub const TEST_TTL_SECS: i64 = 3600;

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap()
}

/// A clock tests can move forward.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap()
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

pub fn test_settings() -> AuthSettings {
    AuthSettings {
        secret: SigningSecret::new(TEST_SECRET),
        token_ttl: TimeDelta::seconds(TEST_TTL_SECS),
    }
}

/// In-memory state whose clock starts at [`T0`].
pub fn test_state() -> (AppState, Arc<MutableClock>) {
    let clock = Arc::new(MutableClock::new(at(T0)));
    let storage = Storage::in_memory().unwrap();
    let state = AppState::with_clock(storage, &test_settings(), clock.clone()).unwrap();
    (state, clock)
}
