// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Vocab Tracker - Personal Vocabulary Service
//!
//! This crate provides a small HTTP API where users register, log in with a
//! signed session token, and keep a private list of vocabulary entries.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Password hashing, session tokens and the request gate
//! - `config` - Environment configuration
//! - `storage` - Embedded database (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
