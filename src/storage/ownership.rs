// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for owner-scoped records.
//!
//! Vocabulary entries belong to exactly one user. Reads and writes go through
//! these traits so a record owned by someone else looks exactly like a missing
//! one.

use crate::auth::{AuthenticatedUser, UserId};

use super::{StorageError, StorageResult};

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Get the owner's user ID.
    fn owner_id(&self) -> UserId;

    /// Short description used in not-found errors.
    fn describe(&self) -> String;
}

/// Trait for enforcing ownership on storage operations.
pub trait OwnershipEnforcer {
    /// Verify that the user owns this resource.
    ///
    /// # Errors
    /// Returns `StorageError::NotFound` if the user doesn't own the resource.
    fn verify_ownership(&self, user: &AuthenticatedUser) -> StorageResult<()>;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn verify_ownership(&self, user: &AuthenticatedUser) -> StorageResult<()> {
        if self.owner_id() == user.user_id {
            Ok(())
        } else {
            Err(StorageError::NotFound(self.describe()))
        }
    }
}
