// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository: the redb-backed [`CredentialStore`].

use redb::{ReadableDatabase, ReadableTable};

use super::{next_id, Storage, StorageError, StorageResult, USERS, USERS_BY_EMAIL};
use crate::auth::{CredentialStore, CredentialStoreError, NewUser, User, UserId};

const USER_SEQUENCE: &str = "users";

/// Repository for user accounts.
#[derive(Clone, Debug)]
pub struct UserRepository {
    storage: Storage,
}

impl UserRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Get a user by id.
    pub fn get(&self, id: UserId) -> StorageResult<Option<User>> {
        let read_txn = self.storage.db().begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(id.0)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a user by exact email.
    pub fn get_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let read_txn = self.storage.db().begin_read()?;
        let index = read_txn.open_table(USERS_BY_EMAIL)?;
        let Some(id) = index.get(email)?.map(|v| v.value()) else {
            return Ok(None);
        };

        let table = read_txn.open_table(USERS)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Err(StorageError::NotFound(format!(
                "User {id} referenced by email index"
            ))),
        }
    }

    /// Create a user, assigning the next id.
    ///
    /// The email check and both writes share one write transaction, so two
    /// concurrent registrations of the same email cannot both succeed.
    pub fn create(&self, new_user: NewUser) -> StorageResult<User> {
        let write_txn = self.storage.db().begin_write()?;
        let user = {
            let mut index = write_txn.open_table(USERS_BY_EMAIL)?;
            if index.get(new_user.email.as_str())?.is_some() {
                return Err(StorageError::AlreadyExists("User email".to_string()));
            }

            let user = User {
                id: UserId(next_id(&write_txn, USER_SEQUENCE)?),
                email: new_user.email,
                password_hash: new_user.password_hash,
                created_at: new_user.created_at,
            };

            let json = serde_json::to_vec(&user)?;
            let mut table = write_txn.open_table(USERS)?;
            table.insert(user.id.0, json.as_slice())?;
            index.insert(user.email.as_str(), user.id.0)?;
            user
        };
        write_txn.commit()?;

        Ok(user)
    }
}

impl From<StorageError> for CredentialStoreError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::AlreadyExists(_) => CredentialStoreError::Conflict,
            other => CredentialStoreError::Backend(other.to_string()),
        }
    }
}

impl CredentialStore for UserRepository {
    fn find_by_email(&self, email: &str) -> Result<Option<User>, CredentialStoreError> {
        Ok(self.get_by_email(email)?)
    }

    fn find_by_id(&self, id: UserId) -> Result<Option<User>, CredentialStoreError> {
        Ok(self.get(id)?)
    }

    fn insert(&self, user: NewUser) -> Result<User, CredentialStoreError> {
        Ok(self.create(user)?)
    }
}
