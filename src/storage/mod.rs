// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Embedded Storage Module
//!
//! Persistent storage backed by redb (pure Rust, ACID). One database file
//! holds users and vocabulary entries; all tables are created when the
//! database is opened.
//!
//! ## Table Layout
//!
//! - `users`: user id → JSON `User`
//! - `users_by_email`: exact email → user id (uniqueness guard)
//! - `vocabulary`: entry id → JSON `VocabularyEntry`
//! - `vocabulary_by_owner`: composite key (owner id | entry id) → entry id
//! - `sequences`: sequence name → next id to hand out
//!
//! ## Concurrency
//!
//! redb serializes write transactions. Every check-then-write sequence
//! (duplicate email, ownership before update or delete) runs inside a single
//! write transaction, so the store itself enforces these rules.

use std::path::Path;
use std::sync::Arc;

use redb::{
    backends::InMemoryBackend, Database, ReadableDatabase, ReadableTable, TableDefinition,
    WriteTransaction,
};

pub mod ownership;
pub mod users;
pub mod vocabulary;

pub use ownership::{OwnedResource, OwnershipEnforcer};
pub use users::UserRepository;
pub use vocabulary::{
    NewVocabularyEntry, ReviewStatus, VocabularyEntry, VocabularyFilter, VocabularyRepository,
};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary user table: id → serialized User (JSON bytes).
pub(crate) const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

/// Unique index: email exactly as registered → user id.
pub(crate) const USERS_BY_EMAIL: TableDefinition<&str, u64> = TableDefinition::new("users_by_email");

/// Primary vocabulary table: id → serialized VocabularyEntry (JSON bytes).
pub(crate) const VOCABULARY: TableDefinition<u64, &[u8]> = TableDefinition::new("vocabulary");

/// Index: `owner_be | id_be` → entry id, for per-owner range scans.
pub(crate) const VOCABULARY_BY_OWNER: TableDefinition<&[u8], u64> =
    TableDefinition::new("vocabulary_by_owner");

/// Id sequences: name → next id.
const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Storage
// =============================================================================

/// Handle to the embedded database. Cheap to clone.
#[derive(Clone)]
pub struct Storage {
    db: Arc<Database>,
}

impl Storage {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open a database that lives only in memory.
    pub fn in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            write_txn.open_table(USERS)?;
            write_txn.open_table(USERS_BY_EMAIL)?;
            write_txn.open_table(VOCABULARY)?;
            write_txn.open_table(VOCABULARY_BY_OWNER)?;
            write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    pub(crate) fn db(&self) -> &Database {
        &self.db
    }

    /// Confirm the database answers a read transaction.
    pub fn check(&self) -> StorageResult<()> {
        let read_txn = self.db.begin_read()?;
        read_txn.open_table(USERS)?;
        Ok(())
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

/// Hand out the next id from `sequence` inside an open write transaction.
///
/// Ids start at 1 and are never reused.
pub(crate) fn next_id(write_txn: &WriteTransaction, sequence: &str) -> StorageResult<u64> {
    let mut table = write_txn.open_table(SEQUENCES)?;
    let next = table.get(sequence)?.map_or(1, |v| v.value());
    table.insert(sequence, next + 1)?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("vocab.redb");

        let storage = Storage::open(&path).unwrap();
        storage.check().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn sequences_start_at_one_and_increase() {
        let storage = Storage::in_memory().unwrap();
        let write_txn = storage.db().begin_write().unwrap();
        let first = next_id(&write_txn, "users").unwrap();
        let second = next_id(&write_txn, "users").unwrap();
        let other = next_id(&write_txn, "vocabulary").unwrap();
        write_txn.commit().unwrap();

        assert_eq!((first, second, other), (1, 2, 1));
    }

    #[test]
    fn data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vocab.redb");

        {
            let storage = Storage::open(&path).unwrap();
            let write_txn = storage.db().begin_write().unwrap();
            next_id(&write_txn, "users").unwrap();
            write_txn.commit().unwrap();
        }

        let storage = Storage::open(&path).unwrap();
        let write_txn = storage.db().begin_write().unwrap();
        assert_eq!(next_id(&write_txn, "users").unwrap(), 2);
    }
}
