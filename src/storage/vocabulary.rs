// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Vocabulary repository.
//!
//! Entries are owner-scoped: every read and write takes the authenticated
//! user and treats another user's entry as not found.

use chrono::{DateTime, NaiveDate, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{
    next_id, OwnedResource, OwnershipEnforcer, Storage, StorageError, StorageResult, VOCABULARY,
    VOCABULARY_BY_OWNER,
};
use crate::auth::{AuthenticatedUser, UserId};

const VOCABULARY_SEQUENCE: &str = "vocabulary";

/// Learning progress of a vocabulary entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Still being learned
    #[default]
    ReviewNeeded,
    /// Learned
    Mastered,
}

impl ReviewStatus {
    /// Parse the wire form (`review_needed` or `mastered`).
    pub fn parse(s: &str) -> Option<ReviewStatus> {
        match s {
            "review_needed" => Some(ReviewStatus::ReviewNeeded),
            "mastered" => Some(ReviewStatus::Mastered),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewStatus::ReviewNeeded => write!(f, "review_needed"),
            ReviewStatus::Mastered => write!(f, "mastered"),
        }
    }
}

/// Vocabulary entry stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct VocabularyEntry {
    /// Unique entry identifier
    pub id: u64,
    /// Owner user ID
    pub user_id: UserId,
    /// The word being learned
    pub word: String,
    /// Its meaning
    pub meaning: String,
    /// Example sentence (may be empty)
    pub example: String,
    /// Calendar day the word belongs to
    #[schema(value_type = String, format = Date, example = "2025-01-31")]
    pub date: NaiveDate,
    /// Review status
    pub status: ReviewStatus,
    /// When the entry was created
    pub created_at: DateTime<Utc>,
    /// When the entry was last changed
    pub updated_at: DateTime<Utc>,
}

impl OwnedResource for VocabularyEntry {
    fn owner_id(&self) -> UserId {
        self.user_id
    }

    fn describe(&self) -> String {
        format!("Vocabulary {}", self.id)
    }
}

/// Fields for a new entry; id and timestamps are assigned on create.
#[derive(Debug, Clone)]
pub struct NewVocabularyEntry {
    pub word: String,
    pub meaning: String,
    pub example: String,
    pub date: NaiveDate,
    pub status: ReviewStatus,
}

/// Optional list filters.
#[derive(Debug, Clone, Default)]
pub struct VocabularyFilter {
    /// Only entries for this day
    pub date: Option<NaiveDate>,
    /// Case-insensitive substring of word or meaning
    pub search: Option<String>,
}

impl VocabularyFilter {
    fn matches(&self, entry: &VocabularyEntry, needle: Option<&str>) -> bool {
        if self.date.is_some_and(|date| entry.date != date) {
            return false;
        }
        match needle {
            Some(needle) => {
                entry.word.to_lowercase().contains(needle)
                    || entry.meaning.to_lowercase().contains(needle)
            }
            None => true,
        }
    }
}

// =============================================================================
// Index Key Helpers
// =============================================================================

/// Composite key for the owner index: `owner_be | id_be`.
fn make_owner_key(owner: UserId, id: u64) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&owner.0.to_be_bytes());
    key[8..].copy_from_slice(&id.to_be_bytes());
    key
}

/// Repository for vocabulary operations.
pub struct VocabularyRepository<'a> {
    storage: &'a Storage,
}

impl<'a> VocabularyRepository<'a> {
    /// Create a new VocabularyRepository.
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create an entry owned by `owner`.
    pub fn create(
        &self,
        owner: &AuthenticatedUser,
        entry: NewVocabularyEntry,
        now: DateTime<Utc>,
    ) -> StorageResult<VocabularyEntry> {
        let write_txn = self.storage.db().begin_write()?;
        let stored = {
            let stored = VocabularyEntry {
                id: next_id(&write_txn, VOCABULARY_SEQUENCE)?,
                user_id: owner.user_id,
                word: entry.word,
                meaning: entry.meaning,
                example: entry.example,
                date: entry.date,
                status: entry.status,
                created_at: now,
                updated_at: now,
            };

            let json = serde_json::to_vec(&stored)?;
            let mut table = write_txn.open_table(VOCABULARY)?;
            table.insert(stored.id, json.as_slice())?;

            let mut index = write_txn.open_table(VOCABULARY_BY_OWNER)?;
            let key = make_owner_key(stored.user_id, stored.id);
            index.insert(key.as_slice(), stored.id)?;
            stored
        };
        write_txn.commit()?;

        Ok(stored)
    }

    /// Get an entry, failing with `NotFound` unless `owner` owns it.
    pub fn get_owned(&self, id: u64, owner: &AuthenticatedUser) -> StorageResult<VocabularyEntry> {
        let read_txn = self.storage.db().begin_read()?;
        let table = read_txn.open_table(VOCABULARY)?;
        let entry: VocabularyEntry = match table.get(id)? {
            Some(value) => serde_json::from_slice(value.value())?,
            None => return Err(StorageError::NotFound(format!("Vocabulary {id}"))),
        };

        entry.verify_ownership(owner)?;
        Ok(entry)
    }

    /// Apply `change` to an owned entry and persist it.
    ///
    /// Load, ownership check and write happen in one write transaction.
    pub fn update<F>(
        &self,
        id: u64,
        owner: &AuthenticatedUser,
        now: DateTime<Utc>,
        change: F,
    ) -> StorageResult<VocabularyEntry>
    where
        F: FnOnce(&mut VocabularyEntry),
    {
        let write_txn = self.storage.db().begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(VOCABULARY)?;

            // Read existing value and deserialize before mutating
            let existing_bytes = {
                let existing = table
                    .get(id)?
                    .ok_or_else(|| StorageError::NotFound(format!("Vocabulary {id}")))?;
                existing.value().to_vec()
            };

            let mut entry: VocabularyEntry = serde_json::from_slice(&existing_bytes)?;
            entry.verify_ownership(owner)?;

            change(&mut entry);
            entry.id = id;
            entry.user_id = owner.user_id;
            entry.updated_at = now;

            let json = serde_json::to_vec(&entry)?;
            table.insert(id, json.as_slice())?;
            entry
        };
        write_txn.commit()?;

        Ok(updated)
    }

    /// Delete an owned entry.
    pub fn delete(&self, id: u64, owner: &AuthenticatedUser) -> StorageResult<()> {
        let write_txn = self.storage.db().begin_write()?;
        {
            let mut table = write_txn.open_table(VOCABULARY)?;

            let existing_bytes = {
                let existing = table
                    .get(id)?
                    .ok_or_else(|| StorageError::NotFound(format!("Vocabulary {id}")))?;
                existing.value().to_vec()
            };
            let entry: VocabularyEntry = serde_json::from_slice(&existing_bytes)?;
            entry.verify_ownership(owner)?;

            table.remove(id)?;
            let mut index = write_txn.open_table(VOCABULARY_BY_OWNER)?;
            let key = make_owner_key(entry.user_id, id);
            index.remove(key.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// List `owner`'s entries matching `filter`, newest first.
    pub fn list_by_owner(
        &self,
        owner: &AuthenticatedUser,
        filter: &VocabularyFilter,
    ) -> StorageResult<Vec<VocabularyEntry>> {
        let read_txn = self.storage.db().begin_read()?;
        let index = read_txn.open_table(VOCABULARY_BY_OWNER)?;
        let table = read_txn.open_table(VOCABULARY)?;

        let start = make_owner_key(owner.user_id, 0);
        let end = make_owner_key(owner.user_id, u64::MAX);
        // Matched verbatim: a search of " " finds entries containing a space.
        let needle = filter
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut entries = Vec::new();
        for item in index.range(start.as_slice()..=end.as_slice())? {
            let (_key, id) = item?;
            let Some(value) = table.get(id.value())? else {
                continue;
            };
            let entry: VocabularyEntry = serde_json::from_slice(value.value())?;
            if filter.matches(&entry, needle.as_deref()) {
                entries.push(entry);
            }
        }

        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn user(id: u64) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: UserId(id),
            issued_at: Utc::now(),
            expires_at: Utc::now(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn new_entry(word: &str, meaning: &str, date: &str) -> NewVocabularyEntry {
        NewVocabularyEntry {
            word: word.to_string(),
            meaning: meaning.to_string(),
            example: String::new(),
            date: day(date),
            status: ReviewStatus::default(),
        }
    }

    #[test]
    fn create_and_get_entry() {
        let storage = Storage::in_memory().unwrap();
        let repo = VocabularyRepository::new(&storage);
        let alice = user(1);

        let created = repo
            .create(&alice, new_entry("ephemeral", "short-lived", "2025-01-31"), Utc::now())
            .unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.status, ReviewStatus::ReviewNeeded);
        assert_eq!(repo.get_owned(created.id, &alice).unwrap(), created);
    }

    #[test]
    fn other_users_cannot_see_or_touch_entries() {
        let storage = Storage::in_memory().unwrap();
        let repo = VocabularyRepository::new(&storage);
        let alice = user(1);
        let mallory = user(2);

        let entry = repo
            .create(&alice, new_entry("ephemeral", "short-lived", "2025-01-31"), Utc::now())
            .unwrap();

        assert!(matches!(
            repo.get_owned(entry.id, &mallory),
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            repo.update(entry.id, &mallory, Utc::now(), |e| e.word = "hacked".into()),
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            repo.delete(entry.id, &mallory),
            Err(StorageError::NotFound(_))
        ));
        assert!(repo
            .list_by_owner(&mallory, &VocabularyFilter::default())
            .unwrap()
            .is_empty());
        assert_eq!(repo.get_owned(entry.id, &alice).unwrap().word, "ephemeral");
    }

    #[test]
    fn update_applies_change_and_bumps_timestamp() {
        let storage = Storage::in_memory().unwrap();
        let repo = VocabularyRepository::new(&storage);
        let alice = user(1);
        let created_at = Utc::now();

        let entry = repo
            .create(&alice, new_entry("ephemeral", "short-lived", "2025-01-31"), created_at)
            .unwrap();
        let later = created_at + TimeDelta::minutes(5);
        let updated = repo
            .update(entry.id, &alice, later, |e| e.status = ReviewStatus::Mastered)
            .unwrap();

        assert_eq!(updated.status, ReviewStatus::Mastered);
        assert_eq!(updated.created_at, created_at);
        assert_eq!(updated.updated_at, later);
        assert_eq!(repo.get_owned(entry.id, &alice).unwrap(), updated);
    }

    #[test]
    fn delete_removes_entry_and_index() {
        let storage = Storage::in_memory().unwrap();
        let repo = VocabularyRepository::new(&storage);
        let alice = user(1);

        let entry = repo
            .create(&alice, new_entry("ephemeral", "short-lived", "2025-01-31"), Utc::now())
            .unwrap();
        repo.delete(entry.id, &alice).unwrap();

        assert!(matches!(
            repo.get_owned(entry.id, &alice),
            Err(StorageError::NotFound(_))
        ));
        assert!(repo
            .list_by_owner(&alice, &VocabularyFilter::default())
            .unwrap()
            .is_empty());
        assert!(matches!(
            repo.delete(entry.id, &alice),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn list_filters_by_date_and_search_newest_first() {
        let storage = Storage::in_memory().unwrap();
        let repo = VocabularyRepository::new(&storage);
        let alice = user(1);
        let bob = user(2);
        let t0 = Utc::now();

        let first = repo
            .create(&alice, new_entry("Ephemeral", "short-lived", "2025-01-31"), t0)
            .unwrap();
        let second = repo
            .create(
                &alice,
                new_entry("ubiquitous", "found everywhere", "2025-01-31"),
                t0 + TimeDelta::seconds(1),
            )
            .unwrap();
        let third = repo
            .create(
                &alice,
                new_entry("laconic", "using few words", "2025-02-01"),
                t0 + TimeDelta::seconds(2),
            )
            .unwrap();
        repo.create(&bob, new_entry("ephemeral", "bob's copy", "2025-01-31"), t0)
            .unwrap();

        let all = repo.list_by_owner(&alice, &VocabularyFilter::default()).unwrap();
        assert_eq!(all, vec![third.clone(), second.clone(), first.clone()]);

        let by_date = repo
            .list_by_owner(
                &alice,
                &VocabularyFilter {
                    date: Some(day("2025-01-31")),
                    search: None,
                },
            )
            .unwrap();
        assert_eq!(by_date, vec![second.clone(), first.clone()]);

        let by_word = repo
            .list_by_owner(
                &alice,
                &VocabularyFilter {
                    date: None,
                    search: Some("EPHEM".to_string()),
                },
            )
            .unwrap();
        assert_eq!(by_word, vec![first]);

        let by_meaning = repo
            .list_by_owner(
                &alice,
                &VocabularyFilter {
                    date: None,
                    search: Some("few".to_string()),
                },
            )
            .unwrap();
        assert_eq!(by_meaning, vec![third]);
    }

    #[test]
    fn search_is_not_trimmed() {
        let storage = Storage::in_memory().unwrap();
        let repo = VocabularyRepository::new(&storage);
        let alice = user(1);
        let t0 = Utc::now();

        let phrase = repo
            .create(&alice, new_entry("look up", "search for", "2025-01-31"), t0)
            .unwrap();
        repo.create(
            &alice,
            new_entry("laconic", "terse", "2025-01-31"),
            t0 + TimeDelta::seconds(1),
        )
        .unwrap();

        let search = |s: &str| {
            repo.list_by_owner(
                &alice,
                &VocabularyFilter {
                    date: None,
                    search: Some(s.to_string()),
                },
            )
            .unwrap()
        };

        assert_eq!(search(" "), vec![phrase.clone()]);
        assert_eq!(search("k u"), vec![phrase]);
        assert!(search(" laconic").is_empty());
        assert_eq!(search("").len(), 2);
    }

    #[test]
    fn owner_keys_sort_by_owner_then_id() {
        assert!(make_owner_key(UserId(1), u64::MAX) < make_owner_key(UserId(2), 0));
        assert!(make_owner_key(UserId(1), 1) < make_owner_key(UserId(1), 2));
    }

    #[test]
    fn review_status_round_trips_wire_form() {
        assert_eq!(ReviewStatus::parse("mastered"), Some(ReviewStatus::Mastered));
        assert_eq!(ReviewStatus::parse("review_needed"), Some(ReviewStatus::ReviewNeeded));
        assert_eq!(ReviewStatus::parse("Mastered"), None);
        assert_eq!(ReviewStatus::Mastered.to_string(), "mastered");
    }
}
