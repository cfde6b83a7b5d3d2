//! # Record Store
//!
//! [`RecordStore`] owns the authoritative record collection and settings.
//! Every mutation goes through it and is written through to storage before
//! returning, so callers only need to re-render afterwards.
//!
//! ## Lifecycle
//!
//! 1. [`RecordStore::open`] wraps a backend and loads settings (or defaults).
//! 2. [`RecordStore::initialize_records`] loads the collection, seeding it on
//!    the very first run.
//! 3. Mutations and queries.
//! 4. [`RecordStore::close`] hands the backend back. Nothing is flushed:
//!    every mutation has already been written through.
//!
//! ## Unknown Ids
//!
//! Updating or deleting an id that is not in the collection is a silent
//! no-op. The return values (`bool` / removed count) let callers notice if
//! they care; nothing is raised.

use crate::error::Result;
use crate::model::{Record, RecordPatch, Settings, SettingsPatch};
use crate::query::{self, Query, QueryHit};
use crate::seed::SeedSource;
use crate::store::{ImportCheck, Storage, StorageBackend};
use crate::summary::{self, Summary};
use chrono::{NaiveDate, Utc};

/// How [`RecordStore::initialize_records`] obtained the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// First run: the seed document was loaded. Holds the seeded count.
    Seeded(usize),
    /// First run, but the seed could not be used; stored records were loaded.
    SeedFallback(usize),
    /// Not the first run; stored records were loaded.
    Loaded(usize),
}

pub struct RecordStore<B: StorageBackend> {
    storage: Storage<B>,
    records: Vec<Record>,
    settings: Settings,
}

impl<B: StorageBackend> RecordStore<B> {
    /// Opens a store on `backend` with stored settings (or defaults) and an
    /// empty collection until [`initialize_records`](Self::initialize_records).
    pub fn open(backend: B) -> Self {
        let storage = Storage::new(backend);
        let settings = storage.load_settings().unwrap_or_default();
        Self {
            storage,
            records: Vec::new(),
            settings,
        }
    }

    /// Returns the backend. Stored data is left as the last mutation wrote it,
    /// so closing a store that was never initialized loses nothing.
    pub fn close(self) -> B {
        tracing::debug!(count = self.records.len(), "record store closed");
        self.storage.into_backend()
    }

    pub fn storage(&self) -> &Storage<B> {
        &self.storage
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Appends a fully formed record and persists the collection.
    pub fn add_record(&mut self, record: Record) {
        tracing::debug!(id = %record.id, "adding record");
        self.records.push(record);
        self.storage.save_records(&self.records);
    }

    /// Merges `patch` into the first record with `id` and refreshes its
    /// `updated_at`. Returns false, and writes nothing, if no record matches.
    pub fn update_record(&mut self, id: &str, patch: &RecordPatch) -> bool {
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            tracing::debug!(id, "update of unknown record ignored");
            return false;
        };
        patch.apply(record);
        record.updated_at = Utc::now().max(record.created_at);
        self.storage.save_records(&self.records);
        true
    }

    /// Removes every record with `id` and persists. Returns how many were removed.
    pub fn delete_record(&mut self, id: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let removed = before - self.records.len();
        tracing::debug!(id, removed, "deleted records");
        self.storage.save_records(&self.records);
        removed
    }

    pub fn update_settings(&mut self, patch: &SettingsPatch) {
        self.settings.merge(patch);
        self.storage.save_settings(&self.settings);
    }

    /// Loads the collection, seeding it from `seed` on the first run.
    ///
    /// The seed is used at most once: after it has been loaded the marker in
    /// storage makes every later call a plain read. If the seed cannot be
    /// fetched or parsed the stored collection is loaded instead and the
    /// seed is tried again next time.
    pub fn initialize_records<S: SeedSource>(&mut self, seed: &S) -> InitOutcome {
        if self.storage.is_seeded() {
            self.records = self.storage.load_records();
            return InitOutcome::Loaded(self.records.len());
        }

        match fetch_seed(seed) {
            Ok(seeded) => {
                self.records.clear();
                let count = seeded.len();
                for record in seeded {
                    self.add_record(record);
                }
                if count == 0 {
                    self.storage.save_records(&self.records);
                }
                self.storage.mark_seeded();
                tracing::info!(count, "seed data loaded");
                InitOutcome::Seeded(count)
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not load seed data, using stored records");
                self.records = self.storage.load_records();
                InitOutcome::SeedFallback(self.records.len())
            }
        }
    }

    /// Replaces the collection with the records in `document`.
    /// On failure nothing changes. Returns the number of imported records.
    pub fn import_json(&mut self, document: &str, check: ImportCheck) -> Result<usize> {
        let imported = self.storage.import_json(document, check)?;
        self.records = imported;
        Ok(self.records.len())
    }

    /// The in-memory collection as a pretty-printed JSON array.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    /// Distinct categories in use, sorted for display.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for record in &self.records {
            if !categories.contains(&record.category) {
                categories.push(record.category.clone());
            }
        }
        categories.sort_by(|a, b| query::locale_cmp(a, b));
        categories
    }

    pub fn query(&self, query: &Query) -> Vec<QueryHit<'_>> {
        query::run(&self.records, query)
    }

    pub fn summary(&self, today: NaiveDate) -> Summary {
        summary::summarize(&self.records, &self.settings, today)
    }
}

fn fetch_seed<S: SeedSource>(seed: &S) -> Result<Vec<Record>> {
    let document = seed.fetch()?;
    Ok(serde_json::from_str(&document)?)
}
