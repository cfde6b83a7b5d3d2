//! # API Facade
//!
//! The API layer is a **thin facade** over the record store. It is the
//! single entry point for presentation code, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Validates** user input before it reaches the store
//! - **Assigns identity** (ids and timestamps) to new records
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Storage details**: persistence policy lives in `store/`
//! - **Query logic**: filtering, sorting and highlighting live in `query.rs`
//! - **Presentation**: returns data structures, not formatted strings
//!
//! ## Generic Over StorageBackend
//!
//! `FintrackApi<B: StorageBackend>`:
//! - Production: `FintrackApi<FsBackend>`
//! - Testing: `FintrackApi<MemBackend>`

use crate::error::{FintrackError, Result};
use crate::model::{Record, RecordDraft, RecordPatch, Settings, SettingsPatch};
use crate::query::{Query, QueryHit};
use crate::records::{InitOutcome, RecordStore};
use crate::seed::SeedSource;
use crate::store::{ImportCheck, StorageBackend};
use crate::summary::Summary;
use crate::validation::{validate_draft, validate_record, ValidationReport};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_records: Vec<Record>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_records(mut self, records: Vec<Record>) -> Self {
        self.affected_records = records;
        self
    }
}

/// The main API facade for fintrack operations.
pub struct FintrackApi<B: StorageBackend> {
    store: RecordStore<B>,
}

impl<B: StorageBackend> FintrackApi<B> {
    pub fn new(store: RecordStore<B>) -> Self {
        Self { store }
    }

    pub fn open(backend: B) -> Self {
        Self::new(RecordStore::open(backend))
    }

    pub fn close(self) -> B {
        self.store.close()
    }

    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    pub fn initialize<S: SeedSource>(&mut self, seed: &S) -> CmdResult {
        let mut result = CmdResult::default();
        match self.store.initialize_records(seed) {
            InitOutcome::Seeded(count) => {
                result.add_message(CmdMessage::info(format!(
                    "Loaded {} sample records",
                    count
                )));
            }
            InitOutcome::SeedFallback(_) => {
                result.add_message(CmdMessage::warning(
                    "Sample records could not be loaded; using saved records",
                ));
            }
            InitOutcome::Loaded(_) => {}
        }
        result
    }

    pub fn validate(&self, draft: &RecordDraft) -> ValidationReport {
        validate_draft(draft)
    }

    /// Validates `draft` and stores it as a new record.
    pub fn create_record(&mut self, draft: RecordDraft) -> Result<CmdResult> {
        let report = validate_draft(&draft);
        if !report.is_valid() {
            return Err(FintrackError::Invalid(report));
        }

        let record = Record::new(draft);
        self.store.add_record(record.clone());

        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Record added: {}",
            record.description
        )));
        Ok(result.with_affected_records(vec![record]))
    }

    /// Applies `patch` to the record with `id` if the merged record is valid.
    ///
    /// An unknown id is reported as a warning and changes nothing.
    pub fn edit_record(&mut self, id: &str, patch: RecordPatch) -> Result<CmdResult> {
        let mut result = CmdResult::default();

        let Some(existing) = self.store.get(id) else {
            result.add_message(CmdMessage::warning(format!("No record with id {}", id)));
            return Ok(result);
        };

        let mut merged = existing.clone();
        patch.apply(&mut merged);
        let report = validate_record(&merged);
        if !report.is_valid() {
            return Err(FintrackError::Invalid(report));
        }

        self.store.update_record(id, &patch);
        let updated = self.store.get(id).cloned().into_iter().collect();
        result.add_message(CmdMessage::success(format!("Record updated: {}", id)));
        Ok(result.with_affected_records(updated))
    }

    pub fn delete_record(&mut self, id: &str) -> Result<CmdResult> {
        let deleted: Vec<Record> = self.store.get(id).cloned().into_iter().collect();
        let removed = self.store.delete_record(id);

        let mut result = CmdResult::default();
        if removed == 0 {
            result.add_message(CmdMessage::warning(format!("No record with id {}", id)));
        } else {
            result.add_message(CmdMessage::success(format!("Record deleted: {}", id)));
        }
        Ok(result.with_affected_records(deleted))
    }

    pub fn settings(&self) -> &Settings {
        self.store.settings()
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) -> Result<CmdResult> {
        let mut result = CmdResult::default();
        if patch.is_empty() {
            result.add_message(CmdMessage::info("Nothing to update"));
            return Ok(result);
        }
        self.store.update_settings(&patch);
        result.add_message(CmdMessage::success("Settings saved"));
        Ok(result)
    }

    pub fn list(&self, query: &Query) -> Vec<QueryHit<'_>> {
        self.store.query(query)
    }

    pub fn categories(&self) -> Vec<String> {
        self.store.categories()
    }

    pub fn summary(&self, today: NaiveDate) -> Summary {
        self.store.summary(today)
    }

    pub fn import_json(&mut self, document: &str, check: ImportCheck) -> Result<CmdResult> {
        let count = self.store.import_json(document, check)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Imported {} records",
            count
        )));
        Ok(result)
    }

    pub fn export_json(&self) -> Result<String> {
        self.store.export_json()
    }
}
