use super::backend::StorageBackend;
use super::{FIRST_LOAD_KEY, RECORDS_KEY, SETTINGS_KEY};
use crate::error::{ImportError, Result};
use crate::model::{Record, Settings};
use crate::validation::{is_structurally_valid, validate_record};
use serde_json::Value;

/// How thoroughly an import document is checked before it replaces the
/// stored collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportCheck {
    /// Presence and type of every field. Formats are not checked.
    #[default]
    Structural,
    /// Structural checks plus full field validation of each record.
    Strict,
}

/// Persistence gateway: records, settings and the seed marker on top of a
/// key-value backend.
pub struct Storage<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> Storage<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn try_load_records(&self) -> Result<Vec<Record>> {
        match self.backend.get(RECORDS_KEY)? {
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => Ok(Vec::new()),
        }
    }

    /// The stored collection, or an empty one if absent or unreadable.
    pub fn load_records(&self) -> Vec<Record> {
        self.try_load_records().unwrap_or_else(|err| {
            tracing::error!(error = %err, "failed to load records, starting empty");
            Vec::new()
        })
    }

    pub fn try_save_records(&self, records: &[Record]) -> Result<()> {
        let content = serde_json::to_string(records)?;
        self.backend.set(RECORDS_KEY, &content)
    }

    /// Overwrites the stored collection. Failures are logged, not returned.
    pub fn save_records(&self, records: &[Record]) {
        if let Err(err) = self.try_save_records(records) {
            tracing::error!(error = %err, count = records.len(), "failed to save records");
        }
    }

    pub fn try_load_settings(&self) -> Result<Option<Settings>> {
        match self.backend.get(SETTINGS_KEY)? {
            Some(content) => Ok(Some(serde_json::from_str(&content)?)),
            None => Ok(None),
        }
    }

    /// The stored settings, or `None` if absent or unreadable.
    pub fn load_settings(&self) -> Option<Settings> {
        self.try_load_settings().unwrap_or_else(|err| {
            tracing::error!(error = %err, "failed to load settings");
            None
        })
    }

    pub fn try_save_settings(&self, settings: &Settings) -> Result<()> {
        let content = serde_json::to_string(settings)?;
        self.backend.set(SETTINGS_KEY, &content)
    }

    pub fn save_settings(&self, settings: &Settings) {
        if let Err(err) = self.try_save_settings(settings) {
            tracing::error!(error = %err, "failed to save settings");
        }
    }

    /// Replaces the stored collection with the records in `document`.
    ///
    /// Nothing is written unless the document is an array whose every
    /// element passes `check`. Returns the imported records.
    pub fn import_json(&self, document: &str, check: ImportCheck) -> Result<Vec<Record>> {
        let records = parse_import(document, check).inspect_err(|err| {
            tracing::warn!(error = %err, "import rejected");
        })?;
        self.try_save_records(&records)?;
        tracing::info!(count = records.len(), "imported records");
        Ok(records)
    }

    /// The stored collection as a pretty-printed JSON array.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.load_records())?)
    }

    pub fn is_seeded(&self) -> bool {
        match self.backend.get(FIRST_LOAD_KEY) {
            Ok(value) => value.is_some_and(|v| v.trim() == "true"),
            Err(err) => {
                tracing::error!(error = %err, "failed to read seed marker");
                false
            }
        }
    }

    pub fn mark_seeded(&self) {
        if let Err(err) = self.backend.set(FIRST_LOAD_KEY, "true") {
            tracing::error!(error = %err, "failed to write seed marker");
        }
    }
}

fn parse_import(document: &str, check: ImportCheck) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(document)?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray.into());
    };

    if let Some(index) = items.iter().position(|item| !is_structurally_valid(item)) {
        return Err(ImportError::InvalidStructure { index }.into());
    }

    let records: Vec<Record> = serde_json::from_value(Value::Array(items))?;

    if check == ImportCheck::Strict {
        for (index, record) in records.iter().enumerate() {
            let report = validate_record(record);
            if !report.is_valid() {
                return Err(ImportError::FailedValidation {
                    index,
                    errors: report.messages(),
                }
                .into());
            }
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FintrackError;
    use crate::model::RecordDraft;
    use crate::store::mem_backend::MemBackend;

    fn sample_records() -> Vec<Record> {
        vec![
            Record::new(RecordDraft::new("Groceries", 54.2, "Food", "2024-01-01")),
            Record::new(RecordDraft::new("Rent", 500.0, "Housing", "2024-01-02")),
        ]
    }

    #[test]
    fn load_records_defaults_to_empty() {
        let storage = Storage::new(MemBackend::new());
        assert!(storage.load_records().is_empty());
    }

    #[test]
    fn save_then_load_records() {
        let storage = Storage::new(MemBackend::new());
        let records = sample_records();
        storage.save_records(&records);
        assert_eq!(storage.load_records(), records);
    }

    #[test]
    fn malformed_records_degrade_to_empty() {
        let backend = MemBackend::new();
        backend.insert_raw(RECORDS_KEY, "{not json");
        let storage = Storage::new(backend);

        assert!(storage.try_load_records().is_err());
        assert!(storage.load_records().is_empty());
    }

    #[test]
    fn save_failure_is_swallowed() {
        let storage = Storage::new(MemBackend::new());
        storage.save_records(&sample_records());
        storage.backend().set_simulate_write_error(true);

        storage.save_records(&[]);
        assert_eq!(storage.load_records().len(), 2);
    }

    #[test]
    fn settings_absent_or_malformed_is_none() {
        let storage = Storage::new(MemBackend::new());
        assert_eq!(storage.load_settings(), None);

        storage.backend().insert_raw(SETTINGS_KEY, "not json");
        assert_eq!(storage.load_settings(), None);

        let settings = Settings {
            base_currency: "EUR".into(),
            ..Default::default()
        };
        storage.save_settings(&settings);
        assert_eq!(storage.load_settings(), Some(settings));
    }

    #[test]
    fn export_is_pretty_printed() {
        let storage = Storage::new(MemBackend::new());
        storage.save_records(&sample_records());
        let exported = storage.export_json().unwrap();
        assert!(exported.starts_with("[\n  {\n    \"id\": "));
        assert!(exported.contains("\"createdAt\""));
    }

    #[test]
    fn export_import_round_trip_keeps_collection() {
        let storage = Storage::new(MemBackend::new());
        storage.save_records(&sample_records());
        let before = storage.backend().get(RECORDS_KEY).unwrap();

        let exported = storage.export_json().unwrap();
        storage
            .import_json(&exported, ImportCheck::Structural)
            .unwrap();

        assert_eq!(storage.backend().get(RECORDS_KEY).unwrap(), before);
    }

    #[test]
    fn import_rejects_non_array() {
        let storage = Storage::new(MemBackend::new());
        let err = storage
            .import_json(r#"{"id": "x"}"#, ImportCheck::Structural)
            .unwrap_err();
        assert!(matches!(
            err,
            FintrackError::Import(ImportError::NotAnArray)
        ));
        assert!(storage.backend().is_empty());
    }

    #[test]
    fn import_rejects_bad_structure_without_writing() {
        let storage = Storage::new(MemBackend::new());
        storage.save_records(&sample_records());

        let doc = r#"[{"id": "a", "description": "Tea", "amount": "3",
            "category": "Food", "date": "2024-01-01",
            "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"}]"#;
        let err = storage.import_json(doc, ImportCheck::Structural).unwrap_err();
        assert!(matches!(
            err,
            FintrackError::Import(ImportError::InvalidStructure { index: 0 })
        ));
        assert_eq!(storage.load_records().len(), 2);
    }

    #[test]
    fn import_rejects_unparseable_document() {
        let storage = Storage::new(MemBackend::new());
        let err = storage
            .import_json("not json", ImportCheck::Structural)
            .unwrap_err();
        assert!(matches!(err, FintrackError::Serialization(_)));
    }

    #[test]
    fn strict_import_applies_field_validation() {
        let storage = Storage::new(MemBackend::new());
        let doc = r#"[{"id": "a", "description": "pay pay", "amount": 3,
            "category": "Food", "date": "2024-01-01",
            "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"}]"#;

        let imported = storage.import_json(doc, ImportCheck::Structural).unwrap();
        assert_eq!(imported.len(), 1);

        let err = storage.import_json(doc, ImportCheck::Strict).unwrap_err();
        match err {
            FintrackError::Import(ImportError::FailedValidation { index, errors }) => {
                assert_eq!(index, 0);
                assert_eq!(errors, vec!["Description has duplicate words".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn seed_marker() {
        let storage = Storage::new(MemBackend::new());
        assert!(!storage.is_seeded());
        storage.mark_seeded();
        assert!(storage.is_seeded());
    }
}
