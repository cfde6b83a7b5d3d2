use super::backend::StorageBackend;
use crate::error::{FintrackError, Result};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// File-based storage: one JSON document per key under a root directory.
///
/// Keys are mapped to file names by replacing anything outside
/// `[A-Za-z0-9_-]` with `-`, so `finance:records` lives in
/// `finance-records.json`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", file_stem(key)))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(FintrackError::Io)?;
        }
        Ok(())
    }
}

fn file_stem(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

impl StorageBackend for FsBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(FintrackError::Io)?;
        Ok(Some(content))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;
        let path = self.key_path(key);

        let tmp_file = self
            .root
            .join(format!(".{}-{}.tmp", file_stem(key), Uuid::new_v4()));
        fs::write(&tmp_file, value).map_err(FintrackError::Io)?;
        fs::rename(&tmp_file, &path).map_err(FintrackError::Io)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path).map_err(FintrackError::Io)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;

    #[test]
    fn missing_key_reads_as_none() {
        let env = TestEnv::new();
        assert_eq!(env.backend.get("finance:records").unwrap(), None);
    }

    #[test]
    fn writes_one_file_per_key() {
        let env = TestEnv::new();
        env.backend.set("finance:records", "[]").unwrap();
        env.backend.set("finance:settings", "{}").unwrap();

        assert!(env.root.join("finance-records.json").exists());
        assert!(env.root.join("finance-settings.json").exists());
        assert_eq!(
            env.backend.get("finance:records").unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn overwrite_leaves_no_temp_files() {
        let env = TestEnv::new();
        env.backend.set("finance:records", "[1]").unwrap();
        env.backend.set("finance:records", "[2]").unwrap();

        let names: Vec<String> = fs::read_dir(&env.root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["finance-records.json".to_string()]);
        assert_eq!(
            env.backend.get("finance:records").unwrap().as_deref(),
            Some("[2]")
        );
    }

    #[test]
    fn creates_missing_root() {
        let env = TestEnv::new();
        let backend = FsBackend::new(env.root.join("nested").join("data"));
        backend.set("finance:firstLoad", "true").unwrap();
        assert_eq!(
            backend.get("finance:firstLoad").unwrap().as_deref(),
            Some("true")
        );
        backend.remove("finance:firstLoad").unwrap();
        assert_eq!(backend.get("finance:firstLoad").unwrap(), None);
    }
}
