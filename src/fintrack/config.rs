use crate::error::{FintrackError, Result};
use crate::query::{default_search_fields, SearchField, SortKey};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_SORT: &str = "date-desc";

/// Configuration for fintrack, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FintrackConfig {
    /// Seed document loaded on first run. The bundled sample is used when unset.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,

    /// Sort applied by `list` when none is given (e.g. "amount-desc")
    #[serde(default = "default_sort")]
    pub default_sort: String,

    /// Fields the search pattern is matched against
    #[serde(default = "default_search_fields")]
    pub search_fields: Vec<SearchField>,
}

fn default_sort() -> String {
    DEFAULT_SORT.to_string()
}

impl Default for FintrackConfig {
    fn default() -> Self {
        Self {
            seed_path: None,
            default_sort: default_sort(),
            search_fields: default_search_fields(),
        }
    }
}

impl FintrackConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(FintrackError::Io)?;
        let config: FintrackConfig =
            serde_json::from_str(&content).map_err(FintrackError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(FintrackError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(FintrackError::Serialization)?;
        fs::write(config_path, content).map_err(FintrackError::Io)?;
        Ok(())
    }

    pub fn sort_key(&self) -> SortKey {
        SortKey::parse(&self.default_sort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;

    #[test]
    fn test_default_config() {
        let config = FintrackConfig::default();
        assert_eq!(config.seed_path, None);
        assert_eq!(config.sort_key(), SortKey::DateDesc);
        assert_eq!(
            config.search_fields,
            vec![SearchField::Description, SearchField::Category]
        );
    }

    #[test]
    fn test_load_missing_config() {
        let env = TestEnv::new();
        let config = FintrackConfig::load(env.root.join("absent")).unwrap();
        assert_eq!(config, FintrackConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let env = TestEnv::new();
        let config = FintrackConfig {
            seed_path: Some(PathBuf::from("/tmp/seed.json")),
            default_sort: "amount-asc".to_string(),
            search_fields: vec![SearchField::Category],
        };
        config.save(&env.root).unwrap();

        let loaded = FintrackConfig::load(&env.root).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.sort_key(), SortKey::AmountAsc);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let env = TestEnv::new();
        fs::write(
            env.root.join(CONFIG_FILENAME),
            r#"{"search_fields": ["description"]}"#,
        )
        .unwrap();

        let loaded = FintrackConfig::load(&env.root).unwrap();
        assert_eq!(loaded.default_sort, "date-desc");
        assert_eq!(loaded.search_fields, vec![SearchField::Description]);
    }

    #[test]
    fn test_unknown_sort_is_unsorted() {
        let config = FintrackConfig {
            default_sort: "random".to_string(),
            ..Default::default()
        };
        assert_eq!(config.sort_key(), SortKey::Unsorted);
    }
}
