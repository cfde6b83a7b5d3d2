//! Sources for the one-time seed document loaded on first run.

use crate::error::{FintrackError, Result};
use std::fs;
use std::path::PathBuf;

const BUNDLED_SEED: &str = include_str!("seed.json");

/// Produces the raw seed document (a JSON array of records).
pub trait SeedSource {
    fn fetch(&self) -> Result<String>;
}

/// The sample document compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledSeed;

impl SeedSource for BundledSeed {
    fn fetch(&self) -> Result<String> {
        Ok(BUNDLED_SEED.to_string())
    }
}

/// A seed document read from disk.
#[derive(Debug, Clone)]
pub struct FileSeed {
    path: PathBuf,
}

impl FileSeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SeedSource for FileSeed {
    fn fetch(&self) -> Result<String> {
        if !self.path.exists() {
            return Err(FintrackError::Seed(format!(
                "{} does not exist",
                self.path.display()
            )));
        }
        fs::read_to_string(&self.path).map_err(FintrackError::Io)
    }
}

/// A seed document held in memory.
#[derive(Debug, Clone)]
pub struct StaticSeed(pub String);

impl SeedSource for StaticSeed {
    fn fetch(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Never yields a document; first run falls back to stored data.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSeed;

impl SeedSource for NoSeed {
    fn fetch(&self) -> Result<String> {
        Err(FintrackError::Seed("no seed configured".to_string()))
    }
}
