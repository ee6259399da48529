use crate::persistence::PersistenceResult;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Runtime configuration for the CLI: file locations and the default span
/// of years to generate when no end year is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output_file: PathBuf,
    pub cache_file: PathBuf,
    pub holidays_file: PathBuf,
    pub default_year_range: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_file: PathBuf::from("us_holidays.ics"),
            cache_file: PathBuf::from("holiday_cache.json"),
            holidays_file: PathBuf::from("holidays.json"),
            default_year_range: 2,
        }
    }
}

impl AppConfig {
    /// Load from a JSON file; a missing file falls back to defaults, a
    /// malformed one is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let file = File::open(path)?;
        let config = serde_json::from_reader(file)?;
        Ok(config)
    }
}
