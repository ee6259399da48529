use crate::holiday::{HolidayDefinition, HolidayRule};
use chrono::NaiveDate;
use serde_json::Error as SerdeJsonError;
use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum PersistenceError {
    Io(io::Error),
    Serialization(SerdeJsonError),
    Csv(csv::Error),
    InvalidData(String),
    DuplicateName(String),
    NotFound(PathBuf),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Io(err) => write!(f, "io error: {err}"),
            PersistenceError::Serialization(err) => write!(f, "serialization error: {err}"),
            PersistenceError::Csv(err) => write!(f, "csv error: {err}"),
            PersistenceError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            PersistenceError::DuplicateName(name) => {
                write!(f, "holiday '{name}' already exists")
            }
            PersistenceError::NotFound(path) => {
                write!(f, "file not found: {}", path.display())
            }
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<io::Error> for PersistenceError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<SerdeJsonError> for PersistenceError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<csv::Error> for PersistenceError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Validate a definition set before it is stored or evaluated.
///
/// Names must be unique and each rule's fields must be plausible. The day of
/// a fixed-date rule is checked against a leap year, so Feb 29 is accepted
/// while Feb 30 is not.
pub fn validate_definitions(defs: &[HolidayDefinition]) -> PersistenceResult<()> {
    let mut seen = HashSet::with_capacity(defs.len());
    for def in defs {
        validate_definition(def)?;
        if !seen.insert(def.name.as_str()) {
            return Err(PersistenceError::DuplicateName(def.name.clone()));
        }
    }
    Ok(())
}

pub fn validate_definition(def: &HolidayDefinition) -> PersistenceResult<()> {
    if def.name.trim().is_empty() {
        return Err(PersistenceError::InvalidData(
            "holiday name must not be empty".into(),
        ));
    }
    match def.rule {
        HolidayRule::FixedDate { month, day } => {
            // 2024 is a leap year, so Feb 29 validates.
            if NaiveDate::from_ymd_opt(2024, month, day).is_none() {
                return Err(PersistenceError::InvalidData(format!(
                    "holiday '{}' has invalid date: month {month}, day {day}",
                    def.name
                )));
            }
        }
        HolidayRule::NthWeekday { month, nth, .. } => {
            if !(1..=12).contains(&month) {
                return Err(PersistenceError::InvalidData(format!(
                    "holiday '{}' has invalid month {month}",
                    def.name
                )));
            }
            if !(1..=5).contains(&nth) {
                return Err(PersistenceError::InvalidData(format!(
                    "holiday '{}' has invalid occurrence {nth} (must be 1-5)",
                    def.name
                )));
            }
        }
        HolidayRule::LastWeekday { month, .. } => {
            if !(1..=12).contains(&month) {
                return Err(PersistenceError::InvalidData(format!(
                    "holiday '{}' has invalid month {month}",
                    def.name
                )));
            }
        }
        HolidayRule::Easter => {}
    }
    Ok(())
}

pub mod file;

pub use file::{
    add_holiday, export_resolved_to_csv, invalidate_cache_for, load_cache_from_json,
    load_holidays_from_json, remove_holiday, save_cache_to_json, save_holidays_to_json,
};
