use super::{PersistenceError, PersistenceResult};
use crate::cache::{MemoryCache, ResolutionCache};
use crate::holiday::HolidayDefinition;
use crate::resolve::ResolvedHoliday;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// On-disk shape of the holiday definition store.
#[derive(Serialize, Deserialize)]
struct HolidaySet {
    holidays: Vec<HolidayDefinition>,
}

pub fn load_holidays_from_json<P: AsRef<Path>>(
    path: P,
) -> PersistenceResult<Vec<HolidayDefinition>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PersistenceError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let set: HolidaySet = serde_json::from_reader(file)?;
    super::validate_definitions(&set.holidays)?;
    Ok(set.holidays)
}

pub fn save_holidays_to_json<P: AsRef<Path>>(
    path: P,
    defs: &[HolidayDefinition],
) -> PersistenceResult<()> {
    super::validate_definitions(defs)?;
    let file = File::create(path)?;
    let set = HolidaySet {
        holidays: defs.to_vec(),
    };
    serde_json::to_writer_pretty(file, &set)?;
    Ok(())
}

/// Add a definition to the store, validating it first.
///
/// The store on disk is untouched when validation fails. A missing store
/// file starts a new empty set.
pub fn add_holiday<P: AsRef<Path>>(path: P, def: HolidayDefinition) -> PersistenceResult<()> {
    super::validate_definition(&def)?;
    let path = path.as_ref();
    let mut defs = if path.exists() {
        load_holidays_from_json(path)?
    } else {
        Vec::new()
    };
    if defs.iter().any(|existing| existing.name == def.name) {
        return Err(PersistenceError::DuplicateName(def.name));
    }
    defs.push(def);
    save_holidays_to_json(path, &defs)
}

/// Remove a definition by name. Returns whether anything was removed;
/// an unknown name is not an error.
pub fn remove_holiday<P: AsRef<Path>>(path: P, name: &str) -> PersistenceResult<bool> {
    let mut defs = load_holidays_from_json(&path)?;
    let before = defs.len();
    defs.retain(|def| def.name != name);
    let removed = defs.len() != before;
    if removed {
        save_holidays_to_json(&path, &defs)?;
    }
    Ok(removed)
}

#[derive(Serialize, Deserialize)]
struct CacheEntry {
    name: String,
    year: i32,
    date: NaiveDate,
}

#[derive(Serialize, Deserialize)]
struct CacheSnapshot {
    entries: Vec<CacheEntry>,
}

/// Load the resolution cache; a missing or unreadable file degrades to an
/// empty cache with a warning rather than failing the run.
pub fn load_cache_from_json<P: AsRef<Path>>(path: P) -> MemoryCache {
    let path = path.as_ref();
    if !path.exists() {
        return MemoryCache::new();
    }
    let snapshot: CacheSnapshot = match File::open(path).map_err(PersistenceError::from).and_then(
        |file| serde_json::from_reader(file).map_err(PersistenceError::from),
    ) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            log::warn!(
                "failed to load cache from {}: {err}; starting with empty cache",
                path.display()
            );
            return MemoryCache::new();
        }
    };
    let mut cache = MemoryCache::new();
    for entry in snapshot.entries {
        cache.put(&entry.name, entry.year, entry.date);
    }
    cache
}

pub fn save_cache_to_json<P: AsRef<Path>>(path: P, cache: &MemoryCache) -> PersistenceResult<()> {
    let mut entries: Vec<CacheEntry> = cache
        .entries()
        .iter()
        .map(|((name, year), date)| CacheEntry {
            name: name.clone(),
            year: *year,
            date: *date,
        })
        .collect();
    // Stable on-disk order regardless of map iteration order.
    entries.sort_by(|a, b| (&a.name, a.year).cmp(&(&b.name, b.year)));
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &CacheSnapshot { entries })?;
    Ok(())
}

/// Invalidate cached resolutions for one holiday after its definition
/// changed. The cache is keyed by name alone, so a removed-then-readded
/// holiday would otherwise keep serving its old dates.
pub fn invalidate_cache_for<P: AsRef<Path>>(path: P, name: &str) -> PersistenceResult<()> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(());
    }
    let mut cache = load_cache_from_json(path);
    cache.remove_name(name);
    save_cache_to_json(path, &cache)
}

#[derive(Serialize)]
struct ResolvedCsvRecord<'a> {
    name: &'a str,
    date: String,
}

/// Export resolved holidays as `name,date` rows, a preview/diff aid.
pub fn export_resolved_to_csv<P: AsRef<Path>>(
    path: P,
    resolved: &[ResolvedHoliday],
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for holiday in resolved {
        writer.serialize(ResolvedCsvRecord {
            name: &holiday.name,
            date: holiday.date.format("%Y-%m-%d").to_string(),
        })?;
    }
    writer.flush()?;
    Ok(())
}
