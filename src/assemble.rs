use crate::cache::ResolutionCache;
use crate::holiday::HolidayDefinition;
use crate::resolve::{resolve, ResolveError, ResolvedHoliday};
use chrono::NaiveDate;
use std::fmt;

/// One all-day calendar event ready for serialization.
///
/// `annual` marks an event that stands in for every year of the requested
/// range via a yearly recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub name: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub annual: bool,
    pub reminder_days: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Reminder offsets (whole days before the event) applied to every event
    /// that does not carry its own.
    pub reminder_days: Vec<u32>,
    /// Collapse fixed-date holidays without an observance shift into a single
    /// annually-recurring event instead of one event per year.
    pub merge_fixed: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            reminder_days: Vec::new(),
            merge_fixed: true,
        }
    }
}

/// A (definition, year) pair that failed to resolve and was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionWarning {
    pub name: String,
    pub year: i32,
    pub error: ResolveError,
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not resolve '{}' for {}: {}",
            self.name, self.year, self.error
        )
    }
}

/// Assembly output: the events that resolved, plus the pairs that did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub events: Vec<CalendarEvent>,
    pub warnings: Vec<ResolutionWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssembleError {
    InvalidRange { start: i32, end: i32 },
    AllResolutionsFailed { failures: usize },
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssembleError::InvalidRange { start, end } => {
                write!(f, "invalid year range: {start} to {end} (start must not exceed end)")
            }
            AssembleError::AllResolutionsFailed { failures } => {
                write!(f, "all {failures} holiday resolutions failed")
            }
        }
    }
}

impl std::error::Error for AssembleError {}

/// Build calendar events for every definition over `[start_year, end_year]`.
///
/// A single bad definition must not abort the run: per-pair resolution
/// failures are logged, recorded as warnings and skipped. Only structural
/// problems error out — a reversed range, or every single pair failing.
/// Events come out grouped by definition order, then year ascending, so
/// repeated runs over unchanged input serialize byte-identically.
pub fn assemble(
    defs: &[HolidayDefinition],
    start_year: i32,
    end_year: i32,
    options: &AssembleOptions,
    mut cache: Option<&mut dyn ResolutionCache>,
) -> Result<Assembly, AssembleError> {
    if start_year > end_year {
        return Err(AssembleError::InvalidRange {
            start: start_year,
            end: end_year,
        });
    }

    let mut events = Vec::new();
    let mut warnings = Vec::new();
    let mut attempted = 0usize;

    for def in defs {
        if options.merge_fixed && def.is_annual_candidate() {
            // One event with a yearly recurrence covers the whole range.
            attempted += 1;
            match resolve_cached(def, start_year, reborrow(&mut cache)) {
                Ok(resolved) => events.push(event_from(def, resolved, true, options)),
                Err(error) => warn_skip(&mut warnings, def, start_year, error),
            }
            continue;
        }

        for year in start_year..=end_year {
            attempted += 1;
            log::debug!("resolving '{}' for {}", def.name, year);
            match resolve_cached(def, year, reborrow(&mut cache)) {
                Ok(resolved) => events.push(event_from(def, resolved, false, options)),
                Err(error) => warn_skip(&mut warnings, def, year, error),
            }
        }
    }

    if attempted > 0 && events.is_empty() {
        return Err(AssembleError::AllResolutionsFailed {
            failures: warnings.len(),
        });
    }

    Ok(Assembly { events, warnings })
}

// Hand the cache to one resolution at a time without giving up the original
// borrow for the rest of the loop.
fn reborrow<'a>(
    cache: &'a mut Option<&mut dyn ResolutionCache>,
) -> Option<&'a mut dyn ResolutionCache> {
    match cache {
        Some(cache) => Some(&mut **cache),
        None => None,
    }
}

fn resolve_cached(
    def: &HolidayDefinition,
    year: i32,
    cache: Option<&mut dyn ResolutionCache>,
) -> Result<ResolvedHoliday, ResolveError> {
    let Some(cache) = cache else {
        return resolve(def, year);
    };

    if let Some(date) = cache.get(&def.name, year) {
        return Ok(ResolvedHoliday {
            name: def.name.clone(),
            date,
        });
    }
    let resolved = resolve(def, year)?;
    cache.put(&def.name, year, resolved.date);
    Ok(resolved)
}

fn event_from(
    def: &HolidayDefinition,
    resolved: ResolvedHoliday,
    annual: bool,
    options: &AssembleOptions,
) -> CalendarEvent {
    let reminder_days = if def.reminder_days.is_empty() {
        options.reminder_days.clone()
    } else {
        def.reminder_days.clone()
    };
    CalendarEvent {
        name: resolved.name,
        date: resolved.date,
        description: def.description.clone(),
        annual,
        reminder_days,
    }
}

fn warn_skip(
    warnings: &mut Vec<ResolutionWarning>,
    def: &HolidayDefinition,
    year: i32,
    error: ResolveError,
) {
    let warning = ResolutionWarning {
        name: def.name.clone(),
        year,
        error,
    };
    log::warn!("{warning}");
    warnings.push(warning);
}
