use chrono::{NaiveDate, Weekday};
use holiday_tool::{
    assemble, AssembleError, AssembleOptions, HolidayDefinition, HolidayRule, MemoryCache,
    ResolutionCache,
};

fn fixed(name: &str, month: u32, day: u32) -> HolidayDefinition {
    HolidayDefinition::new(name, HolidayRule::FixedDate { month, day })
}

fn no_merge() -> AssembleOptions {
    AssembleOptions {
        reminder_days: Vec::new(),
        merge_fixed: false,
    }
}

#[test]
fn single_year_range_produces_events_for_that_year_only() {
    let defs = vec![HolidayDefinition::new(
        "Thanksgiving",
        HolidayRule::NthWeekday {
            month: 11,
            weekday: Weekday::Thu,
            nth: 4,
        },
    )];
    let assembly = assemble(&defs, 2025, 2025, &no_merge(), None).unwrap();
    assert_eq!(assembly.events.len(), 1);
    assert_eq!(
        assembly.events[0].date,
        NaiveDate::from_ymd_opt(2025, 11, 27).unwrap()
    );
    assert!(assembly.warnings.is_empty());
}

#[test]
fn reversed_range_is_an_error() {
    let defs = vec![fixed("Christmas Day", 12, 25)];
    let result = assemble(&defs, 2026, 2025, &no_merge(), None);
    assert_eq!(
        result,
        Err(AssembleError::InvalidRange {
            start: 2026,
            end: 2025,
        })
    );
}

#[test]
fn empty_definitions_yield_empty_events() {
    let assembly = assemble(&[], 2025, 2025, &no_merge(), None).unwrap();
    assert!(assembly.events.is_empty());
    assert!(assembly.warnings.is_empty());
}

#[test]
fn bad_definition_is_skipped_with_warnings() {
    let defs = vec![fixed("Independence Day", 7, 4), fixed("Broken", 2, 30)];
    let assembly = assemble(&defs, 2024, 2025, &no_merge(), None).unwrap();

    // The good definition still resolved for both years.
    assert_eq!(assembly.events.len(), 2);
    assert!(assembly.events.iter().all(|e| e.name == "Independence Day"));

    // The bad one produced one warning per year.
    assert_eq!(assembly.warnings.len(), 2);
    assert_eq!(assembly.warnings[0].name, "Broken");
    assert_eq!(assembly.warnings[0].year, 2024);
    assert_eq!(assembly.warnings[1].year, 2025);
}

#[test]
fn all_failures_abort_the_run() {
    let defs = vec![fixed("Broken", 2, 30)];
    let result = assemble(&defs, 2024, 2025, &no_merge(), None);
    assert_eq!(
        result,
        Err(AssembleError::AllResolutionsFailed { failures: 2 })
    );
}

#[test]
fn merge_collapses_plain_fixed_holidays_into_one_annual_event() {
    let defs = vec![fixed("Christmas Day", 12, 25)];
    let options = AssembleOptions::default();

    let merged = assemble(&defs, 2025, 2027, &options, None).unwrap();
    assert_eq!(merged.events.len(), 1);
    assert!(merged.events[0].annual);
    assert_eq!(
        merged.events[0].date,
        NaiveDate::from_ymd_opt(2025, 12, 25).unwrap()
    );

    let unmerged = assemble(&defs, 2025, 2027, &no_merge(), None).unwrap();
    assert_eq!(unmerged.events.len(), 3);
    assert!(unmerged.events.iter().all(|e| !e.annual));
}

#[test]
fn leap_day_holidays_resolve_per_year_even_when_merging() {
    // Feb 29 exists only in leap years, so one annual event cannot stand in
    // for the range; the merge must not change which occurrences come out.
    let defs = vec![fixed("Leap Day", 2, 29)];
    let assembly = assemble(&defs, 2025, 2028, &AssembleOptions::default(), None).unwrap();

    assert_eq!(assembly.events.len(), 1);
    assert!(!assembly.events[0].annual);
    assert_eq!(
        assembly.events[0].date,
        NaiveDate::from_ymd_opt(2028, 2, 29).unwrap()
    );
    // 2025-2027 have no Feb 29.
    assert_eq!(assembly.warnings.len(), 3);

    let unmerged = assemble(&defs, 2025, 2028, &no_merge(), None).unwrap();
    assert_eq!(assembly.events, unmerged.events);
}

#[test]
fn observed_fixed_holidays_are_never_merged() {
    // The observed date varies by year, so an annual rule would be wrong.
    let defs = vec![fixed("Independence Day", 7, 4).observed()];
    let assembly = assemble(&defs, 2025, 2026, &AssembleOptions::default(), None).unwrap();
    assert_eq!(assembly.events.len(), 2);
    assert!(assembly.events.iter().all(|e| !e.annual));
    // 2026: Saturday shifted back to Friday July 3.
    assert_eq!(
        assembly.events[1].date,
        NaiveDate::from_ymd_opt(2026, 7, 3).unwrap()
    );
}

#[test]
fn events_are_ordered_by_definition_then_year() {
    let defs = vec![fixed("Alpha", 3, 1), fixed("Beta", 1, 15)];
    let assembly = assemble(&defs, 2025, 2026, &no_merge(), None).unwrap();
    let summary: Vec<(&str, i32)> = assembly
        .events
        .iter()
        .map(|e| (e.name.as_str(), chrono::Datelike::year(&e.date)))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Alpha", 2025),
            ("Alpha", 2026),
            ("Beta", 2025),
            ("Beta", 2026),
        ]
    );
}

#[test]
fn repeated_runs_produce_identical_output() {
    let defs = holiday_tool::us_federal_holidays();
    let options = AssembleOptions::default();
    let first = assemble(&defs, 2025, 2027, &options, None).unwrap();
    let second = assemble(&defs, 2025, 2027, &options, None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn per_definition_reminders_override_global_ones() {
    let mut with_own = fixed("Anniversary", 6, 1);
    with_own.reminder_days = vec![1, 7];
    let without = fixed("Plain", 8, 1);

    let options = AssembleOptions {
        reminder_days: vec![3],
        merge_fixed: false,
    };
    let assembly = assemble(&[with_own, without], 2025, 2025, &options, None).unwrap();
    assert_eq!(assembly.events[0].reminder_days, vec![1, 7]);
    assert_eq!(assembly.events[1].reminder_days, vec![3]);
}

#[test]
fn assembler_populates_a_supplied_cache() {
    let defs = vec![HolidayDefinition::new(
        "Thanksgiving",
        HolidayRule::NthWeekday {
            month: 11,
            weekday: Weekday::Thu,
            nth: 4,
        },
    )];
    let mut cache = MemoryCache::new();
    assemble(&defs, 2025, 2026, &no_merge(), Some(&mut cache)).unwrap();
    assert_eq!(
        cache.get("Thanksgiving", 2025),
        Some(NaiveDate::from_ymd_opt(2025, 11, 27).unwrap())
    );
    assert_eq!(cache.len(), 2);
}

#[test]
fn one_cache_serves_merged_and_per_year_resolution() {
    let defs = vec![
        fixed("Christmas Day", 12, 25),
        HolidayDefinition::new(
            "Thanksgiving",
            HolidayRule::NthWeekday {
                month: 11,
                weekday: Weekday::Thu,
                nth: 4,
            },
        ),
    ];
    let mut cache = MemoryCache::new();
    assemble(&defs, 2025, 2026, &AssembleOptions::default(), Some(&mut cache)).unwrap();

    // The merged definition cached its start year; the nth-weekday one
    // cached every year in the range.
    assert_eq!(cache.len(), 3);
    assert!(cache.get("Christmas Day", 2025).is_some());
    assert!(cache.get("Thanksgiving", 2025).is_some());
    assert!(cache.get("Thanksgiving", 2026).is_some());
}

#[test]
fn cached_dates_are_trusted_over_fresh_resolution() {
    let defs = vec![fixed("Independence Day", 7, 4)];
    let mut cache = MemoryCache::new();
    let planted = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
    cache.put("Independence Day", 2025, planted);

    let assembly = assemble(&defs, 2025, 2025, &no_merge(), Some(&mut cache)).unwrap();
    assert_eq!(assembly.events[0].date, planted);
}
