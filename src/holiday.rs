use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// How a holiday's date is derived for a given year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HolidayRule {
    /// Same calendar day every year (e.g. July 4).
    FixedDate { month: u32, day: u32 },
    /// The nth occurrence of a weekday in a month (e.g. 3rd Monday in January).
    NthWeekday { month: u32, weekday: Weekday, nth: u32 },
    /// The last occurrence of a weekday in a month (e.g. last Monday in May).
    LastWeekday { month: u32, weekday: Weekday },
    /// Easter Sunday via the Gregorian computus.
    Easter,
}

/// A named holiday plus the rule that produces its date.
///
/// `observed` requests the US federal weekend shift: a holiday landing on
/// Saturday is observed the preceding Friday, on Sunday the following Monday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayDefinition {
    pub name: String,
    pub rule: HolidayRule,
    #[serde(default)]
    pub observed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reminder_days: Vec<u32>,
}

impl HolidayDefinition {
    pub fn new(name: impl Into<String>, rule: HolidayRule) -> Self {
        Self {
            name: name.into(),
            rule,
            observed: false,
            description: None,
            reminder_days: Vec::new(),
        }
    }

    pub fn observed(mut self) -> Self {
        self.observed = true;
        self
    }

    /// True when the rule produces the same month/day every year, so the
    /// assembler may emit a single annually-recurring event instead of one
    /// event per year.
    ///
    /// Feb 29 is excluded: it does not exist every year, so the leap years
    /// it does fall in must be resolved one by one.
    pub fn is_annual_candidate(&self) -> bool {
        match self.rule {
            HolidayRule::FixedDate { month, day } => !(month == 2 && day == 29) && !self.observed,
            _ => false,
        }
    }
}

/// The standard US federal holiday list.
///
/// Fixed-date federal holidays carry the weekend observance shift; the
/// Monday/Thursday holidays never fall on a weekend and do not need it.
pub fn us_federal_holidays() -> Vec<HolidayDefinition> {
    vec![
        HolidayDefinition::new(
            "New Year's Day",
            HolidayRule::FixedDate { month: 1, day: 1 },
        )
        .observed(),
        HolidayDefinition::new(
            "Martin Luther King Jr. Day",
            HolidayRule::NthWeekday {
                month: 1,
                weekday: Weekday::Mon,
                nth: 3,
            },
        ),
        HolidayDefinition::new(
            "Presidents' Day",
            HolidayRule::NthWeekday {
                month: 2,
                weekday: Weekday::Mon,
                nth: 3,
            },
        ),
        HolidayDefinition::new(
            "Memorial Day",
            HolidayRule::LastWeekday {
                month: 5,
                weekday: Weekday::Mon,
            },
        ),
        HolidayDefinition::new(
            "Juneteenth",
            HolidayRule::FixedDate { month: 6, day: 19 },
        )
        .observed(),
        HolidayDefinition::new(
            "Independence Day",
            HolidayRule::FixedDate { month: 7, day: 4 },
        )
        .observed(),
        HolidayDefinition::new(
            "Labor Day",
            HolidayRule::NthWeekday {
                month: 9,
                weekday: Weekday::Mon,
                nth: 1,
            },
        ),
        HolidayDefinition::new(
            "Columbus Day",
            HolidayRule::NthWeekday {
                month: 10,
                weekday: Weekday::Mon,
                nth: 2,
            },
        ),
        HolidayDefinition::new(
            "Veterans Day",
            HolidayRule::FixedDate { month: 11, day: 11 },
        )
        .observed(),
        HolidayDefinition::new(
            "Thanksgiving Day",
            HolidayRule::NthWeekday {
                month: 11,
                weekday: Weekday::Thu,
                nth: 4,
            },
        ),
        HolidayDefinition::new(
            "Christmas Day",
            HolidayRule::FixedDate { month: 12, day: 25 },
        )
        .observed(),
    ]
}
