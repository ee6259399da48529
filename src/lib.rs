//! US holiday date computation and iCalendar generation.

pub mod assemble;
pub mod cache;
pub mod config;
pub mod holiday;
pub mod ical;
pub mod persistence;
pub mod resolve;

pub use assemble::{assemble, Assembly, AssembleError, AssembleOptions, CalendarEvent};
pub use cache::{MemoryCache, ResolutionCache};
pub use config::AppConfig;
pub use holiday::{us_federal_holidays, HolidayDefinition, HolidayRule};
pub use resolve::{resolve, ResolveError, ResolvedHoliday};
