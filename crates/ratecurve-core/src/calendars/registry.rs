//! Name-based calendar lookup.
//!
//! ```rust
//! use ratecurve_core::calendars::{Calendar, CalendarRegistry, HolidayCalendar};
//! use ratecurve_core::types::Date;
//!
//! let mut registry = CalendarRegistry::new();
//! registry.register(HolidayCalendar::from_dates(
//!     "b3",
//!     vec![Date::from_ymd(2025, 1, 1).unwrap()],
//! ));
//!
//! let cal = registry.get("b3").unwrap();
//! assert!(cal.is_holiday(Date::from_ymd(2025, 1, 1).unwrap()));
//! assert!(CalendarRegistry::global().get("weekends").is_ok());
//! ```

use std::collections::HashMap;
use std::sync::OnceLock;

use super::{ActualCalendar, Calendar, WeekendCalendar};
use crate::error::{CoreError, CoreResult};

/// Maps calendar names to calendar implementations.
///
/// A new registry contains the builtin `"actual"` and `"weekends"`
/// calendars. Lookups are case-sensitive.
pub struct CalendarRegistry {
    calendars: HashMap<String, Box<dyn Calendar>>,
}

/// Global read-only registry of builtin calendars.
static GLOBAL_REGISTRY: OnceLock<CalendarRegistry> = OnceLock::new();

impl CalendarRegistry {
    /// Returns the global registry.
    ///
    /// The registry is lazily initialized on first access and only holds
    /// the builtin calendars.
    #[must_use]
    pub fn global() -> &'static Self {
        GLOBAL_REGISTRY.get_or_init(Self::new)
    }

    /// Creates a registry holding the builtin calendars.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            calendars: HashMap::new(),
        };
        registry.register(ActualCalendar);
        registry.register(WeekendCalendar);
        registry
    }

    /// Registers a calendar under its own name, replacing any previous entry.
    pub fn register<C: Calendar + 'static>(&mut self, calendar: C) {
        log::debug!("registering calendar '{}'", calendar.name());
        self.calendars
            .insert(calendar.name().to_string(), Box::new(calendar));
    }

    /// Looks up a calendar by name.
    pub fn get(&self, name: &str) -> CoreResult<&dyn Calendar> {
        self.calendars
            .get(name)
            .map(AsRef::as_ref)
            .ok_or_else(|| CoreError::calendar_error(format!("unknown calendar '{name}'")))
    }

    /// Returns true if a calendar is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.calendars.contains_key(name)
    }

    /// Registered calendar names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.calendars.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for CalendarRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CalendarRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarRegistry")
            .field("calendars", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendars::HolidayCalendar;
    use crate::types::Date;

    #[test]
    fn test_builtins() {
        let registry = CalendarRegistry::global();
        assert_eq!(registry.names(), vec!["actual", "weekends"]);
        assert_eq!(registry.get("actual").unwrap().name(), "actual");
    }

    #[test]
    fn test_unknown_calendar() {
        let err = CalendarRegistry::new().get("nowhere").err().unwrap();
        assert!(matches!(err, CoreError::CalendarError { .. }));
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = CalendarRegistry::new();
        let new_year = Date::from_ymd(2025, 1, 1).unwrap();
        registry.register(HolidayCalendar::from_dates("b3", vec![new_year]));
        assert!(registry.contains("b3"));
        assert!(registry.get("b3").unwrap().is_holiday(new_year));

        registry.register(HolidayCalendar::new("b3"));
        assert!(!registry.get("b3").unwrap().is_holiday(new_year));
    }
}
