//! # Ratecurve Core
//!
//! Core types for the Ratecurve term structure library.
//!
//! This crate provides the foundational building blocks used by the curve
//! and interpolation layers:
//!
//! - **Types**: [`Date`], [`Compounding`] and [`TermUnits`]
//! - **Day Count Conventions**: business/252, actual/360, actual/365 and 30/360
//! - **Business Day Calendars**: weekend and holiday-set calendars with a name registry
//!
//! ## Example
//!
//! ```rust
//! use ratecurve_core::prelude::*;
//!
//! let factor = Compounding::Discrete.compound(2.0, 0.05);
//! assert!((factor - 1.1025).abs() < 1e-12);
//!
//! let dc: DayCountConvention = "business/252".parse().unwrap();
//! assert_eq!(dc.time_factor(126.0, TermUnits::Day), 0.5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{
        ActualCalendar, Calendar, CalendarRegistry, HolidayCalendar, WeekendCalendar,
    };
    pub use crate::daycounts::DayCountConvention;
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Compounding, Date, TermUnits};
}

// Re-export commonly used types at crate root
pub use daycounts::DayCountConvention;
pub use error::{CoreError, CoreResult};
pub use types::{Compounding, Date, TermUnits};
