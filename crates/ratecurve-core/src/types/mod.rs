//! Domain types for term structure calculations.
//!
//! - [`Date`]: Calendar date used as a curve reference date
//! - [`Compounding`]: Interest compounding convention
//! - [`TermUnits`]: Units of a term (days, months, years)

mod compounding;
mod date;
mod units;

pub use compounding::Compounding;
pub use date::Date;
pub use units::TermUnits;
