//! Domain types shared across the library.
//!
//! - [`Date`]: Calendar date for financial calculations
//! - [`Frequency`]: Premium payment frequency

mod date;
mod frequency;

pub use date::Date;
pub use frequency::Frequency;
