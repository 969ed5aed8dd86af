//! # Convex Core
//!
//! Core types for the Convex CDS pricing library.
//!
//! This crate provides the calendar plumbing the pricer sits on:
//!
//! - **Types**: [`Date`] and [`Frequency`]
//! - **Day Count Conventions**: ACT/360, ACT/365 Fixed, and the ACT/365F
//!   time between two zoned timestamps used to place everything on one
//!   time axis
//! - **Business Day Calendars**: weekend-only calendar and adjustment rules
//!
//! ## Example
//!
//! ```rust
//! use convex_core::prelude::*;
//!
//! let start = Date::from_ymd(2025, 3, 20).unwrap();
//! let end = Date::from_ymd(2025, 6, 20).unwrap();
//!
//! let yf = Act360.year_fraction(start, end);
//! assert!((yf - 92.0 / 360.0).abs() < 1e-15);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{BusinessDayConvention, Calendar, WeekendCalendar};
    pub use crate::daycounts::{time_between, Act360, Act365Fixed, DayCount, DayCountConvention};
    pub use crate::error::{ConvexError, ConvexResult};
    pub use crate::types::{Date, Frequency};
}

// Re-export commonly used types at crate root
pub use error::{ConvexError, ConvexResult};
pub use types::{Date, Frequency};
