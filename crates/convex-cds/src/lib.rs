//! # Convex CDS
//!
//! ISDA standard model pricing for credit default swaps.
//!
//! This crate provides:
//!
//! - **Contracts**: [`CdsContract`], a CDS with every date already expressed
//!   as an ACT/365F time from the pricing date, and [`CdsDefinition`], the
//!   dated trade that converts to one
//! - **Schedules**: ISDA premium schedule generation ([`CdsPremiumSchedule`])
//! - **Pricing**: [`IsdaApproxPricer`], which values the fee leg (with
//!   accrual on default) and the contingent leg by piecewise closed-form
//!   integration, and calibrates a flat hazard rate to a quoted spread
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use convex_cds::prelude::*;
//! use convex_core::Date;
//! use convex_curves::IsdaCurve;
//!
//! let start = Date::from_ymd(2025, 3, 20).unwrap();
//! let maturity = Date::from_ymd(2030, 6, 20).unwrap();
//! let trade = CdsDefinition::isda_standard(start, maturity, 10_000_000.0, 0.01, 0.4).unwrap();
//!
//! let pricing = Date::from_ymd(2025, 3, 20).unwrap();
//! let stepin = Date::from_ymd(2025, 3, 21).unwrap();
//! let cds = trade.to_contract(pricing, stepin).unwrap();
//!
//! let discount = IsdaCurve::new("USD", vec![1.0, 5.0, 10.0], vec![0.03, 0.035, 0.04]).unwrap();
//! let hazard = IsdaCurve::flat("ACME", 5.0, 0.02).unwrap();
//!
//! let pricer = IsdaApproxPricer::default();
//! let upfront = pricer
//!     .calculate_upfront_charge(
//!         &cds,
//!         &discount,
//!         &hazard,
//!         &Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap(),
//!         &Utc.with_ymd_and_hms(2025, 3, 21, 0, 0, 0).unwrap(),
//!         &Utc.with_ymd_and_hms(2025, 3, 25, 0, 0, 0).unwrap(),
//!         true,
//!     )
//!     .unwrap();
//!
//! // 2% hazard at 40% recovery is worth ~120bp running, above the 100bp coupon
//! assert!(upfront > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]

pub mod config;
pub mod contingent_leg;
pub mod contract;
pub mod definition;
pub mod error;
pub mod fee_leg;
pub mod pricer;
pub mod schedule;
pub mod timeline;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::IsdaPricerConfig;
    pub use crate::contract::{CdsContract, CdsContractBuilder, CdsCoupon};
    pub use crate::definition::CdsDefinition;
    pub use crate::error::{CdsError, CdsResult};
    pub use crate::pricer::{IsdaApproxPricer, ValuationContext};
    pub use crate::schedule::{CdsPremiumPeriod, CdsPremiumSchedule};
    pub use crate::timeline::{HazardKnots, Timeline};
}

pub use config::IsdaPricerConfig;
pub use contract::{CdsContract, CdsCoupon};
pub use definition::CdsDefinition;
pub use error::{CdsError, CdsResult};
pub use pricer::IsdaApproxPricer;
pub use schedule::CdsPremiumSchedule;

/// Pricing epoch: every time is measured in years from the pricing date.
pub const PRICING_TIME: f64 = 0.0;

/// One calendar day under ACT/365F.
pub const ONE_DAY_ACT_365F: f64 = 1.0 / 365.0;

/// Half a calendar day under ACT/365F.
pub const HALF_DAY_ACT_365F: f64 = 0.5 / 365.0;

/// Below this `|(lambda + f) * dt|` the leg integrals use their Taylor series.
pub(crate) const SERIES_EXPANSION_LIMIT: f64 = 1.0e-3;
