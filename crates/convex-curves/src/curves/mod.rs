//! Concrete curve implementations.

mod isda;

pub use isda::IsdaCurve;
