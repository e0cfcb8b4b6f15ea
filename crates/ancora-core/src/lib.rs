//! # Ancora Core
//!
//! Shared primitives for the Ancora curve fitting library:
//!
//! - Serial day-number date arithmetic ([`types::date`])
//! - Cash flow value types ([`types::cashflow`])
//! - Quote sentinels and diff tolerances ([`types::quote`])
//!
//! Everything in this crate is deliberately small and dependency-light; the
//! model layers (`ancora-curves`, `ancora-bonds`) build on these types, and
//! `chrono` appears only at the boundary where calendar dates are converted
//! to serial day numbers.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;

pub use types::cashflow::{CashFlow, CashFlowStream};
pub use types::date::{date_from_day_number, day_number, year_fraction, DAYS_PER_YEAR};
pub use types::quote::{is_unset_price, PRICE_EPSILON, QUOTE_DIFF_EPSILON, UNSET_PRICE};
