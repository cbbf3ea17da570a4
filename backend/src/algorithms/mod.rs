//! Core numeric algorithms: interval arithmetic, duration derivation,
//! descriptive statistics and least-squares regression.

pub mod duration;
pub mod intervals;
pub mod pauses;
pub mod regression;
pub mod stats;

pub use duration::{derive_records, Derivation, DurationStrategy};
pub use intervals::{merge_intervals, union_length_minutes, Interval};
pub use regression::fit_regression;
pub use stats::compute_summary;
