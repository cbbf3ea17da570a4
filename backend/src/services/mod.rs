//! Service layer: analysis steps over derived completion records.
//!
//! Each module is a set of pure functions; [`task_analysis::analyze`] chains
//! them into the full pipeline used by the HTTP surface.

pub mod band_filter;
pub mod compare;
pub mod histogram;
pub mod hypothesis;
pub mod normalization;
pub mod task_analysis;

pub use band_filter::{BandFilter, BandPartition};
pub use compare::compute_cohort_comparison;
pub use histogram::{build_histogram, duration_histogram, normalized_histogram};
pub use hypothesis::Hypothesis;
pub use normalization::{normalize_records, Exclusion};
pub use task_analysis::analyze;
