//! Cleaning and normalization stages.
//!
//! Each stage takes the [`Dataset`](crate::table::Dataset) by value and
//! returns it, so `Absent` short-circuits the whole chain:
//! `clean` -> `normalize_temporal` -> `derive_fields`.

pub mod clean;
pub mod derive;
pub mod temporal;
pub mod utility;

pub use clean::clean;
pub use derive::derive_fields;
pub use temporal::normalize_temporal;

use crate::table::Dataset;

/// Runs every stage in order.
pub fn prepare(dataset: Dataset, date_column: &str) -> Dataset {
    let dataset = clean(dataset);
    let dataset = normalize_temporal(dataset, date_column);
    derive_fields(dataset)
}
