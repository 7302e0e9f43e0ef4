//! Sales file cleaning and aggregation.
//!
//! The pipeline is `load` -> `clean` -> `normalize_temporal` ->
//! `derive_fields`, after which the `analysis` queries rank the table and
//! `chart` draws revenue per category.

pub mod analysis;
pub mod chart;
pub mod loader;
pub mod output;
pub mod table;
pub mod transform;

pub use table::{Dataset, SalesTable};
