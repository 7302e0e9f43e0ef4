//! Grouped aggregations over the cleaned sales table.
//!
//! Every query here borrows the table and leaves it untouched; results are
//! ordered by total, highest first.

pub mod aggregate;
pub mod report;
pub mod types;
