//! Data types produced by the aggregation queries.

use serde::Serialize;

/// Sum of one value column for one group key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub total: f64,
}

impl GroupTotal {
    pub fn new(key: impl Into<String>, total: f64) -> Self {
        Self {
            key: key.into(),
            total,
        }
    }
}

/// The three rankings produced by a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesReport {
    pub top_products: Vec<GroupTotal>,
    pub revenue_by_category: Vec<GroupTotal>,
    pub top_customers: Vec<GroupTotal>,
}
