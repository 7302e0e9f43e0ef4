use crate::analysis::aggregate::{revenue_by_category, top_customers_by_spend, top_products_by_quantity};
use crate::analysis::types::SalesReport;
use crate::table::SalesTable;

/// Products listed in the report.
pub const TOP_PRODUCTS: usize = 5;
/// Customers listed in the report.
pub const TOP_CUSTOMERS: usize = 3;

impl SalesReport {
    /// Runs the three rankings over a fully derived table.
    ///
    /// Categories are kept in full since they feed the chart.
    pub fn from_table(table: &SalesTable) -> Self {
        let mut top_products = top_products_by_quantity(table);
        top_products.truncate(TOP_PRODUCTS);

        let mut top_customers = top_customers_by_spend(table);
        top_customers.truncate(TOP_CUSTOMERS);

        SalesReport {
            top_products,
            revenue_by_category: revenue_by_category(table),
            top_customers,
        }
    }
}
