//! Output formatting and persistence for sales reports.
//!
//! Supports pretty-printing, JSON serialization and table previews.

use anyhow::Result;
use tracing::{debug, info};

use crate::analysis::types::{GroupTotal, SalesReport};
use crate::table::{Column, SalesTable};

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &SalesReport) {
    debug!("{:#?}", report);
}

/// Logs a report as pretty-printed JSON.
pub fn print_json(report: &SalesReport) -> Result<()> {
    debug!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Logs each ranking of a report, one line per group.
pub fn print_report(report: &SalesReport) {
    print_series("Top products by quantity", &report.top_products);
    print_series("Revenue by category", &report.revenue_by_category);
    print_series("Top customers by spend", &report.top_customers);
}

fn print_series(title: &str, series: &[GroupTotal]) {
    info!(groups = series.len(), "{title}");
    for (rank, group) in series.iter().enumerate() {
        info!(rank = rank + 1, key = %group.key, total = group.total, "{title}");
    }
}

/// Logs the shape of a table and the dtype and non-null count of each column.
pub fn print_info(table: &SalesTable) {
    let info = table.info();
    info!(rows = info.rows, columns = info.columns.len(), "Table info");
    for column in &info.columns {
        info!(
            column = %column.name,
            dtype = column.dtype,
            non_null = column.non_null,
            "Column info"
        );
    }
}

/// Logs the first `n` rows of a table as comma-separated lines.
pub fn print_head(table: &SalesTable, n: usize) {
    for line in format_head(table, n) {
        info!("{line}");
    }
}

/// Renders the header and the first `n` rows of a table.
///
/// Missing cells print as `NaN`, or `NaT` in datetime columns.
pub fn format_head(table: &SalesTable, n: usize) -> Vec<String> {
    let head = table.head(n);
    let names: Vec<&str> = head.column_names().collect();

    let mut lines = Vec::with_capacity(head.len() + 1);
    lines.push(names.join(","));
    for row in 0..head.len() {
        let cells: Vec<String> = names
            .iter()
            .filter_map(|name| head.column(name))
            .map(|column| format_cell(column, row))
            .collect();
        lines.push(cells.join(","));
    }
    lines
}

fn format_cell(column: &Column, row: usize) -> String {
    match (column.key_at(row), column) {
        (Some(value), _) => value,
        (None, Column::Temporal(_)) => "NaT".to_string(),
        (None, _) => "NaN".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{DATA, PRODUTO};
    use chrono::NaiveDate;

    fn report() -> SalesReport {
        SalesReport {
            top_products: vec![GroupTotal::new("Mouse", 5.0)],
            revenue_by_category: vec![
                GroupTotal::new("Perifericos", 400.0),
                GroupTotal::new("Video", 90.5),
            ],
            top_customers: vec![],
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&report());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&report()).unwrap();
    }

    #[test]
    fn test_format_head_marks_missing_cells() {
        let table = SalesTable::from_columns(vec![
            (
                PRODUTO.to_string(),
                Column::Text(vec![Some("Mouse".into()), None, Some("Cabo".into())]),
            ),
            (
                DATA.to_string(),
                Column::Temporal(vec![
                    None,
                    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(0, 0, 0),
                    None,
                ]),
            ),
        ])
        .unwrap();

        let lines = format_head(&table, 2);
        assert_eq!(
            lines,
            vec![
                "Produto,Data".to_string(),
                "Mouse,NaT".to_string(),
                "NaN,2024-01-02 00:00:00".to_string(),
            ]
        );
    }
}
