use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use crate::table::{Column, Dataset, SalesTable};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%Y%m%d"];

/// Converts `column` to calendar timestamps.
///
/// Values that do not parse become missing. If the table has no such column
/// it is returned unchanged.
#[tracing::instrument(skip(dataset))]
pub fn normalize_temporal(dataset: Dataset, column: &str) -> Dataset {
    dataset.map(|table| normalize_table(table, column))
}

/// [`normalize_temporal`] for a table that is known to be loaded.
pub fn normalize_table(mut table: SalesTable, column: &str) -> SalesTable {
    let (converted, present) = match table.column(column) {
        None => {
            warn!(column, "Column not found, skipping datetime conversion");
            return table;
        }
        Some(Column::Temporal(_)) => {
            info!(column, "Column already holds datetimes");
            return table;
        }
        Some(Column::Text(values)) => (
            values
                .iter()
                .map(|v| v.as_deref().and_then(parse_datetime))
                .collect::<Vec<_>>(),
            values.iter().flatten().count(),
        ),
        // Bare numbers are not calendar strings.
        Some(Column::Number(values)) => (vec![None; values.len()], values.iter().flatten().count()),
    };

    let unparsed = present - converted.iter().flatten().count();
    if unparsed > 0 {
        warn!(column, unparsed, "Unparseable dates set to missing");
    }

    table.set_column(column, Column::Temporal(converted));
    info!(column, "Column converted to datetime");
    table
}

/// Parses a date or date-time string, returning `None` if no known layout fits.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
