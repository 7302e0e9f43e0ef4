//! CSV loader for sales files.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::table::{Column, Dataset, PRECO_UNITARIO, QUANTIDADE, REQUIRED_COLUMNS, SalesTable};

/// Cell contents read as a missing value.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Columns that are always numeric regardless of what inference decides.
const NUMERIC_COLUMNS: &[&str] = &[PRECO_UNITARIO, QUANTIDADE];

/// Loads the sales file at `path`.
///
/// A file that does not exist or cannot be opened yields [`Dataset::Absent`]
/// after logging the path.
///
/// # Errors
///
/// Returns an error if the file is readable but is not valid CSV, or if it
/// lacks one of the required columns.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) => {
            error!(path = %path.display(), error = %e, "Sales file not found or unreadable");
            return Ok(Dataset::Absent);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to open {}", path.display()));
        }
    };

    let table = read_table(file).with_context(|| format!("failed to load {}", path.display()))?;
    info!(rows = table.len(), "Sales file loaded");
    Ok(Dataset::Loaded(table))
}

/// Parses CSV text from any reader into a [`SalesTable`].
///
/// # Errors
///
/// Returns an error on malformed CSV or when a required column is missing.
pub fn read_table<R: Read>(reader: R) -> Result<SalesTable> {
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("failed to read CSV header")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            anyhow::bail!("missing required column `{required}`");
        }
    }

    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for (idx, result) in rdr.records().enumerate() {
        // header is line 1
        let record = result.with_context(|| format!("CSV parse error on line {}", idx + 2))?;
        for (cells, value) in raw.iter_mut().zip(record.iter()) {
            cells.push(if is_missing(value) {
                None
            } else {
                Some(value.to_string())
            });
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| {
            let column = if NUMERIC_COLUMNS.contains(&name.as_str()) {
                coerce_numeric(&name, cells)
            } else {
                infer_column(cells)
            };
            debug!(column = %name, dtype = column.dtype(), "Column typed");
            (name, column)
        })
        .collect();

    SalesTable::from_columns(columns)
}

fn is_missing(value: &str) -> bool {
    NA_VALUES.contains(&value)
}

/// Numeric if every present cell parses as a number, text otherwise.
fn infer_column(cells: Vec<Option<String>>) -> Column {
    let all_numeric = cells
        .iter()
        .flatten()
        .all(|v| v.parse::<f64>().is_ok());

    if all_numeric {
        Column::Number(
            cells
                .iter()
                .map(|c| c.as_deref().and_then(|v| v.parse().ok()))
                .collect(),
        )
    } else {
        Column::Text(cells)
    }
}

fn coerce_numeric(name: &str, cells: Vec<Option<String>>) -> Column {
    let mut invalid = 0usize;
    let values = cells
        .into_iter()
        .map(|cell| {
            let value = cell?;
            let parsed = value.parse::<f64>().ok();
            if parsed.is_none() {
                invalid += 1;
            }
            parsed
        })
        .collect();

    if invalid > 0 {
        warn!(column = name, invalid, "Non-numeric values treated as missing");
    }
    Column::Number(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{CATEGORIA, DATA, ID_CLIENTE, PRODUTO};
    use std::env;
    use std::fs;

    const HEADER: &str = "Produto,Categoria,Preco_Unitario,Quantidade,ID_Cliente,Data\n";

    #[test]
    fn test_read_table_infers_types() {
        let csv = format!(
            "{HEADER}Widget,electronics,10.0,2,C1,2024-01-01\nGadget,tools,,1,,2024-02-01\n"
        );
        let table = read_table(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.column(PRODUTO).unwrap().dtype(), "object");
        assert_eq!(table.column(CATEGORIA).unwrap().dtype(), "object");
        assert_eq!(
            table.column(PRECO_UNITARIO),
            Some(&Column::Number(vec![Some(10.0), None]))
        );
        assert_eq!(
            table.column(QUANTIDADE),
            Some(&Column::Number(vec![Some(2.0), Some(1.0)]))
        );
        assert_eq!(
            table.column(ID_CLIENTE),
            Some(&Column::Text(vec![Some("C1".into()), None]))
        );
        assert_eq!(table.column(DATA).unwrap().dtype(), "object");
    }

    #[test]
    fn test_numeric_ids_are_inferred_as_numbers() {
        let csv = format!("{HEADER}Widget,tools,1.5,2,101,2024-01-01\nWidget,tools,1.5,2,NA,2024-01-01\n");
        let table = read_table(csv.as_bytes()).unwrap();
        assert_eq!(
            table.column(ID_CLIENTE),
            Some(&Column::Number(vec![Some(101.0), None]))
        );
    }

    #[test]
    fn test_garbage_price_becomes_missing() {
        let csv = format!("{HEADER}Widget,tools,abc,2,C1,2024-01-01\n");
        let table = read_table(csv.as_bytes()).unwrap();
        assert_eq!(
            table.column(PRECO_UNITARIO),
            Some(&Column::Number(vec![None]))
        );
    }

    #[test]
    fn test_date_column_is_optional() {
        let csv = "Produto,Categoria,Preco_Unitario,Quantidade,ID_Cliente\nW,t,1,1,C1\n";
        let table = read_table(csv.as_bytes()).unwrap();
        assert!(!table.contains(DATA));
    }

    #[test]
    fn test_missing_required_column_is_an_error() {
        let csv = "Produto,Categoria,Quantidade,ID_Cliente,Data\nW,t,1,C1,2024-01-01\n";
        let err = read_table(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains(PRECO_UNITARIO));
    }

    #[test]
    fn test_load_missing_file_is_absent() {
        let path = env::temp_dir().join("sales_report_does_not_exist.csv");
        let _ = fs::remove_file(&path);

        let dataset = load(&path).unwrap();
        assert!(dataset.is_absent());
    }

    #[test]
    fn test_load_reads_file() {
        let path = env::temp_dir().join("sales_report_loader_test.csv");
        fs::write(&path, format!("{HEADER}Widget,tools,2.0,3,C1,2024-01-01\n")).unwrap();

        let dataset = load(&path).unwrap();
        assert_eq!(dataset.table().map(SalesTable::len), Some(1));

        fs::remove_file(&path).unwrap();
    }
}
