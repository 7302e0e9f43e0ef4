//! In-memory sales table.
//!
//! The table is stored column-wise: every column is a typed vector of
//! optional cells, and every column has the same length. A `None` cell is a
//! missing value.

use chrono::NaiveDateTime;
use serde::Serialize;

pub const PRODUTO: &str = "Produto";
pub const CATEGORIA: &str = "Categoria";
pub const PRECO_UNITARIO: &str = "Preco_Unitario";
pub const QUANTIDADE: &str = "Quantidade";
pub const ID_CLIENTE: &str = "ID_Cliente";
pub const DATA: &str = "Data";
pub const TOTAL_VENDA: &str = "Total_Venda";

/// Columns the loader refuses to go without.
pub const REQUIRED_COLUMNS: &[&str] = &[PRODUTO, CATEGORIA, PRECO_UNITARIO, QUANTIDADE, ID_CLIENTE];

/// A typed column of nullable cells.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Number(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Temporal(Vec<Option<NaiveDateTime>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Number(v) => v.len(),
            Column::Text(v) => v.len(),
            Column::Temporal(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn non_null_count(&self) -> usize {
        match self {
            Column::Number(v) => v.iter().filter(|c| c.is_some()).count(),
            Column::Text(v) => v.iter().filter(|c| c.is_some()).count(),
            Column::Temporal(v) => v.iter().filter(|c| c.is_some()).count(),
        }
    }

    pub fn null_count(&self) -> usize {
        self.len() - self.non_null_count()
    }

    /// Dtype label as shown by [`SalesTable::info`].
    pub fn dtype(&self) -> &'static str {
        match self {
            Column::Number(_) => "float64",
            Column::Text(_) => "object",
            Column::Temporal(_) => "datetime",
        }
    }

    /// Cell `row` rendered as a grouping key. Missing cells have no key.
    pub fn key_at(&self, row: usize) -> Option<String> {
        match self {
            Column::Number(v) => v.get(row).copied().flatten().map(|n| n.to_string()),
            Column::Text(v) => v.get(row).cloned().flatten(),
            Column::Temporal(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }

    /// Cell `row` as a number, if this is a numeric column and the cell is present.
    pub fn number_at(&self, row: usize) -> Option<f64> {
        match self {
            Column::Number(v) => v.get(row).copied().flatten(),
            _ => None,
        }
    }

    pub fn as_numbers(&self) -> Option<&[Option<f64>]> {
        match self {
            Column::Number(v) => Some(v),
            _ => None,
        }
    }

    fn retain(&mut self, keep: &[bool]) {
        fn filter<T>(values: &mut Vec<T>, keep: &[bool]) {
            let mut flags = keep.iter();
            values.retain(|_| flags.next().copied().unwrap_or(false));
        }

        match self {
            Column::Number(v) => filter(v, keep),
            Column::Text(v) => filter(v, keep),
            Column::Temporal(v) => filter(v, keep),
        }
    }

    fn truncated(&self, n: usize) -> Column {
        match self {
            Column::Number(v) => Column::Number(v.iter().take(n).copied().collect()),
            Column::Text(v) => Column::Text(v.iter().take(n).cloned().collect()),
            Column::Temporal(v) => Column::Temporal(v.iter().take(n).copied().collect()),
        }
    }
}

/// Per-column summary reported by [`SalesTable::info`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: &'static str,
    pub non_null: usize,
}

/// Shape and per-column summary of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableInfo {
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
}

/// Ordered rows sharing a named column schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesTable {
    columns: Vec<(String, Column)>,
    rows: usize,
}

impl SalesTable {
    /// Builds a table from named columns, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the columns differ in length or a name repeats.
    pub fn from_columns(columns: Vec<(String, Column)>) -> anyhow::Result<Self> {
        let rows = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        for (idx, (name, column)) in columns.iter().enumerate() {
            if column.len() != rows {
                anyhow::bail!(
                    "column `{name}` has {} rows, expected {rows}",
                    column.len()
                );
            }
            if columns[..idx].iter().any(|(other, _)| other == name) {
                anyhow::bail!("duplicate column `{name}`");
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// Replaces the column called `name`, or appends it if absent.
    ///
    /// # Panics
    ///
    /// Panics if `column` does not have one cell per row.
    pub fn set_column(&mut self, name: &str, column: Column) {
        assert_eq!(
            column.len(),
            self.rows,
            "column `{name}` must have one cell per row"
        );
        match self.column_mut(name) {
            Some(existing) => *existing = column,
            None => self.columns.push((name.to_string(), column)),
        }
    }

    /// Keeps the rows whose flag is `true`, preserving their order.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        for (_, column) in &mut self.columns {
            column.retain(keep);
        }
        self.rows = keep.iter().take(self.rows).filter(|k| **k).count();
    }

    /// First `n` rows as a new table.
    pub fn head(&self, n: usize) -> SalesTable {
        SalesTable {
            columns: self
                .columns
                .iter()
                .map(|(name, c)| (name.clone(), c.truncated(n)))
                .collect(),
            rows: self.rows.min(n),
        }
    }

    pub fn info(&self) -> TableInfo {
        TableInfo {
            rows: self.rows,
            columns: self
                .columns
                .iter()
                .map(|(name, c)| ColumnInfo {
                    name: name.clone(),
                    dtype: c.dtype(),
                    non_null: c.non_null_count(),
                })
                .collect(),
        }
    }
}

/// Outcome of loading, threaded through every pipeline stage.
///
/// `Absent` means the source could not be read; each stage hands it on
/// untouched so the run can stop before aggregating.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    Loaded(SalesTable),
    Absent,
}

impl Dataset {
    /// Applies `f` to a loaded table, passing `Absent` through.
    pub fn map(self, f: impl FnOnce(SalesTable) -> SalesTable) -> Dataset {
        match self {
            Dataset::Loaded(table) => Dataset::Loaded(f(table)),
            Dataset::Absent => Dataset::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Dataset::Absent)
    }

    pub fn table(&self) -> Option<&SalesTable> {
        match self {
            Dataset::Loaded(table) => Some(table),
            Dataset::Absent => None,
        }
    }

    pub fn into_table(self) -> Option<SalesTable> {
        match self {
            Dataset::Loaded(table) => Some(table),
            Dataset::Absent => None,
        }
    }
}
