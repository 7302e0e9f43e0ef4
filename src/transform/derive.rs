use tracing::{info, warn};

use crate::table::{CATEGORIA, Column, Dataset, PRECO_UNITARIO, QUANTIDADE, SalesTable, TOTAL_VENDA};
use crate::transform::utility::title_case;

/// Title-cases `Categoria` and adds `Total_Venda = Preco_Unitario * Quantidade`.
#[tracing::instrument(skip_all)]
pub fn derive_fields(dataset: Dataset) -> Dataset {
    dataset.map(derive_table)
}

/// [`derive_fields`] for a table that is known to be loaded.
pub fn derive_table(mut table: SalesTable) -> SalesTable {
    standardize_category(&mut table);
    compute_total(&mut table);
    table
}

fn standardize_category(table: &mut SalesTable) {
    match table.column_mut(CATEGORIA) {
        Some(Column::Text(values)) => {
            for value in values.iter_mut().flatten() {
                *value = title_case(value);
            }
            info!(column = CATEGORIA, "Column standardized");
        }
        // Numbers and timestamps have no casing.
        Some(_) => warn!(column = CATEGORIA, "Column is not text, left as-is"),
        None => warn!(column = CATEGORIA, "Column missing, nothing to standardize"),
    }
}

/// A row with a missing price or quantity gets a missing total.
fn compute_total(table: &mut SalesTable) {
    let (Some(prices), Some(quantities)) = (
        table.column(PRECO_UNITARIO).and_then(Column::as_numbers),
        table.column(QUANTIDADE).and_then(Column::as_numbers),
    ) else {
        warn!(
            column = TOTAL_VENDA,
            "Price or quantity column missing or not numeric, total not computed"
        );
        return;
    };

    let totals: Vec<Option<f64>> = prices
        .iter()
        .zip(quantities)
        .map(|(price, quantity)| Some((*price)? * (*quantity)?))
        .collect();

    table.set_column(TOTAL_VENDA, Column::Number(totals));
    info!(column = TOTAL_VENDA, "Column computed");
}
