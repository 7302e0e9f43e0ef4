use tracing::{info, warn};

use crate::table::{Column, Dataset, ID_CLIENTE, PRECO_UNITARIO, SalesTable};
use crate::transform::utility::mean;

/// Price used when no row has a price to average.
const FALLBACK_PRICE: f64 = 0.0;

/// Imputes missing unit prices with the column mean and drops rows without
/// a customer id.
#[tracing::instrument(skip_all)]
pub fn clean(dataset: Dataset) -> Dataset {
    dataset.map(clean_table)
}

/// [`clean`] for a table that is known to be loaded.
pub fn clean_table(mut table: SalesTable) -> SalesTable {
    impute_price(&mut table);
    drop_missing_customers(&mut table);
    info!(rows = table.len(), "Missing values handled");
    table
}

fn impute_price(table: &mut SalesTable) {
    let Some(Column::Number(prices)) = table.column_mut(PRECO_UNITARIO) else {
        warn!(column = PRECO_UNITARIO, "Price column missing or not numeric, skipping imputation");
        return;
    };

    let missing = prices.iter().filter(|p| p.is_none()).count();
    if missing == 0 {
        return;
    }

    let mean_price = match mean(prices) {
        Some(m) => m,
        None => {
            warn!(
                column = PRECO_UNITARIO,
                fallback = FALLBACK_PRICE,
                "Every price is missing, mean is undefined; using fallback"
            );
            FALLBACK_PRICE
        }
    };

    for price in prices.iter_mut().filter(|p| p.is_none()) {
        *price = Some(mean_price);
    }
    info!(column = PRECO_UNITARIO, missing, mean_price, "Prices imputed");
}

fn drop_missing_customers(table: &mut SalesTable) {
    let Some(ids) = table.column(ID_CLIENTE) else {
        warn!(column = ID_CLIENTE, "Customer column missing, no rows dropped");
        return;
    };

    let keep: Vec<bool> = (0..table.len()).map(|row| ids.key_at(row).is_some()).collect();
    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped > 0 {
        table.retain_rows(&keep);
        info!(column = ID_CLIENTE, dropped, "Rows without customer dropped");
    }
}
