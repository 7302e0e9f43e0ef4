use std::collections::HashMap;
use tracing::warn;

use crate::analysis::types::GroupTotal;
use crate::table::{CATEGORIA, ID_CLIENTE, PRODUTO, QUANTIDADE, SalesTable, TOTAL_VENDA};

/// Sums `value_column` per distinct `key_column` value, highest total first.
///
/// Rows with a missing key are skipped. Missing and non-finite values (NaN,
/// infinities) add nothing, so a group whose values are all missing totals
/// `0.0`. Groups with equal totals
/// keep the order in which their key first appears in the table.
///
/// A missing key or value column yields an empty result.
pub fn group_sum(table: &SalesTable, key_column: &str, value_column: &str) -> Vec<GroupTotal> {
    let (Some(keys), Some(values)) = (table.column(key_column), table.column(value_column)) else {
        warn!(key_column, value_column, "Aggregation column missing");
        return Vec::new();
    };

    let mut groups: Vec<GroupTotal> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in 0..table.len() {
        let Some(key) = keys.key_at(row) else {
            continue;
        };
        let value = values
            .number_at(row)
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);

        match index.get(&key) {
            Some(&slot) => groups[slot].total += value,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(GroupTotal::new(key, value));
            }
        }
    }

    // `sort_by` is stable, ties stay in first-seen order.
    groups.sort_by(|a, b| b.total.total_cmp(&a.total));
    groups
}

/// Total quantity sold per product.
pub fn top_products_by_quantity(table: &SalesTable) -> Vec<GroupTotal> {
    group_sum(table, PRODUTO, QUANTIDADE)
}

/// Total revenue per category.
pub fn revenue_by_category(table: &SalesTable) -> Vec<GroupTotal> {
    group_sum(table, CATEGORIA, TOTAL_VENDA)
}

/// Total spend per customer. Callers take the first three for the podium.
pub fn top_customers_by_spend(table: &SalesTable) -> Vec<GroupTotal> {
    group_sum(table, ID_CLIENTE, TOTAL_VENDA)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn text(values: &[Option<&str>]) -> Column {
        Column::Text(values.iter().map(|v| v.map(String::from)).collect())
    }

    fn sales() -> SalesTable {
        SalesTable::from_columns(vec![
            (
                PRODUTO.to_string(),
                text(&[Some("Mouse"), Some("Teclado"), Some("Mouse"), Some("Monitor"), Some("Cabo")]),
            ),
            (
                CATEGORIA.to_string(),
                text(&[
                    Some("Perifericos"),
                    Some("Perifericos"),
                    Some("Perifericos"),
                    Some("Video"),
                    None,
                ]),
            ),
            (
                QUANTIDADE.to_string(),
                Column::Number(vec![Some(2.0), Some(1.0), Some(3.0), Some(1.0), Some(5.0)]),
            ),
            (
                ID_CLIENTE.to_string(),
                text(&[Some("C1"), Some("C2"), Some("C2"), Some("C3"), Some("C1")]),
            ),
            (
                TOTAL_VENDA.to_string(),
                Column::Number(vec![Some(100.0), Some(150.0), Some(150.0), Some(900.0), Some(25.0)]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_top_products_by_quantity() {
        assert_eq!(
            top_products_by_quantity(&sales()),
            vec![
                GroupTotal::new("Mouse", 5.0),
                GroupTotal::new("Cabo", 5.0),
                GroupTotal::new("Teclado", 1.0),
                GroupTotal::new("Monitor", 1.0),
            ]
        );
    }

    #[test]
    fn test_revenue_by_category_skips_missing_keys() {
        let revenue = revenue_by_category(&sales());
        assert_eq!(
            revenue,
            vec![
                GroupTotal::new("Video", 900.0),
                GroupTotal::new("Perifericos", 400.0),
            ]
        );
    }

    #[test]
    fn test_revenue_sums_match_and_are_sorted() {
        let table = sales();
        let revenue = revenue_by_category(&table);

        assert!(revenue.windows(2).all(|w| w[0].total >= w[1].total));

        let categories = table.column(CATEGORIA).unwrap();
        let totals = table.column(TOTAL_VENDA).unwrap();
        let expected: f64 = (0..table.len())
            .filter(|&row| categories.key_at(row).is_some())
            .filter_map(|row| totals.number_at(row))
            .sum();
        let actual: f64 = revenue.iter().map(|g| g.total).sum();
        assert!((expected - actual).abs() < 1e-9);
    }

    #[test]
    fn test_top_customers_by_spend() {
        let customers = top_customers_by_spend(&sales());
        assert_eq!(
            customers,
            vec![
                GroupTotal::new("C3", 900.0),
                GroupTotal::new("C2", 300.0),
                GroupTotal::new("C1", 125.0),
            ]
        );
    }

    #[test]
    fn test_missing_values_count_as_zero() {
        let table = SalesTable::from_columns(vec![
            (CATEGORIA.to_string(), text(&[Some("A"), Some("B")])),
            (TOTAL_VENDA.to_string(), Column::Number(vec![None, Some(3.0)])),
        ])
        .unwrap();

        assert_eq!(
            revenue_by_category(&table),
            vec![GroupTotal::new("B", 3.0), GroupTotal::new("A", 0.0)]
        );
    }

    #[test]
    fn test_non_finite_values_count_as_zero() {
        let table = SalesTable::from_columns(vec![
            (CATEGORIA.to_string(), text(&[Some("A"), Some("B"), Some("A"), Some("C")])),
            (
                TOTAL_VENDA.to_string(),
                Column::Number(vec![
                    Some(f64::NAN),
                    Some(2.0),
                    Some(5.0),
                    Some(f64::NEG_INFINITY),
                ]),
            ),
        ])
        .unwrap();

        assert_eq!(
            revenue_by_category(&table),
            vec![
                GroupTotal::new("A", 5.0),
                GroupTotal::new("B", 2.0),
                GroupTotal::new("C", 0.0),
            ]
        );
    }

    #[test]
    fn test_empty_table_gives_empty_result() {
        let table = sales().head(0);
        assert!(revenue_by_category(&table).is_empty());
        assert!(top_products_by_quantity(&table).is_empty());
        assert!(top_customers_by_spend(&table).is_empty());
    }

    #[test]
    fn test_missing_column_gives_empty_result() {
        let table = SalesTable::from_columns(vec![(CATEGORIA.to_string(), text(&[Some("A")]))]).unwrap();
        assert!(revenue_by_category(&table).is_empty());
    }
}
