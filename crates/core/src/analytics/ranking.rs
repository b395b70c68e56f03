//! Supplier rankings over a simulated scope.
//!
//! Groups keep first-seen input order and sorting is stable, so ties rank in the order
//! the suppliers first appear.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::scenario::ScenarioRecord;
use crate::domain::record::SupplierName;

pub const DEFAULT_TOP_N: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRanking {
    pub supplier: SupplierName,
    pub value: Decimal,
}

/// Top `n` suppliers by mean simulated unit cost, highest first.
pub fn top_cost_pressure(records: &[ScenarioRecord], n: usize) -> Vec<SupplierRanking> {
    let groups = group_by_supplier(records, |record| record.simulated_unit_cost());
    let means = groups
        .into_iter()
        .map(|(supplier, values)| {
            let count = Decimal::from(values.len());
            let sum: Decimal = values.into_iter().sum();
            SupplierRanking { supplier, value: sum / count }
        })
        .collect();
    top_n_descending(means, n)
}

/// Top `n` suppliers by summed simulated margin, highest first.
pub fn top_profitability(records: &[ScenarioRecord], n: usize) -> Vec<SupplierRanking> {
    let groups = group_by_supplier(records, |record| record.simulated_margin());
    let sums = groups
        .into_iter()
        .map(|(supplier, values)| SupplierRanking { supplier, value: values.into_iter().sum() })
        .collect();
    top_n_descending(sums, n)
}

pub(crate) fn group_by_supplier<T>(
    records: &[ScenarioRecord],
    value: impl Fn(&ScenarioRecord) -> T,
) -> Vec<(SupplierName, Vec<T>)> {
    let mut index_by_supplier: HashMap<&SupplierName, usize> = HashMap::new();
    let mut groups: Vec<(SupplierName, Vec<T>)> = Vec::new();

    for record in records {
        let supplier = &record.record().supplier;
        let index = *index_by_supplier.entry(supplier).or_insert_with(|| {
            groups.push((supplier.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[index].1.push(value(record));
    }

    groups
}

fn top_n_descending(mut rankings: Vec<SupplierRanking>, n: usize) -> Vec<SupplierRanking> {
    rankings.sort_by(|left, right| right.value.cmp(&left.value));
    rankings.truncate(n);
    rankings
}
