use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::record::SupplierName;
use crate::format::fixed;

/// Per-supplier aggregate over the simulated scope.
///
/// `margin_pct` is `None` when the supplier's revenue sums to zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierMetrics {
    pub supplier: SupplierName,
    pub revenue: Decimal,
    pub total_cost: Decimal,
    pub margin: Decimal,
    pub orders: Decimal,
    pub margin_pct: Option<Decimal>,
    pub utilization: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierMetricsTable {
    rows: Vec<SupplierMetrics>,
}

const TABLE_HEADERS: [&str; 7] =
    ["Supplier", "Revenue", "TotalCost", "Margin", "Orders", "MarginPct", "Utilization"];

impl SupplierMetricsTable {
    pub fn new(rows: Vec<SupplierMetrics>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[SupplierMetrics] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, supplier: &str) -> Option<&SupplierMetrics> {
        self.rows.iter().find(|row| row.supplier.as_str() == supplier)
    }

    /// Median over suppliers with a defined margin percentage.
    pub fn median_margin_pct(&self) -> Option<Decimal> {
        let mut values = self.rows.iter().filter_map(|row| row.margin_pct).collect::<Vec<_>>();
        if values.is_empty() {
            return None;
        }
        values.sort();

        let middle = values.len() / 2;
        if values.len() % 2 == 1 {
            Some(values[middle])
        } else {
            Some(values[middle - 1] / Decimal::TWO + values[middle] / Decimal::TWO)
        }
    }

    /// Fixed-width text rendering, one row per supplier, numbers right-aligned.
    pub fn render_text(&self) -> String {
        let body = self
            .rows
            .iter()
            .map(|row| {
                vec![
                    row.supplier.to_string(),
                    fixed(row.revenue, 2),
                    fixed(row.total_cost, 2),
                    fixed(row.margin, 2),
                    row.orders.normalize().to_string(),
                    row.margin_pct.map(|pct| fixed(pct, 2)).unwrap_or_else(|| "n/a".to_string()),
                    fixed(row.utilization, 2),
                ]
            })
            .collect::<Vec<_>>();

        let mut widths = TABLE_HEADERS.map(str::len);
        for cells in &body {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut lines = Vec::with_capacity(body.len() + 1);
        lines.push(render_row(TABLE_HEADERS.iter().copied(), &widths));
        for cells in &body {
            lines.push(render_row(cells.iter().map(String::as_str), &widths));
        }
        lines.join("\n")
    }
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:>width$}"))
        .collect::<Vec<_>>()
        .join(" ")
}
