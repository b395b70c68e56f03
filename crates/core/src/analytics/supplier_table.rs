//! Supplier metrics table builder.
//!
//! Two passes: sum revenue, cost, margin and orders per supplier, then normalize orders
//! against the largest supplier in scope. Utilization cannot be computed per supplier in
//! isolation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analytics::ranking::group_by_supplier;
use crate::analytics::scenario::ScenarioRecord;
use crate::domain::supplier::{SupplierMetrics, SupplierMetricsTable};
use crate::errors::ComputationError;

/// What to do with a supplier whose revenue sums to exactly zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroRevenuePolicy {
    /// Keep the row with an undefined margin percentage.
    #[default]
    Exclude,
    Fail,
}

impl ZeroRevenuePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exclude => "exclude",
            Self::Fail => "fail",
        }
    }
}

impl std::str::FromStr for ZeroRevenuePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exclude" => Ok(Self::Exclude),
            "fail" => Ok(Self::Fail),
            other => {
                Err(format!("unsupported zero revenue policy `{other}` (expected exclude|fail)"))
            }
        }
    }
}

struct SupplierTotals {
    revenue: Decimal,
    total_cost: Decimal,
    margin: Decimal,
    orders: Decimal,
}

pub fn build(
    records: &[ScenarioRecord],
    policy: ZeroRevenuePolicy,
) -> Result<SupplierMetricsTable, ComputationError> {
    let grouped = group_by_supplier(records, |scenario| {
        (
            scenario.record().revenue,
            scenario.simulated_total_cost(),
            scenario.simulated_margin(),
            scenario.record().quantity,
        )
    });

    let totals = grouped
        .into_iter()
        .map(|(supplier, values)| {
            let mut totals = SupplierTotals {
                revenue: Decimal::ZERO,
                total_cost: Decimal::ZERO,
                margin: Decimal::ZERO,
                orders: Decimal::ZERO,
            };
            // Bounded by the aggregation limit checked during simulation.
            for (revenue, total_cost, margin, orders) in values {
                totals.revenue += revenue;
                totals.total_cost += total_cost;
                totals.margin += margin;
                totals.orders += orders;
            }
            (supplier, totals)
        })
        .collect::<Vec<_>>();

    let max_orders = totals.iter().map(|(_, totals)| totals.orders).max().unwrap_or(Decimal::ZERO);

    let mut rows = Vec::with_capacity(totals.len());
    for (supplier, totals) in totals {
        let margin_pct = if totals.revenue.is_zero() {
            if policy == ZeroRevenuePolicy::Fail {
                return Err(ComputationError::ZeroRevenue { supplier: supplier.to_string() });
            }
            debug!(
                event_name = "analytics.supplier_metrics.zero_revenue",
                supplier = %supplier,
                "margin percentage undefined for supplier with zero revenue"
            );
            None
        } else {
            let pct = (totals.margin * Decimal::ONE_HUNDRED).checked_div(totals.revenue);
            Some(pct.ok_or_else(|| ComputationError::supplier_overflow(&supplier))?)
        };

        let utilization = if max_orders > Decimal::ZERO {
            totals.orders * Decimal::ONE_HUNDRED / max_orders
        } else {
            Decimal::ZERO
        };

        rows.push(SupplierMetrics {
            supplier,
            revenue: totals.revenue,
            total_cost: totals.total_cost,
            margin: totals.margin,
            orders: totals.orders,
            margin_pct,
            utilization,
        });
    }

    Ok(SupplierMetricsTable::new(rows))
}
