use rust_decimal::Decimal;

use crate::analytics::scenario::{simulate, CostShock, ScenarioRecord};
use crate::domain::record::{Record, RecordDate, SupplierName};

pub(crate) fn simulated(records: &[Record], shock: CostShock) -> Vec<ScenarioRecord> {
    simulate(records, shock).unwrap_or_else(|error| panic!("records should simulate: {error}"))
}

pub(crate) fn record(
    supplier: &str,
    region: &str,
    commodity: &str,
    unit_cost: i64,
    quantity: i64,
    revenue: i64,
) -> Record {
    dated_record("2024-01-01", supplier, region, commodity, unit_cost, quantity, revenue)
}

pub(crate) fn dated_record(
    date: &str,
    supplier: &str,
    region: &str,
    commodity: &str,
    unit_cost: i64,
    quantity: i64,
    revenue: i64,
) -> Record {
    Record {
        date: RecordDate::parse(date),
        supplier: SupplierName::from(supplier),
        region: region.to_string(),
        commodity: commodity.to_string(),
        unit_cost: Decimal::from(unit_cost),
        quantity: Decimal::from(quantity),
        revenue: Decimal::from(revenue),
    }
}
