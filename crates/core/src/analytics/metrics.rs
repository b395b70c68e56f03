use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::record::Record;
use crate::errors::ComputationError;

/// `Total Cost` and `Margin` for one record, before any cost shock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostMetrics {
    pub total_cost: Decimal,
    pub margin: Decimal,
}

impl CostMetrics {
    pub fn of(record: &Record) -> Result<Self, ComputationError> {
        match (record.total_cost(), record.margin()) {
            (Some(total_cost), Some(margin)) => Ok(Self { total_cost, margin }),
            _ => Err(ComputationError::supplier_overflow(&record.supplier)),
        }
    }
}
