//! What-if cost shocks.
//!
//! A shock scales every unit cost by `1 + pct/100` and recomputes totals and margins.
//! The simulator accepts any shock at or above -100%; narrower bounds belong to the
//! caller (see [`CostShock::within_bounds`]).
//!
//! Simulation also checks that the scope can be aggregated: the absolute sum of every
//! field the downstream stages add up stays below `Decimal::MAX / 100`, which leaves room
//! for the percentage scaling in the KPI and supplier stages.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::metrics::CostMetrics;
use crate::domain::record::Record;
use crate::errors::{ComputationError, ScenarioError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostShock {
    pct: Decimal,
}

impl CostShock {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_pct(pct: Decimal) -> Result<Self, ScenarioError> {
        if pct < -Decimal::ONE_HUNDRED {
            return Err(ScenarioError::ShockBelowFloor { pct });
        }
        Ok(Self { pct })
    }

    /// Validates a caller-supplied integer percentage against configured bounds.
    pub fn within_bounds(pct: i64, min: i64, max: i64) -> Result<Self, ScenarioError> {
        if pct < min || pct > max {
            return Err(ScenarioError::ShockOutOfBounds { pct, min, max });
        }
        Self::from_pct(Decimal::from(pct))
    }

    pub fn pct(&self) -> Decimal {
        self.pct
    }

    pub fn multiplier(&self) -> Decimal {
        Decimal::ONE + self.pct / Decimal::ONE_HUNDRED
    }

    pub fn is_increase(&self) -> bool {
        self.pct > Decimal::ZERO
    }
}

/// A record with its simulated fields, computed once at construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    record: Record,
    baseline: CostMetrics,
    simulated_unit_cost: Decimal,
    simulated_total_cost: Decimal,
    simulated_margin: Decimal,
}

impl ScenarioRecord {
    pub fn simulate(record: Record, shock: CostShock) -> Result<Self, ComputationError> {
        let baseline = CostMetrics::of(&record)?;
        let simulated = record.unit_cost.checked_mul(shock.multiplier()).and_then(|unit_cost| {
            let total_cost = unit_cost.checked_mul(record.quantity)?;
            let margin = record.revenue.checked_sub(total_cost)?;
            Some((unit_cost, total_cost, margin))
        });
        let Some((simulated_unit_cost, simulated_total_cost, simulated_margin)) = simulated else {
            return Err(ComputationError::supplier_overflow(&record.supplier));
        };
        Ok(Self { record, baseline, simulated_unit_cost, simulated_total_cost, simulated_margin })
    }

    fn aggregated_fields(&self) -> [Decimal; 6] {
        [
            self.record.revenue,
            self.record.quantity,
            self.baseline.total_cost,
            self.simulated_unit_cost,
            self.simulated_total_cost,
            self.simulated_margin,
        ]
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Unshocked `Total Cost` and `Margin`.
    pub fn baseline(&self) -> CostMetrics {
        self.baseline
    }

    /// Simulated total cost minus the unshocked total cost.
    pub fn cost_delta(&self) -> Decimal {
        self.simulated_total_cost - self.baseline.total_cost
    }

    pub fn simulated_unit_cost(&self) -> Decimal {
        self.simulated_unit_cost
    }

    pub fn simulated_total_cost(&self) -> Decimal {
        self.simulated_total_cost
    }

    pub fn simulated_margin(&self) -> Decimal {
        self.simulated_margin
    }
}

pub fn simulate<'a, I>(
    records: I,
    shock: CostShock,
) -> Result<Vec<ScenarioRecord>, ComputationError>
where
    I: IntoIterator<Item = &'a Record>,
{
    let limit = Decimal::MAX / Decimal::ONE_HUNDRED;
    let mut magnitudes = [Decimal::ZERO; 6];
    let mut simulated = Vec::new();

    for record in records {
        let scenario = ScenarioRecord::simulate(record.clone(), shock)?;
        for (total, value) in magnitudes.iter_mut().zip(scenario.aggregated_fields()) {
            *total = total
                .checked_add(value.abs())
                .filter(|sum| *sum <= limit)
                .ok_or_else(|| ComputationError::supplier_overflow(&record.supplier))?;
        }
        simulated.push(scenario);
    }
    Ok(simulated)
}
