use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analytics::kpi::KpiSummary;
use crate::analytics::ranking::{self, SupplierRanking, DEFAULT_TOP_N};
use crate::analytics::scenario::{self, CostShock, ScenarioRecord};
use crate::analytics::selection::Selection;
use crate::analytics::summary::ExecutiveSummary;
use crate::analytics::supplier_table::{self, ZeroRevenuePolicy};
use crate::analytics::trend::{self, TrendPoint};
use crate::config::AnalyticsConfig;
use crate::domain::record::Record;
use crate::domain::supplier::SupplierMetricsTable;
use crate::errors::ComputationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineSettings {
    pub top_n: usize,
    pub zero_revenue_policy: ZeroRevenuePolicy,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self { top_n: DEFAULT_TOP_N, zero_revenue_policy: ZeroRevenuePolicy::Exclude }
    }
}

impl From<&AnalyticsConfig> for PipelineSettings {
    fn from(config: &AnalyticsConfig) -> Self {
        Self { top_n: config.top_n, zero_revenue_policy: config.zero_revenue_policy }
    }
}

/// Everything derived from one (selection, shock) pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub shock: CostShock,
    pub records: Vec<ScenarioRecord>,
    pub kpis: KpiSummary,
    pub cost_pressure: Vec<SupplierRanking>,
    pub profitability: Vec<SupplierRanking>,
    pub trend: Vec<TrendPoint>,
    pub summary: ExecutiveSummary,
    pub supplier_metrics: SupplierMetricsTable,
}

#[derive(Clone, Debug, Default)]
pub struct AnalyticsPipeline {
    settings: PipelineSettings,
}

impl AnalyticsPipeline {
    pub fn new(settings: PipelineSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> PipelineSettings {
        self.settings
    }

    /// Filter, simulate and aggregate. The selection and shock are read-only for the
    /// whole run.
    pub fn run(
        &self,
        records: &[Record],
        selection: &Selection,
        shock: CostShock,
    ) -> Result<ScenarioReport, ComputationError> {
        let in_scope = selection.apply(records);
        let simulated = scenario::simulate(in_scope, shock)?;

        let supplier_metrics =
            supplier_table::build(&simulated, self.settings.zero_revenue_policy)?;
        let kpis = KpiSummary::compute(&simulated)?;
        let cost_pressure = ranking::top_cost_pressure(&simulated, self.settings.top_n);
        let profitability = ranking::top_profitability(&simulated, self.settings.top_n);
        let trend = trend::regional_trend(&simulated);
        let summary = ExecutiveSummary::from_rankings(&profitability, &cost_pressure, shock);
        let cost_delta = simulated.iter().map(ScenarioRecord::cost_delta).sum::<Decimal>();

        info!(
            event_name = "analytics.pipeline.completed",
            input_records = records.len(),
            scope_records = simulated.len(),
            suppliers = supplier_metrics.len(),
            shock_pct = %shock.pct(),
            cost_delta = %cost_delta,
            "scenario report computed"
        );

        Ok(ScenarioReport {
            shock,
            records: simulated,
            kpis,
            cost_pressure,
            profitability,
            trend,
            summary,
            supplier_metrics,
        })
    }
}
