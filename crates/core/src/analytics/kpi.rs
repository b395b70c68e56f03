use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::scenario::ScenarioRecord;
use crate::errors::ComputationError;
use crate::format::{currency, percent};

/// Headline totals for the simulated scope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_spend: Decimal,
    pub total_margin: Decimal,
    pub total_revenue: Decimal,
    /// `None` when the scope has no revenue.
    pub avg_margin_pct: Option<Decimal>,
}

impl KpiSummary {
    pub fn compute(records: &[ScenarioRecord]) -> Result<Self, ComputationError> {
        let mut summary = Self::default();
        for scenario in records {
            summary.total_spend += scenario.simulated_total_cost();
            summary.total_margin += scenario.simulated_margin();
            summary.total_revenue += scenario.record().revenue;
        }

        if !summary.total_revenue.is_zero() {
            let pct = (summary.total_margin * Decimal::ONE_HUNDRED)
                .checked_div(summary.total_revenue)
                .ok_or_else(|| ComputationError::Overflow {
                    context: "the average margin percentage".to_string(),
                })?;
            summary.avg_margin_pct = Some(pct);
        }
        Ok(summary)
    }

    pub fn render_lines(&self) -> Vec<String> {
        vec![
            format!("Total Spend: {}", currency(self.total_spend, 0)),
            format!("Total Margin: {}", currency(self.total_margin, 0)),
            format!(
                "Avg Margin %: {}",
                self.avg_margin_pct.map(|pct| percent(pct, 1)).unwrap_or_else(|| "n/a".to_string())
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::KpiSummary;
    use crate::analytics::scenario::CostShock;
    use crate::analytics::test_support::{record, simulated};
    use crate::errors::ComputationError;

    #[test]
    fn totals_follow_the_simulated_fields() {
        let records = vec![
            record("A", "EMEA", "Steel", 10, 100, 1200),
            record("B", "EMEA", "Steel", 5, 50, 300),
        ];
        let shock = CostShock::from_pct(Decimal::from(10)).unwrap_or_default();
        let kpis = KpiSummary::compute(&simulated(&records, shock)).unwrap_or_default();

        assert_eq!(kpis.total_spend, Decimal::from(1375));
        assert_eq!(kpis.total_margin, Decimal::from(125));
        assert_eq!(kpis.total_revenue, Decimal::from(1500));
        assert_eq!(
            kpis.render_lines(),
            vec!["Total Spend: $1,375", "Total Margin: $125", "Avg Margin %: 8.3%"]
        );
    }

    #[test]
    fn empty_scope_has_undefined_margin_pct() {
        let kpis = KpiSummary::compute(&[]).unwrap_or_default();
        assert_eq!(kpis.avg_margin_pct, None);
        assert_eq!(kpis.render_lines()[2], "Avg Margin %: n/a");
    }

    #[test]
    fn average_over_vanishing_revenue_is_an_overflow() {
        let mut sample = record("A", "EMEA", "Steel", 1_000, 0, 0);
        sample.quantity = Decimal::from_scientific("1e20").unwrap_or_default();
        sample.revenue = Decimal::new(1, 20);

        let error = KpiSummary::compute(&simulated(&[sample], CostShock::none())).err();
        assert!(matches!(error, Some(ComputationError::Overflow { .. })));
    }
}
