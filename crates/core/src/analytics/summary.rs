use serde::{Deserialize, Serialize};

use crate::analytics::ranking::SupplierRanking;
use crate::analytics::scenario::CostShock;
use crate::domain::record::SupplierName;

/// Rule-based headline statements for the current scope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub most_profitable: Option<SupplierName>,
    pub highest_cost_pressure: Option<SupplierName>,
    pub shock_warning: Option<String>,
}

impl ExecutiveSummary {
    pub fn from_rankings(
        profitability: &[SupplierRanking],
        cost_pressure: &[SupplierRanking],
        shock: CostShock,
    ) -> Self {
        let shock_warning = shock.is_increase().then(|| {
            format!(
                "A simulated {}% cost increase materially compresses margins. \
                 Supplier diversification is recommended.",
                shock.pct().normalize()
            )
        });

        Self {
            most_profitable: profitability.first().map(|ranking| ranking.supplier.clone()),
            highest_cost_pressure: cost_pressure.first().map(|ranking| ranking.supplier.clone()),
            shock_warning,
        }
    }

    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(supplier) = &self.most_profitable {
            lines.push(format!(
                "• {supplier} is the most profitable supplier in the selected scope."
            ));
        }
        if let Some(supplier) = &self.highest_cost_pressure {
            lines.push(format!(
                "• {supplier} shows the highest cost pressure and should be reviewed."
            ));
        }
        if let Some(warning) = &self.shock_warning {
            lines.push(warning.clone());
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::ExecutiveSummary;
    use crate::analytics::ranking::SupplierRanking;
    use crate::analytics::scenario::CostShock;
    use crate::domain::record::SupplierName;

    fn ranking(name: &str) -> Vec<SupplierRanking> {
        vec![SupplierRanking { supplier: SupplierName::from(name), value: Decimal::ONE }]
    }

    #[test]
    fn names_leaders_and_warns_on_increase() {
        let shock = CostShock::from_pct(Decimal::from(15)).unwrap_or_default();
        let summary = ExecutiveSummary::from_rankings(&ranking("Acme"), &ranking("Bolt"), shock);
        let lines = summary.render_lines();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "• Acme is the most profitable supplier in the selected scope.");
        assert_eq!(lines[1], "• Bolt shows the highest cost pressure and should be reviewed.");
        assert!(lines[2].starts_with("A simulated 15% cost increase"));
    }

    #[test]
    fn no_warning_without_increase_and_nothing_for_empty_scope() {
        let summary = ExecutiveSummary::from_rankings(&[], &[], CostShock::none());
        assert!(summary.render_lines().is_empty());
    }
}
