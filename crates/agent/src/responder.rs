use rust_decimal::Decimal;
use spendlens_core::config::AnalyticsConfig;
use spendlens_core::domain::supplier::{SupplierMetrics, SupplierMetricsTable};
use spendlens_core::format::{currency, fixed};

use crate::classifier::{classify, QuestionIntent};

pub const NO_UNDERUTILIZED_BULLET: &str = "• No high-margin underutilized suppliers found";
pub const NO_COST_DATA_BULLET: &str =
    "• No supplier cost data is available for the selected scope";
pub const DEFAULT_CHECKLIST: [&str; 3] = [
    "• Focus on high-cost suppliers",
    "• Monitor margins",
    "• Use scenario modeling before negotiations",
];

/// Deterministic answers computed from the supplier metrics table alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleBasedResponder {
    underutilized_threshold_pct: Decimal,
    renegotiation_count: usize,
}

impl Default for RuleBasedResponder {
    fn default() -> Self {
        Self { underutilized_threshold_pct: Decimal::from(50), renegotiation_count: 3 }
    }
}

impl From<&AnalyticsConfig> for RuleBasedResponder {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            underutilized_threshold_pct: Decimal::from(config.underutilized_threshold_pct),
            renegotiation_count: config.renegotiation_count,
        }
    }
}

impl RuleBasedResponder {
    pub fn answer(&self, question: &str, table: &SupplierMetricsTable) -> String {
        let bullets = match classify(question) {
            QuestionIntent::UtilizationMargin => self.utilization_margin_bullets(table),
            QuestionIntent::CostRenegotiation => self.renegotiation_bullets(table),
            QuestionIntent::General => {
                DEFAULT_CHECKLIST.iter().map(|line| line.to_string()).collect()
            }
        };
        bullets.join("\n")
    }

    /// Suppliers earning above the median margin percentage while running below the
    /// utilization threshold.
    fn utilization_margin_bullets(&self, table: &SupplierMetricsTable) -> Vec<String> {
        let Some(median) = table.median_margin_pct() else {
            return vec![NO_UNDERUTILIZED_BULLET.to_string()];
        };

        let bullets = table
            .rows()
            .iter()
            .filter(|row| {
                row.margin_pct.is_some_and(|pct| pct > median)
                    && row.utilization < self.underutilized_threshold_pct
            })
            .map(|row| {
                format!(
                    "• {}: {}% utilization, {} margin",
                    row.supplier,
                    fixed(row.utilization, 0),
                    currency(row.margin, 0)
                )
            })
            .collect::<Vec<_>>();

        if bullets.is_empty() {
            vec![NO_UNDERUTILIZED_BULLET.to_string()]
        } else {
            bullets
        }
    }

    fn renegotiation_bullets(&self, table: &SupplierMetricsTable) -> Vec<String> {
        let mut candidates = table
            .rows()
            .iter()
            .filter_map(|row| row.margin_pct.map(|pct| (row, pct)))
            .collect::<Vec<(&SupplierMetrics, Decimal)>>();
        if candidates.is_empty() {
            return vec![NO_COST_DATA_BULLET.to_string()];
        }

        candidates.sort_by(|left, right| right.0.total_cost.cmp(&left.0.total_cost));
        candidates
            .into_iter()
            .take(self.renegotiation_count)
            .map(|(row, pct)| {
                format!(
                    "• {}: {} total cost, {}% margin",
                    row.supplier,
                    currency(row.total_cost, 0),
                    fixed(pct, 1)
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use spendlens_core::domain::record::SupplierName;
    use spendlens_core::domain::supplier::{SupplierMetrics, SupplierMetricsTable};

    use super::{
        RuleBasedResponder, DEFAULT_CHECKLIST, NO_COST_DATA_BULLET, NO_UNDERUTILIZED_BULLET,
    };

    fn row(
        supplier: &str,
        revenue: i64,
        total_cost: i64,
        orders: i64,
        utilization: i64,
    ) -> SupplierMetrics {
        let revenue = Decimal::from(revenue);
        let total_cost = Decimal::from(total_cost);
        let margin = revenue - total_cost;
        let margin_pct = (!revenue.is_zero()).then(|| margin * Decimal::ONE_HUNDRED / revenue);
        SupplierMetrics {
            supplier: SupplierName::from(supplier),
            revenue,
            total_cost,
            margin,
            orders: Decimal::from(orders),
            margin_pct,
            utilization: Decimal::from(utilization),
        }
    }

    fn worked_example() -> SupplierMetricsTable {
        SupplierMetricsTable::new(vec![row("A", 1200, 1000, 100, 100), row("B", 300, 250, 50, 50)])
    }

    #[test]
    fn worked_example_has_no_underutilized_high_margin_supplier() {
        let responder = RuleBasedResponder::default();
        let question = "Which suppliers are underutilized with good margin?";
        let answer = responder.answer(question, &worked_example());

        assert_eq!(answer, NO_UNDERUTILIZED_BULLET);
    }

    #[test]
    fn lists_high_margin_low_utilization_suppliers() {
        let table = SupplierMetricsTable::new(vec![
            row("Bulk", 1000, 900, 100, 100),
            row("Niche", 2000, 800, 20, 20),
            row("Mid", 1000, 700, 60, 60),
        ]);

        let answer = RuleBasedResponder::default().answer("margin check", &table);
        assert_eq!(answer, "• Niche: 20% utilization, $1,200 margin");
    }

    #[test]
    fn utilization_at_the_threshold_is_not_underutilized() {
        let table = SupplierMetricsTable::new(vec![
            row("Bulk", 1000, 900, 100, 100),
            row("Steady", 1000, 900, 90, 90),
            row("Edge", 1000, 400, 50, 50),
            row("Below", 1000, 400, 49, 49),
        ]);
        assert_eq!(table.median_margin_pct(), Some(Decimal::from(35)));

        let answer = RuleBasedResponder::default().answer("margin check", &table);
        assert_eq!(answer, "• Below: 49% utilization, $600 margin");
    }

    #[test]
    fn renegotiation_lists_top_three_by_total_cost() {
        let table = SupplierMetricsTable::new(vec![
            row("Small", 100, 50, 1, 10),
            row("Large", 5000, 4000, 10, 100),
            row("Medium", 1000, 900, 5, 50),
            row("Tiny", 10, 5, 1, 10),
        ]);

        let answer =
            RuleBasedResponder::default().answer("Who should we renegotiate with?", &table);
        let lines = answer.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                "• Large: $4,000 total cost, 20.0% margin",
                "• Medium: $900 total cost, 10.0% margin",
                "• Small: $50 total cost, 50.0% margin",
            ]
        );
    }

    #[test]
    fn renegotiation_skips_zero_revenue_rows_and_handles_empty_tables() {
        let responder = RuleBasedResponder::default();
        let table = SupplierMetricsTable::new(vec![row("Free", 0, 100, 1, 100)]);

        assert_eq!(responder.answer("too expensive?", &table), NO_COST_DATA_BULLET);
        assert_eq!(
            responder.answer("too expensive?", &SupplierMetricsTable::default()),
            NO_COST_DATA_BULLET
        );
    }

    #[test]
    fn general_questions_get_the_checklist() {
        let answer = RuleBasedResponder::default().answer("hello", &worked_example());
        assert_eq!(answer, DEFAULT_CHECKLIST.join("\n"));
    }
}
