use serde::Serialize;
use spendlens_core::analytics::pipeline::ScenarioReport;
use spendlens_core::analytics::ranking::SupplierRanking;
use spendlens_core::config::AppConfig;
use spendlens_core::format::currency;
use spendlens_core::schema::{SIMULATED_MARGIN, SIMULATED_TOTAL_COST, SIMULATED_UNIT_COST};

use crate::commands::{CommandResult, ReportArgs};

#[derive(Serialize)]
struct ReportPayload<'a> {
    command: &'static str,
    status: &'static str,
    report: &'a ScenarioReport,
}

pub fn run(config: &AppConfig, args: &ReportArgs) -> CommandResult {
    let report = match args.scope.evaluate(config) {
        Ok(report) => report,
        Err(error) => return CommandResult::from_analytics_error("report", &error),
    };

    if args.json {
        let payload = ReportPayload { command: "report", status: "ok", report: &report };
        return match serde_json::to_string(&payload) {
            Ok(output) => CommandResult { exit_code: 0, output },
            Err(error) => CommandResult::failure(
                "report",
                "serialization",
                format!("could not serialize report: {error}"),
                7,
            ),
        };
    }

    CommandResult { exit_code: 0, output: render_text(&report) }
}

pub fn render_text(report: &ScenarioReport) -> String {
    let mut lines = vec![format!(
        "Scope: {} records, {} suppliers, cost shock {}%",
        report.records.len(),
        report.supplier_metrics.len(),
        report.shock.pct().normalize()
    )];
    lines.extend(report.kpis.render_lines());

    lines.push(String::new());
    lines.push(format!("Top cost pressure (mean {SIMULATED_UNIT_COST}):"));
    lines.extend(render_ranking(&report.cost_pressure, 2));

    lines.push(String::new());
    lines.push(format!("Top profitability (total {SIMULATED_MARGIN}):"));
    lines.extend(render_ranking(&report.profitability, 0));

    lines.push(String::new());
    lines.push(format!(
        "Regional trend (Date, Region, {SIMULATED_TOTAL_COST}, {SIMULATED_MARGIN}):"
    ));
    if report.trend.is_empty() {
        lines.push("  (no records in scope)".to_string());
    }
    for point in &report.trend {
        lines.push(format!(
            "  {}  {}  {}  {}",
            point.date.as_str(),
            point.region,
            currency(point.simulated_total_cost, 0),
            currency(point.simulated_margin, 0)
        ));
    }

    let summary = report.summary.render_lines();
    if !summary.is_empty() {
        lines.push(String::new());
        lines.push("Executive summary:".to_string());
        lines.extend(summary);
    }

    lines.push(String::new());
    lines.push("Supplier metrics:".to_string());
    lines.push(report.supplier_metrics.render_text());

    lines.join("\n")
}

fn render_ranking(ranking: &[SupplierRanking], dp: u32) -> Vec<String> {
    if ranking.is_empty() {
        return vec!["  (no suppliers in scope)".to_string()];
    }
    ranking
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            format!("  {}. {}  {}", index + 1, entry.supplier, currency(entry.value, dp))
        })
        .collect()
}
