pub mod chat;
pub mod config;
pub mod report;

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use spendlens_core::analytics::pipeline::{AnalyticsPipeline, PipelineSettings, ScenarioReport};
use spendlens_core::analytics::scenario::CostShock;
use spendlens_core::analytics::selection::Selection;
use spendlens_core::config::AppConfig;
use spendlens_core::domain::record::Record;
use spendlens_core::errors::AnalyticsError;
use spendlens_core::ingest;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_analytics_error(command: &str, error: &AnalyticsError) -> Self {
        Self::failure(
            command,
            error.error_class(),
            format!("{} ({error})", error.user_message()),
            error.exit_code(),
        )
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Input file, filters and cost shock shared by `report` and `chat`.
#[derive(Debug, Clone, Args)]
pub struct ScopeArgs {
    #[arg(long, help = "CSV with Date, Supplier, Region, Commodity, Unit Cost, Quantity, Revenue")]
    pub input: PathBuf,
    #[arg(long = "region", value_name = "REGION", help = "Keep only this region (repeatable)")]
    pub regions: Vec<String>,
    #[arg(
        long = "commodity",
        value_name = "COMMODITY",
        help = "Keep only this commodity (repeatable)"
    )]
    pub commodities: Vec<String>,
    #[arg(
        long,
        value_name = "PCT",
        default_value_t = 0,
        allow_negative_numbers = true,
        help = "Whole-percent change applied to every unit cost"
    )]
    pub cost_shock: i64,
}

impl ScopeArgs {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self { input: input.into(), regions: Vec::new(), commodities: Vec::new(), cost_shock: 0 }
    }

    pub fn selection(&self) -> Selection {
        let mut selection = Selection::all();
        if !self.regions.is_empty() {
            selection = selection.with_regions(self.regions.iter().cloned());
        }
        if !self.commodities.is_empty() {
            selection = selection.with_commodities(self.commodities.iter().cloned());
        }
        selection
    }

    /// Validates the shock, loads the input and runs the analytics pipeline.
    pub fn evaluate(&self, config: &AppConfig) -> Result<ScenarioReport, AnalyticsError> {
        let shock = CostShock::within_bounds(
            self.cost_shock,
            config.scenario.min_shock_pct,
            config.scenario.max_shock_pct,
        )?;
        let records = ingest::load_path(&self.input)?;
        self.warn_on_unknown_filters(&records);
        let pipeline = AnalyticsPipeline::new(PipelineSettings::from(&config.analytics));
        Ok(pipeline.run(&records, &self.selection(), shock)?)
    }

    fn warn_on_unknown_filters(&self, records: &[Record]) {
        let regions = ingest::distinct_values(records, |record| record.region.as_str());
        let commodities = ingest::distinct_values(records, |record| record.commodity.as_str());

        let unknown = self
            .regions
            .iter()
            .filter(|region| !regions.contains(&region.as_str()))
            .chain(self.commodities.iter().filter(|item| !commodities.contains(&item.as_str())));
        for value in unknown {
            warn!(
                event_name = "cli.scope.unknown_filter",
                value = %value,
                available_regions = ?regions,
                available_commodities = ?commodities,
                "filter value does not occur in the input"
            );
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,
    #[arg(long, help = "Emit the full scenario report as JSON")]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ChatArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,
    #[arg(value_name = "QUESTION", help = "Questions to ask; read from stdin when omitted")]
    pub questions: Vec<String>,
}
