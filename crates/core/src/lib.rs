//! Supplier spend analytics: CSV ingestion, cost-shock scenarios and per-supplier metrics.

pub mod analytics;
pub mod config;
pub mod domain;
pub mod errors;
pub mod format;
pub mod ingest;
pub mod schema;

pub use analytics::pipeline::{AnalyticsPipeline, PipelineSettings, ScenarioReport};
pub use analytics::scenario::{CostShock, ScenarioRecord};
pub use analytics::selection::Selection;
pub use analytics::supplier_table::ZeroRevenuePolicy;
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions};
pub use domain::record::{Record, RecordDate, SupplierName};
pub use domain::supplier::{SupplierMetrics, SupplierMetricsTable};
pub use errors::{AnalyticsError, ComputationError, IngestError, ScenarioError, SchemaError};
