use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Missing required columns: {}", .missing.join(", "))]
pub struct SchemaError {
    pub missing: Vec<String>,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("could not read records from `{path}`: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("malformed CSV input: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: `{field}` value `{value}` is not a number")]
    InvalidNumber { line: u64, field: &'static str, value: String },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ComputationError {
    #[error("supplier `{supplier}` has zero total revenue; margin percentage is undefined")]
    ZeroRevenue { supplier: String },
    #[error("arithmetic overflow while computing {context}")]
    Overflow { context: String },
}

impl ComputationError {
    pub(crate) fn supplier_overflow(supplier: impl std::fmt::Display) -> Self {
        Self::Overflow { context: format!("metrics for supplier `{supplier}`") }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("cost shock of {pct}% is below the -100% floor")]
    ShockBelowFloor { pct: Decimal },
    #[error("cost shock of {pct}% is outside the allowed range {min}..={max}")]
    ShockOutOfBounds { pct: i64, min: i64, max: i64 },
}

/// Failures a caller of the analytics pipeline can observe.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error(transparent)]
    Computation(#[from] ComputationError),
}

impl From<SchemaError> for AnalyticsError {
    fn from(value: SchemaError) -> Self {
        Self::Ingest(IngestError::Schema(value))
    }
}

impl AnalyticsError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Ingest(IngestError::Schema(_)) => "schema_validation",
            Self::Ingest(_) => "ingest",
            Self::Scenario(_) => "scenario_validation",
            Self::Computation(_) => "computation",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Ingest(IngestError::Schema(_)) => 3,
            Self::Ingest(_) => 4,
            Self::Scenario(_) => 5,
            Self::Computation(_) => 6,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Ingest(IngestError::Schema(_)) => {
                "The supplier file is missing required columns. Fix the header row and retry."
            }
            Self::Ingest(_) => "The supplier file could not be read. Check its contents and retry.",
            Self::Scenario(_) => "The requested cost scenario is not allowed.",
            Self::Computation(_) => "Supplier metrics could not be computed for this scope.",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{AnalyticsError, ComputationError, IngestError, SchemaError};

    #[test]
    fn schema_error_lists_every_missing_column() {
        let error = SchemaError { missing: vec!["Unit Cost".to_string(), "Revenue".to_string()] };
        assert_eq!(error.to_string(), "Missing required columns: Unit Cost, Revenue");
    }

    #[test]
    fn schema_failure_maps_to_schema_validation_class() {
        let error = AnalyticsError::from(SchemaError { missing: vec!["Date".to_string()] });

        assert_eq!(error.error_class(), "schema_validation");
        assert_eq!(error.exit_code(), 3);
        assert!(error.user_message().contains("missing required columns"));
    }

    #[test]
    fn invalid_number_is_an_ingest_failure() {
        let error = AnalyticsError::from(IngestError::InvalidNumber {
            line: 4,
            field: "Quantity",
            value: "ten".to_string(),
        });

        assert_eq!(error.error_class(), "ingest");
        assert_eq!(error.to_string(), "line 4: `Quantity` value `ten` is not a number");
    }

    #[test]
    fn zero_revenue_maps_to_computation_class() {
        let error =
            AnalyticsError::from(ComputationError::ZeroRevenue { supplier: "Acme".to_string() });

        assert_eq!(error.error_class(), "computation");
        assert_eq!(error.exit_code(), 6);
    }

    #[test]
    fn overflow_names_the_supplier_and_maps_to_computation_class() {
        let error = AnalyticsError::from(ComputationError::supplier_overflow("Acme"));

        assert_eq!(error.error_class(), "computation");
        assert_eq!(error.exit_code(), 6);
        assert_eq!(
            error.to_string(),
            "arithmetic overflow while computing metrics for supplier `Acme`"
        );
    }
}
