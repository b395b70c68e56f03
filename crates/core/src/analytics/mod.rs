//! Filter → simulate → aggregate.

pub mod kpi;
pub mod metrics;
pub mod pipeline;
pub mod ranking;
pub mod scenario;
pub mod selection;
pub mod summary;
pub mod supplier_table;
pub mod trend;

#[cfg(test)]
pub(crate) mod test_support;
