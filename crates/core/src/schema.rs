use crate::errors::SchemaError;

pub const DATE: &str = "Date";
pub const SUPPLIER: &str = "Supplier";
pub const REGION: &str = "Region";
pub const COMMODITY: &str = "Commodity";
pub const UNIT_COST: &str = "Unit Cost";
pub const QUANTITY: &str = "Quantity";
pub const REVENUE: &str = "Revenue";

pub const REQUIRED_FIELDS: [&str; 7] =
    [DATE, SUPPLIER, REGION, COMMODITY, UNIT_COST, QUANTITY, REVENUE];

pub const SIMULATED_UNIT_COST: &str = "Simulated Unit Cost";
pub const SIMULATED_TOTAL_COST: &str = "Simulated Total Cost";
pub const SIMULATED_MARGIN: &str = "Simulated Margin";

/// Checks that every `required` name is present in `fields`.
///
/// Matching is exact and case-sensitive; callers trim header whitespace first. The
/// error lists all missing names in `required` order.
pub fn validate_fields<S: AsRef<str>>(fields: &[S], required: &[&str]) -> Result<(), SchemaError> {
    let missing = required
        .iter()
        .filter(|name| !fields.iter().any(|field| field.as_ref() == **name))
        .map(|name| (*name).to_string())
        .collect::<Vec<_>>();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError { missing })
    }
}
