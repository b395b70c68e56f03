use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SupplierName(pub String);

impl SupplierName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SupplierName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SupplierName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Date cell as it appeared in the source, plus the calendar date when it parses.
///
/// Ordering puts parsed dates first (chronologically), then unparsed values lexically.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RecordDate {
    raw: String,
    parsed: Option<NaiveDate>,
}

impl RecordDate {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let parsed = DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(&raw, format).ok());
        Self { raw, parsed }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn calendar_date(&self) -> Option<NaiveDate> {
        self.parsed
    }
}

impl Ord for RecordDate {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.parsed, other.parsed) {
            (Some(left), Some(right)) => left.cmp(&right).then_with(|| self.raw.cmp(&other.raw)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.raw.cmp(&other.raw),
        }
    }
}

impl PartialOrd for RecordDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl From<String> for RecordDate {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<RecordDate> for String {
    fn from(value: RecordDate) -> Self {
        value.raw
    }
}

/// One procurement line as loaded from the source table.
///
/// `Total Cost` and `Margin` are never stored; they are derived from the inputs on
/// every read so they cannot drift from `unit_cost`, `quantity` and `revenue`. Both are
/// `None` when the result does not fit in a `Decimal`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub date: RecordDate,
    pub supplier: SupplierName,
    pub region: String,
    pub commodity: String,
    pub unit_cost: Decimal,
    pub quantity: Decimal,
    pub revenue: Decimal,
}

impl Record {
    pub fn total_cost(&self) -> Option<Decimal> {
        self.unit_cost.checked_mul(self.quantity)
    }

    pub fn margin(&self) -> Option<Decimal> {
        self.revenue.checked_sub(self.total_cost()?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::{Record, RecordDate, SupplierName};

    #[test]
    fn derived_fields_follow_inputs() {
        let record = Record {
            date: RecordDate::parse("2024-01-31"),
            supplier: SupplierName::from("Acme"),
            region: "EMEA".to_string(),
            commodity: "Steel".to_string(),
            unit_cost: Decimal::new(1050, 2),
            quantity: Decimal::from(40),
            revenue: Decimal::from(500),
        };

        assert_eq!(record.total_cost(), Some(Decimal::from(420)));
        assert_eq!(record.margin(), Some(Decimal::from(80)));
    }

    #[test]
    fn derived_fields_are_none_when_they_overflow() {
        let record = Record {
            date: RecordDate::parse("2024-01-31"),
            supplier: SupplierName::from("Acme"),
            region: "EMEA".to_string(),
            commodity: "Steel".to_string(),
            unit_cost: Decimal::from_scientific("1e20").unwrap_or_default(),
            quantity: Decimal::from_scientific("1e20").unwrap_or_default(),
            revenue: Decimal::ONE,
        };

        assert_eq!(record.total_cost(), None);
        assert_eq!(record.margin(), None);
    }

    #[test]
    fn dates_parse_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(RecordDate::parse("2024-03-05").calendar_date(), expected);
        assert_eq!(RecordDate::parse("2024/03/05").calendar_date(), expected);
        assert_eq!(RecordDate::parse("03/05/2024").calendar_date(), expected);
        assert_eq!(RecordDate::parse(" Q1 2024 ").calendar_date(), None);
        assert_eq!(RecordDate::parse(" Q1 2024 ").as_str(), "Q1 2024");
    }

    #[test]
    fn parsed_dates_order_chronologically_before_unparsed() {
        let mut dates = vec![
            RecordDate::parse("week-2"),
            RecordDate::parse("02/01/2024"),
            RecordDate::parse("2023-12-31"),
            RecordDate::parse("week-1"),
        ];
        dates.sort();

        let ordered = dates.iter().map(RecordDate::as_str).collect::<Vec<_>>();
        assert_eq!(ordered, vec!["2023-12-31", "02/01/2024", "week-1", "week-2"]);
    }
}
