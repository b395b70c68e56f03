//! CSV record loading.
//!
//! Headers are trimmed and checked against the required schema before any row is
//! parsed, so a schema failure never yields partial data.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::record::{Record, RecordDate, SupplierName};
use crate::errors::{IngestError, SchemaError};
use crate::schema::{self, REQUIRED_FIELDS};

pub fn load_path(path: &Path) -> Result<Vec<Record>, IngestError> {
    let file = File::open(path)
        .map_err(|source| IngestError::Io { path: path.to_path_buf(), source })?;
    let records = load_reader(file)?;
    debug!(
        event_name = "ingest.csv.loaded",
        path = %path.display(),
        record_count = records.len(),
        "loaded supplier records"
    );
    Ok(records)
}

pub fn load_reader<R: Read>(reader: R) -> Result<Vec<Record>, IngestError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = reader
        .headers()?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').trim().to_string())
        .collect::<Vec<_>>();
    schema::validate_fields(&headers, &REQUIRED_FIELDS)?;
    let columns = Columns::resolve(&headers)?;

    let mut records = Vec::new();
    for (offset, row) in reader.records().enumerate() {
        let row = row?;
        let line = row.position().map(|position| position.line()).unwrap_or(offset as u64 + 2);
        records.push(columns.parse_row(&row, line)?);
    }

    Ok(records)
}

/// Lists the distinct values of a text column in first-seen order.
pub fn distinct_values<'a>(
    records: &'a [Record],
    field: impl Fn(&'a Record) -> &'a str,
) -> Vec<&'a str> {
    let mut values: Vec<&str> = Vec::new();
    for record in records {
        let value = field(record);
        if !values.contains(&value) {
            values.push(value);
        }
    }
    values
}

struct Columns {
    date: usize,
    supplier: usize,
    region: usize,
    commodity: usize,
    unit_cost: usize,
    quantity: usize,
    revenue: usize,
}

impl Columns {
    fn resolve(headers: &[String]) -> Result<Self, SchemaError> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| SchemaError { missing: vec![name.to_string()] })
        };

        Ok(Self {
            date: position(schema::DATE)?,
            supplier: position(schema::SUPPLIER)?,
            region: position(schema::REGION)?,
            commodity: position(schema::COMMODITY)?,
            unit_cost: position(schema::UNIT_COST)?,
            quantity: position(schema::QUANTITY)?,
            revenue: position(schema::REVENUE)?,
        })
    }

    fn parse_row(&self, row: &StringRecord, line: u64) -> Result<Record, IngestError> {
        let text = |index: usize| row.get(index).unwrap_or_default().trim().to_string();
        let number = |index: usize, field: &'static str| {
            let raw = row.get(index).unwrap_or_default();
            parse_decimal(raw).ok_or_else(|| IngestError::InvalidNumber {
                line,
                field,
                value: raw.to_string(),
            })
        };

        Ok(Record {
            date: RecordDate::parse(&text(self.date)),
            supplier: SupplierName(text(self.supplier)),
            region: text(self.region),
            commodity: text(self.commodity),
            unit_cost: number(self.unit_cost, schema::UNIT_COST)?,
            quantity: number(self.quantity, schema::QUANTITY)?,
            revenue: number(self.revenue, schema::REVENUE)?,
        })
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)).ok()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{distinct_values, load_reader};
    use crate::errors::IngestError;

    const SAMPLE: &str = "\
 Date , Supplier ,Region,Commodity, Unit Cost ,Quantity,Revenue,Notes
2024-01-01,Acme,EMEA,Steel,10,100,1200,first
2024-01-02,Bolt,APAC,Copper,5.5,50,300,
2024-01-03,Acme,APAC,Steel,1e1,20,260,late
";

    #[test]
    fn loads_rows_with_trimmed_headers_and_ignores_extra_columns() {
        let records = match load_reader(SAMPLE.as_bytes()) {
            Ok(records) => records,
            Err(error) => panic!("sample should load: {error}"),
        };

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].supplier.as_str(), "Acme");
        assert_eq!(records[1].unit_cost, Decimal::new(55, 1));
        assert_eq!(records[2].unit_cost, Decimal::from(10));
        assert_eq!(records[2].date.as_str(), "2024-01-03");
    }

    #[test]
    fn schema_failure_lists_all_missing_columns() {
        let input = "Date,Supplier,Quantity\n2024-01-01,Acme,3\n";
        let error = load_reader(input.as_bytes()).err();

        let message = match error {
            Some(IngestError::Schema(schema)) => schema.to_string(),
            other => panic!("expected schema error, got {other:?}"),
        };
        assert_eq!(message, "Missing required columns: Region, Commodity, Unit Cost, Revenue");
    }

    #[test]
    fn non_numeric_cell_reports_line_and_field() {
        let input = "Date,Supplier,Region,Commodity,Unit Cost,Quantity,Revenue\n\
                     2024-01-01,Acme,EMEA,Steel,10,100,1200\n\
                     2024-01-02,Acme,EMEA,Steel,10,lots,1200\n";
        let error = load_reader(input.as_bytes()).err();

        let Some(IngestError::InvalidNumber { line, field, value }) = error else {
            panic!("expected an invalid number error");
        };
        assert_eq!((line, field, value.as_str()), (3, "Quantity", "lots"));
    }

    #[test]
    fn distinct_values_keep_first_seen_order() {
        let records = load_reader(SAMPLE.as_bytes()).unwrap_or_default();
        let regions = distinct_values(&records, |record| record.region.as_str());
        assert_eq!(regions, vec!["EMEA", "APAC"]);
    }
}
