use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::scenario::ScenarioRecord;
use crate::domain::record::RecordDate;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: RecordDate,
    pub region: String,
    pub simulated_total_cost: Decimal,
    pub simulated_margin: Decimal,
}

/// Per (date, region) totals. Regions appear in first-seen order and dates ascend
/// within each region.
pub fn regional_trend(records: &[ScenarioRecord]) -> Vec<TrendPoint> {
    let mut regions: Vec<(&str, BTreeMap<&RecordDate, (Decimal, Decimal)>)> = Vec::new();

    for scenario in records {
        let record = scenario.record();
        let position = match regions.iter().position(|(region, _)| *region == record.region) {
            Some(position) => position,
            None => {
                regions.push((record.region.as_str(), BTreeMap::new()));
                regions.len() - 1
            }
        };

        let totals =
            regions[position].1.entry(&record.date).or_insert((Decimal::ZERO, Decimal::ZERO));
        totals.0 += scenario.simulated_total_cost();
        totals.1 += scenario.simulated_margin();
    }

    regions
        .into_iter()
        .flat_map(|(region, by_date)| {
            by_date.into_iter().map(move |(date, (cost, margin))| TrendPoint {
                date: date.clone(),
                region: region.to_string(),
                simulated_total_cost: cost,
                simulated_margin: margin,
            })
        })
        .collect()
}
