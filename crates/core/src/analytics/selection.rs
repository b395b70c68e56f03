use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::record::Record;

/// Region/commodity scope for one pipeline run. `None` selects every value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub regions: Option<BTreeSet<String>>,
    pub commodities: Option<BTreeSet<String>>,
}

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = Some(regions.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_commodities<I, S>(mut self, commodities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commodities = Some(commodities.into_iter().map(Into::into).collect());
        self
    }

    pub fn includes(&self, record: &Record) -> bool {
        let region_selected =
            self.regions.as_ref().map_or(true, |regions| regions.contains(&record.region));
        let commodity_selected = self
            .commodities
            .as_ref()
            .map_or(true, |commodities| commodities.contains(&record.commodity));
        region_selected && commodity_selected
    }

    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|record| self.includes(record)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Selection;
    use crate::analytics::test_support::record;

    #[test]
    fn default_selection_keeps_every_record() {
        let records =
            vec![record("A", "EMEA", "Steel", 1, 1, 1), record("B", "APAC", "Copper", 1, 1, 1)];
        assert_eq!(Selection::all().apply(&records).len(), 2);
    }

    #[test]
    fn region_and_commodity_filters_intersect() {
        let records = vec![
            record("A", "EMEA", "Steel", 1, 1, 1),
            record("B", "EMEA", "Copper", 1, 1, 1),
            record("C", "APAC", "Steel", 1, 1, 1),
        ];
        let selection = Selection::all().with_regions(["EMEA"]).with_commodities(["Steel"]);

        let selected = selection.apply(&records);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].supplier.as_str(), "A");
    }

    #[test]
    fn explicitly_empty_set_selects_nothing() {
        let records = vec![record("A", "EMEA", "Steel", 1, 1, 1)];
        let selection = Selection::all().with_regions(Vec::<String>::new());
        assert!(selection.apply(&records).is_empty());
    }
}
