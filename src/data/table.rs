//! Cleaned Country Table
//! The in-memory result of the pipeline, read-only once built.

/// One country's joined and cleaned figures.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub country: String,
    pub gdp: f64,
    pub demand_per_capita: f64,
    pub consumption: f64,
    /// Share of the population using the internet, in percent.
    pub internet_usage_pct: f64,
    pub population: f64,
}

/// Ordered collection of records. Names are unique.
#[derive(Debug, Clone, Default)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Case-sensitive exact lookup by country name.
    pub fn find(&self, country: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.country == country)
    }

    /// Country names for the selector, sorted and de-duplicated.
    pub fn countries(&self) -> Vec<String> {
        let mut names: Vec<String> = self.records.iter().map(|r| r.country.clone()).collect();
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
pub(crate) fn record(country: &str, population: f64) -> Record {
    Record {
        country: country.to_string(),
        gdp: 1.0e9,
        demand_per_capita: 40.0,
        consumption: 2.0e5,
        internet_usage_pct: 75.0,
        population,
    }
}
