//! Data Processor Module
//! Joins the two sources, coerces locale-formatted numbers and filters the result.

use super::loader::{LoadError, SourceColumns, SourceLoader};
use super::table::{Record, Table};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Countries below this population are left out of the table.
pub const MIN_POPULATION: f64 = 5_000_000.0;

const ROW_INDEX: &str = "__source_row";

/// Parse a number that may use a decimal comma ("12,5" -> 12.5).
///
/// Anything that is not a finite number after the substitution is `None`.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// A joined row after coercion. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoercedRow {
    pub country: Option<String>,
    pub gdp: Option<f64>,
    pub demand_per_capita: Option<f64>,
    pub consumption: Option<f64>,
    pub internet_usage_pct: Option<f64>,
    pub population: Option<f64>,
}

impl CoercedRow {
    /// The complete record, or `None` if any field is missing.
    pub fn complete(self) -> Option<Record> {
        Some(Record {
            country: self.country?,
            gdp: self.gdp?,
            demand_per_capita: self.demand_per_capita?,
            consumption: self.consumption?,
            internet_usage_pct: self.internet_usage_pct?,
            population: self.population?,
        })
    }
}

/// Builds the country table from the two source files.
pub struct DataProcessor;

impl DataProcessor {
    /// Load both sources and build the cleaned table.
    #[tracing::instrument(level = "info", skip_all, fields(gdp = %gdp_path.display(), internet = %internet_path.display()))]
    pub fn load(
        gdp_path: &Path,
        internet_path: &Path,
        columns: &SourceColumns,
    ) -> Result<Table, LoadError> {
        let gdp = SourceLoader::load_csv(gdp_path)?;
        let internet = SourceLoader::load_csv(internet_path)?;
        Self::build_table(gdp, internet, columns)
    }

    /// Like [`DataProcessor::load`], but failures are logged and yield `None`.
    pub fn load_or_log(
        gdp_path: &Path,
        internet_path: &Path,
        columns: &SourceColumns,
    ) -> Option<Table> {
        match Self::load(gdp_path, internet_path, columns) {
            Ok(table) => Some(table),
            Err(LoadError::SourceNotFound(path)) => {
                error!(path = %path.display(), "error loading file");
                None
            }
            Err(e) => {
                error!(error = ?e, "an error occurred during data processing");
                None
            }
        }
    }

    /// Join, clean and filter two already-loaded text frames.
    pub fn build_table(
        gdp: DataFrame,
        internet: DataFrame,
        columns: &SourceColumns,
    ) -> Result<Table, LoadError> {
        SourceLoader::require_columns(
            &gdp,
            &[
                columns.country.as_str(),
                columns.gdp.as_str(),
                columns.demand_per_capita.as_str(),
                columns.consumption.as_str(),
                columns.population.as_str(),
            ],
            "GDP/consumption source",
        )?;
        SourceLoader::require_columns(
            &internet,
            &[
                columns.internet_country.as_str(),
                columns.internet_year.as_str(),
            ],
            "internet usage source",
        )?;

        let joined = Self::join(gdp, internet, columns)?;
        info!(rows = joined.height(), "joined sources");

        let rows = Self::coerce_rows(&joined, columns)?;
        let total = rows.len();

        let complete: Vec<Record> = rows.into_iter().filter_map(CoercedRow::complete).collect();
        debug!(dropped = total - complete.len(), "dropped incomplete rows");

        let populous = complete.len();
        let filtered: Vec<Record> = complete
            .into_iter()
            .filter(|r| r.population >= MIN_POPULATION)
            .collect();
        debug!(
            dropped = populous - filtered.len(),
            threshold = MIN_POPULATION,
            "dropped small countries"
        );

        let records = Self::dedup_by_country(filtered);
        info!(rows = records.len(), "table ready");
        Ok(Table::new(records))
    }

    /// Inner join on the two country name columns, then drop metadata columns.
    ///
    /// Output rows follow the order of the GDP source.
    fn join(
        gdp: DataFrame,
        internet: DataFrame,
        columns: &SourceColumns,
    ) -> Result<DataFrame, LoadError> {
        let mut joined = gdp
            .lazy()
            .with_row_index(ROW_INDEX, None)
            .join(
                internet.lazy(),
                [col(columns.country.as_str())],
                [col(columns.internet_country.as_str())],
                JoinArgs::new(JoinType::Inner),
            )
            .sort([ROW_INDEX], SortMultipleOptions::default())
            .collect()?;

        let droppable = columns
            .dropped
            .iter()
            .map(String::as_str)
            .chain([columns.internet_country.as_str(), ROW_INDEX]);
        for name in droppable {
            if joined.column(name).is_ok() {
                joined = joined.drop(name)?;
            }
        }
        Ok(joined)
    }

    /// Read the joined text columns into typed, possibly-missing rows.
    fn coerce_rows(df: &DataFrame, columns: &SourceColumns) -> Result<Vec<CoercedRow>, LoadError> {
        let names = text_column(df, &columns.country)?;
        let gdp = numeric_column(df, &columns.gdp)?;
        let demand = numeric_column(df, &columns.demand_per_capita)?;
        let consumption = numeric_column(df, &columns.consumption)?;
        let internet = numeric_column(df, &columns.internet_year)?;
        let population = numeric_column(df, &columns.population)?;

        let rows = (0..df.height())
            .map(|i| CoercedRow {
                country: names
                    .get(i)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
                gdp: gdp[i],
                demand_per_capita: demand[i],
                consumption: consumption[i],
                internet_usage_pct: internet[i],
                population: population[i],
            })
            .collect();
        Ok(rows)
    }

    /// Keep the first record for each country.
    fn dedup_by_country(records: Vec<Record>) -> Vec<Record> {
        let mut seen: HashSet<String> = HashSet::new();
        records
            .into_iter()
            .filter(|r| {
                let fresh = seen.insert(r.country.clone());
                if !fresh {
                    warn!(country = %r.country, "duplicate country after join; keeping first");
                }
                fresh
            })
            .collect()
    }
}

fn text_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked, LoadError> {
    Ok(df.column(name)?.as_materialized_series().str()?)
}

fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, LoadError> {
    Ok(text_column(df, name)?
        .into_iter()
        .map(|v| v.and_then(parse_decimal))
        .collect())
}
