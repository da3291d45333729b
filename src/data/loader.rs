//! CSV Source Loader Module
//! Reads the `;`-delimited source files into text-typed Polars frames.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("Column '{column}' missing from {source_name}")]
    MissingColumn {
        column: String,
        source_name: &'static str,
    },
    #[error("Failed to process CSV: {0}")]
    Polars(#[from] PolarsError),
}

/// Column names of the two sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceColumns {
    // GDP / consumption source
    pub country: String,
    pub gdp: String,
    pub demand_per_capita: String,
    pub consumption: String,
    pub population: String,
    // Internet usage source
    pub internet_country: String,
    /// Year column holding the usage percentage, e.g. "2022".
    pub internet_year: String,
    /// Metadata columns that are not carried past the join.
    pub dropped: Vec<String>,
}

impl Default for SourceColumns {
    fn default() -> Self {
        Self::for_year("2022")
    }
}

impl SourceColumns {
    pub fn for_year(year: &str) -> Self {
        Self {
            country: "Paises".into(),
            gdp: "GDP Pais".into(),
            demand_per_capita: "Demanda per capita".into(),
            consumption: "Consumo".into(),
            population: "Población".into(),
            internet_country: "Country Name".into(),
            internet_year: year.into(),
            dropped: vec![
                "Country Code".into(),
                "Indicator Name".into(),
                "Indicator Code".into(),
            ],
        }
    }
}

/// Handles reading a source file with every column kept as text.
pub struct SourceLoader;

impl SourceLoader {
    /// Load a `;`-delimited CSV. Numbers stay as strings so decimal commas
    /// can be handled by the processor.
    pub fn load_csv(path: &Path) -> Result<DataFrame, LoadError> {
        if !path.is_file() {
            return Err(LoadError::SourceNotFound(path.to_path_buf()));
        }

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_separator(b';')
            .with_encoding(CsvEncoding::LossyUtf8)
            // 0 rows of inference reads every column as String
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        tracing::debug!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded source"
        );
        Ok(df)
    }

    /// Fail with `MissingColumn` unless `df` has every column in `required`.
    pub fn require_columns(
        df: &DataFrame,
        required: &[&str],
        source_name: &'static str,
    ) -> Result<(), LoadError> {
        let present: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
        match required.iter().find(|c| !present.contains(*c)) {
            Some(missing) => Err(LoadError::MissingColumn {
                column: missing.to_string(),
                source_name,
            }),
            None => Ok(()),
        }
    }
}
