//! Data module - source loading, cleaning and the country table

mod loader;
mod processor;
mod table;

pub use loader::SourceColumns;
pub use processor::DataProcessor;
pub use table::{Record, Table};

#[cfg(test)]
pub(crate) use table::record;
