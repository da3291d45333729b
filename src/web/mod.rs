//! Web module - HTTP routes and the dashboard page

mod page;
mod routes;

pub use routes::routes;

use crate::data::Table;
use std::sync::Arc;

/// Shared, read-only request state. Built once before serving.
#[derive(Clone, Default)]
pub struct AppState {
    table: Option<Arc<Table>>,
    countries: Arc<Vec<String>>,
}

impl AppState {
    /// `None` means the data could not be loaded; the page still serves.
    pub fn new(table: Option<Table>) -> Self {
        let countries = table.as_ref().map(Table::countries).unwrap_or_default();
        Self {
            table: table.map(Arc::new),
            countries: Arc::new(countries),
        }
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_deref()
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }
}
