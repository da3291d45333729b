//! Paper Dashboard - paper & cardboard demand vs. internet usage
//!
//! Loads the two country datasets once, then serves an interactive bubble chart.

mod charts;
mod config;
mod data;
mod web;

use anyhow::Result;
use config::Config;
use data::DataProcessor;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};
use web::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(config.log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .init();

    info!(
        gdp = %config.gdp_path.display(),
        internet = %config.internet_path.display(),
        "loading data"
    );
    let table = DataProcessor::load_or_log(
        &config.gdp_path,
        &config.internet_path,
        &config.source_columns(),
    );
    if table.is_none() {
        warn!("no data loaded; serving an empty selector");
    }

    let state = AppState::new(table);
    info!(
        addr = %config.addr,
        countries = state.countries().len(),
        "server starting"
    );

    warp::serve(web::routes(state)).run(config.addr).await;

    Ok(())
}
