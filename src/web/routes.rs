//! HTTP routes: page, figure JSON, PNG snapshot and health check.

use super::{page, AppState};
use crate::charts::{ChartPlotter, StaticChartRenderer, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tracing::{debug, warn};
use warp::http::StatusCode;
use warp::reply::{Reply, Response};
use warp::{Filter, Rejection};

const MAX_BODY_BYTES: u64 = 16 * 1024;

#[derive(Debug, Deserialize)]
pub struct PlotRequest {
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// All routes, with `state` injected into every handler.
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let page_route = warp::path::end()
        .and(warp::get())
        .and(with_state(state.clone()))
        .map(index);

    let plot_route = warp::path("plot")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .map(plot);

    let snapshot_route = warp::path("plot.png")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<PlotRequest>())
        .and(with_state(state.clone()))
        .map(plot_png);

    let health_route = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state))
        .map(health);

    page_route
        .or(plot_route)
        .or(snapshot_route)
        .or(health_route)
        .with(warp::trace::request())
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn index(state: AppState) -> Response {
    warp::reply::html(page::render(state.countries())).into_response()
}

fn plot(req: PlotRequest, state: AppState) -> Response {
    debug!(country = ?req.country, "plot request");
    match ChartPlotter::build_chart(state.table(), req.country.as_deref()) {
        Ok(figure) => warp::reply::json(&figure).into_response(),
        Err(e) => {
            warn!(error = %e, "plot request failed");
            error_reply(e.to_string())
        }
    }
}

fn plot_png(req: PlotRequest, state: AppState) -> Response {
    debug!(country = ?req.country, "snapshot request");
    match StaticChartRenderer::render_png(
        state.table(),
        req.country.as_deref(),
        DEFAULT_WIDTH,
        DEFAULT_HEIGHT,
    ) {
        Ok(png) => warp::reply::with_header(png, "content-type", "image/png").into_response(),
        Err(e) => {
            warn!(error = %e, "snapshot request failed");
            error_reply(e.to_string())
        }
    }
}

fn health(state: AppState) -> Response {
    warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "countries": state.countries().len(),
    }))
    .into_response()
}

fn error_reply(error: String) -> Response {
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse { error }),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{record, Table};
    use serde_json::{json, Value};

    fn loaded() -> AppState {
        AppState::new(Some(Table::new(vec![
            record("Chile", 19.6e6),
            record("Argentina", 46.0e6),
        ])))
    }

    async fn post_plot(state: AppState, body: Value) -> (StatusCode, Value) {
        let res = warp::test::request()
            .method("POST")
            .path("/plot")
            .json(&body)
            .reply(&routes(state))
            .await;
        let status = res.status();
        (status, serde_json::from_slice(res.body()).unwrap())
    }

    #[tokio::test]
    async fn index_lists_sorted_countries() {
        let res = warp::test::request().path("/").reply(&routes(loaded())).await;
        assert_eq!(res.status(), StatusCode::OK);

        let html = String::from_utf8(res.body().to_vec()).unwrap();
        let argentina = html.find(r#"value="Argentina""#).unwrap();
        let chile = html.find(r#"value="Chile""#).unwrap();
        assert!(argentina < chile);
    }

    #[tokio::test]
    async fn index_serves_without_data() {
        let res = warp::test::request().path("/").reply(&routes(AppState::new(None))).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn plot_highlights_selection() {
        let (status, body) = post_plot(loaded(), json!({ "country": "Chile" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][1]["name"], "Chile");
    }

    #[tokio::test]
    async fn plot_without_match_is_base_only() {
        for body in [json!({ "country": "" }), json!({ "country": "Atlantis" }), json!({})] {
            let (status, figure) = post_plot(loaded(), body).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(figure["data"].as_array().unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn plot_without_data_is_server_error() {
        for state in [AppState::new(None), AppState::new(Some(Table::default()))] {
            let (status, body) = post_plot(state, json!({ "country": "Chile" })).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["error"], "Data not loaded or empty");
        }
    }

    #[tokio::test]
    async fn snapshot_without_data_is_server_error() {
        let res = warp::test::request()
            .path("/plot.png?country=Chile")
            .reply(&routes(AppState::new(None)))
            .await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn health_reports_country_count() {
        let res = warp::test::request().path("/health").reply(&routes(loaded())).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["countries"], 2);
    }
}
