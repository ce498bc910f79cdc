use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{CityCostProfile, sorted_for_display};

mod dataset;
mod error;
mod places;
mod scenario;

pub use dataset::{Dataset, FinderCity, scope_places};
pub use error::ApiError;
pub use places::{DEFAULT_RADIUS_KM, directions_url};
pub use scenario::{CliLifestyle, ScenarioCli, evaluate_cli};

use places::{PlacesPayload, build_places_response, places_request_from_payload};
use scenario::{ScenarioPayload, build_scenario_response, scenario_request_from_payload};

#[derive(Clone)]
struct AppState {
    dataset: Arc<Dataset>,
}

/// A list given either as a JSON array or as a comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListOrCsv<T> {
    List(Vec<T>),
    Csv(String),
}

impl<T> ListOrCsv<T>
where
    T: FromStr,
    T::Err: Display,
{
    pub(crate) fn into_vec(self) -> Result<Vec<T>, ApiError> {
        match self {
            ListOrCsv::List(items) => Ok(items),
            ListOrCsv::Csv(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| item.parse::<T>().map_err(|e| ApiError::invalid(e.to_string())))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn router(dataset: Arc<Dataset>) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/finder/cities", get(finder_cities_handler))
        .route(
            "/api/places",
            get(places_get_handler).post(places_post_handler),
        )
        .route("/api/cost/cities", get(cost_cities_handler))
        .route(
            "/api/scenario",
            get(scenario_get_handler).post(scenario_post_handler),
        )
        .fallback(not_found_handler)
        .with_state(AppState { dataset })
}

pub async fn run_http_server(port: u16) -> Result<(), ApiError> {
    let dataset = Arc::new(Dataset::embedded()?);
    info!(
        finder_cities = dataset.finder_cities.len(),
        places = dataset.places.len(),
        cost_cities = dataset.cost_cities.len(),
        "loaded embedded dataset"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("waymark HTTP API listening on http://{addr}");
    info!("local access: http://127.0.0.1:{port}/api/health");

    axum::serve(listener, router(dataset)).await?;
    Ok(())
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn finder_cities_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, &state.dataset.finder_cities)
}

async fn cost_cities_handler(State(state): State<AppState>) -> Response {
    let cities: Vec<CityCostProfile> = sorted_for_display(&state.dataset.cost_cities);
    json_response(StatusCode::OK, cities)
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn places_get_handler(
    State(state): State<AppState>,
    Query(payload): Query<PlacesPayload>,
) -> Response {
    places_handler_impl(&state, payload)
}

async fn places_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<PlacesPayload>,
) -> Response {
    places_handler_impl(&state, payload)
}

fn places_handler_impl(state: &AppState, payload: PlacesPayload) -> Response {
    let request = match places_request_from_payload(payload, &state.dataset) {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "rejected places request");
            return err.into_response();
        }
    };

    let response = build_places_response(request, &state.dataset);
    debug!(
        city = %response.city.id,
        shabbat_mode = response.shabbat_mode,
        count = response.count,
        "ranked places"
    );
    json_response(StatusCode::OK, response)
}

async fn scenario_get_handler(
    State(state): State<AppState>,
    Query(payload): Query<ScenarioPayload>,
) -> Response {
    scenario_handler_impl(&state, payload)
}

async fn scenario_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<ScenarioPayload>,
) -> Response {
    scenario_handler_impl(&state, payload)
}

fn scenario_handler_impl(state: &AppState, payload: ScenarioPayload) -> Response {
    let cities = &state.dataset.cost_cities;
    let request = match scenario_request_from_payload(payload, cities) {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "rejected scenario request");
            return err.into_response();
        }
    };

    let response = build_scenario_response(&request, cities);
    debug!(
        city = %response.result.city,
        net = response.result.net,
        verdict = response.verdict_label,
        "evaluated scenario"
    );
    json_response(StatusCode::OK, response)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

pub(crate) fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
