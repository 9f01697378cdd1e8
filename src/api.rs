//! HTTP surface for the fusion battle service
//!
//! Four routes over shared [`AppState`]. Input problems are 400, pipeline
//! and upstream failures are 500, and every error body is the same
//! `{error, details?}` shape.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pokefusion_catalog::CatalogClient;
use pokefusion_engine::BattleOrchestrator;
use pokefusion_matchups::Matchups;
use pokefusion_schema::schemas::battle_request_schema;
use pokefusion_schema::validate_as;
use pokefusion_utils::types::{BattleRequest, ErrorResponse};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

/// Page served by the listing route: the first generation.
const LIST_LIMIT: u32 = 151;

/// Identifiers the catalog supports.
const MAX_POKEMON_ID: u32 = 1025;

/// Shared per-process handles. The matchup chart is warmed at startup
/// and held here for the process lifetime.
pub struct AppState {
    pub catalog: CatalogClient,
    pub orchestrator: BattleOrchestrator,
    pub matchups: Matchups,
}

/// Build the application router.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/pokemon", get(list_pokemon))
        .route("/api/pokemon/:id", get(get_pokemon))
        .route("/api/battle", post(run_battle))
        .route("/health", get(health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

async fn list_pokemon(State(state): State<Arc<AppState>>) -> Response {
    match state.catalog.fetch_pokemon_list(LIST_LIMIT, 0).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            error!(error = %e, "pokemon list fetch failed");
            internal_error("Failed to fetch Pokemon list", &e.to_string())
        }
    }
}

async fn get_pokemon(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let id = match id.parse::<u32>() {
        Ok(id) if (1..=MAX_POKEMON_ID).contains(&id) => id,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Invalid Pokemon ID")),
            )
                .into_response();
        }
    };

    match state.catalog.fetch_pokemon(id).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => {
            error!(id, error = %e, "pokemon fetch failed");
            internal_error("Failed to fetch Pokemon", &e.to_string())
        }
    }
}

async fn run_battle(
    State(state): State<Arc<AppState>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return bad_request("Invalid request body", rejection.body_text());
        }
    };

    let request: BattleRequest = match validate_as(&body, &battle_request_schema()) {
        Ok(request) => request,
        Err(e) => {
            return bad_request("Invalid request body", e.joined());
        }
    };

    match state.orchestrator.run(request).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            error!(stage = %e.stage, error = %e, "battle pipeline failed");
            internal_error("Failed to complete battle", &e.to_string())
        }
    }
}

fn bad_request(message: &str, details: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::with_details(message, details)),
    )
        .into_response()
}

fn internal_error(message: &str, details: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::with_details(message, details)),
    )
        .into_response()
}
