//! HTTP JSON server.
//!
//! Exposes the matching engine to front ends that collect symptom text
//! and render results.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/conditions` | Summaries of the loaded catalog |
//! | `POST` | `/recommend` | Check symptoms: `{ "symptoms", "context"?, "explain"? }` |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "symptoms must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser front ends
//! can call the API directly.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use symptom_triage_core::Engine;
use tower_http::cors::{Any, CorsLayer};

use crate::check::{check_symptoms, CheckRequest, CheckResponse};
use crate::conditions::{summarize, ConditionFilter, ConditionSummary};
use crate::config::Config;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Built once before the listener binds; read-only afterwards.
    pub engine: Arc<Engine>,
}

/// Starts the HTTP server on `[server].bind`.
///
/// The engine is fully constructed before binding, so a bad catalog
/// fails startup instead of the first request.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let engine = crate::catalog::build_engine(config)?;
    let app = router(AppState {
        engine: Arc::new(engine),
    });

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!("triage server listening on http://{}", listener.local_addr()?);
    println!("Triage server listening on http://{}", config.server.bind);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the router. Exposed for embedding and tests.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/conditions", get(handle_conditions))
        .route("/recommend", post(handle_recommend))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`).
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /conditions ============

#[derive(Serialize)]
struct ConditionsResponse {
    conditions: Vec<ConditionSummary>,
}

async fn handle_conditions(State(state): State<AppState>) -> Json<ConditionsResponse> {
    Json(ConditionsResponse {
        conditions: summarize(state.engine.catalog(), ConditionFilter::All),
    })
}

// ============ POST /recommend ============

/// Handler for `POST /recommend`.
///
/// The body is parsed by hand so malformed JSON shapes produce the
/// standard error body instead of Axum's default rejection.
async fn handle_recommend(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<CheckResponse>, AppError> {
    let req: CheckRequest =
        serde_json::from_value(body).map_err(|e| bad_request(format!("invalid request: {}", e)))?;

    let response = check_symptoms(&state.engine, &req).map_err(|e| {
        if e.to_string().contains("must") {
            bad_request(e.to_string())
        } else {
            internal(e.to_string())
        }
    })?;

    Ok(Json(response))
}
