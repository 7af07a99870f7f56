use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use cutplan_core::{
    drop_zero_size_parts, validate_input, CuttingError, CuttingOptimizer, OptimizationInput,
    OptimizationResult,
};
use serde_json::json;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod config;
mod storage;

use config::ApiConfig;
use storage::JobStorage;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
struct AppState {
    config: Arc<ApiConfig>,
    storage: JobStorage,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("Could not load .env: {}", err);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ApiConfig::from_env();
    if config.api_key.is_none() {
        warn!("API_KEY is not set; optimization requests will be refused");
    }

    info!("Starting cutting plan API");

    let addr = config.socket_addr();
    let state = AppState {
        storage: JobStorage::new(config.data_dir.clone()),
        config: Arc::new(config),
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/optimizer", post(optimize))
        .route("/api/jobs", post(store_job))
        .route("/api/jobs/:id", get(load_job))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "cutplan-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Main optimization endpoint
async fn optimize(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<OptimizationInput>,
) -> Result<Json<OptimizationResult>, AppError> {
    authorize(&state.config, &headers)?;
    validate_input(&input, &state.config.cutting)?;

    info!(
        "Received optimization request with {} parts and {} materials",
        input.parts.len(),
        input.available_materials.as_ref().map_or(0, Vec::len)
    );

    let cutting = state.config.cutting.clone();
    let result = tokio::task::spawn_blocking(move || {
        CuttingOptimizer::new(cutting).optimize_cutting(&input)
    })
    .await
    .map_err(|err| AppError::Internal(err.into()))??;

    info!(
        "Optimization complete: {} sheets, {:.2}% utilization, complete: {}",
        result.sheets.len(),
        result.utilization_rate,
        result.is_complete
    );

    Ok(Json(result))
}

/// Persists a request body for later retrieval by the UI
async fn store_job(
    State(state): State<AppState>,
    Json(input): Json<OptimizationInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    let input = drop_zero_size_parts(input);
    let id = state.storage.store(&input).await?;
    info!("Stored job {} with {} parts", id, input.parts.len());

    Ok(Json(json!({ "dataId": id })))
}

async fn load_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OptimizationInput>, AppError> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest(format!("Invalid job id '{}'", id)))?;

    match state.storage.load(id).await? {
        Some(input) => Ok(Json(input)),
        None => Err(AppError::NotFound(format!("Job {} not found", id))),
    }
}

fn authorize(config: &ApiConfig, headers: &HeaderMap) -> Result<(), AppError> {
    let Some(expected) = config.api_key.as_deref() else {
        return Err(AppError::Internal(anyhow::anyhow!("API_KEY is not configured")));
    };

    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(key) if bool::from(key.as_bytes().ct_eq(expected.as_bytes())) => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}

/// Application error type
#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("Missing or invalid API key")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<CuttingError> for AppError {
    fn from(err: CuttingError) -> Self {
        match err {
            CuttingError::InvalidInput(_) => AppError::BadRequest(err.to_string()),
            CuttingError::PackingEngine(_) => AppError::Internal(err.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request error: {:#}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        (
            status,
            Json(json!({
                "error": self.to_string(),
            })),
        )
            .into_response()
    }
}
