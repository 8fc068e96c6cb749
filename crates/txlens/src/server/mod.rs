mod error;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};

use txlens_core::types::DecodedTransaction;
use txlens_core::{decode, format_batch, format_transaction, NetworkParams, TxBundle};

use crate::outcome::FormatOutcome;
use error::AppError;

/// Bundles carry every parent's hex, so format requests can be large.
const BODY_LIMIT: usize = 8 * 1024 * 1024;

// ==============================================================================
// Application State
// ==============================================================================

pub struct AppState {
    /// Network used when a request does not name a preset.
    pub network: NetworkParams,
}

type SharedState = Arc<AppState>;

impl AppState {
    fn network_for(&self, coin: Option<&str>) -> Result<NetworkParams, AppError> {
        match coin {
            Some(name) => Ok(NetworkParams::preset(name)?),
            None => Ok(self.network.clone()),
        }
    }
}

// ==============================================================================
// Router
// ==============================================================================

pub fn build_router(state: AppState, origin: HeaderValue) -> Router {
    // Only reflect the allowed origin when the request's Origin header
    // actually matches.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |request_origin: &HeaderValue, _| *request_origin == origin,
        ))
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/networks", get(networks))
        .route("/api/v1/decode", post(decode_tx))
        .route("/api/v1/format", post(format_txs))
        .route("/api", any(api_not_found))
        .route("/api/{*path}", any(api_not_found))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(cors)
        .with_state(Arc::new(state))
}

// ==============================================================================
// DTOs
// ==============================================================================

#[derive(Serialize)]
struct NetworksResponse {
    default: String,
    presets: Vec<NetworkParams>,
}

#[derive(Deserialize)]
struct DecodeRequest {
    hex: String,
    #[serde(default)]
    coin: Option<String>,
}

#[derive(Deserialize)]
struct FormatRequest {
    address: String,
    current_height: u64,
    #[serde(default)]
    coin: Option<String>,
    #[serde(flatten)]
    payload: FormatPayload,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FormatPayload {
    Single { bundle: TxBundle },
    Batch { bundles: Vec<TxBundle> },
}

// ==============================================================================
// Handlers
// ==============================================================================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn networks(State(state): State<SharedState>) -> Result<Json<NetworksResponse>, AppError> {
    let presets = NetworkParams::preset_names()
        .iter()
        .map(|name| NetworkParams::preset(name))
        .collect::<Result<_, _>>()?;
    Ok(Json(NetworksResponse {
        default: state.network.coin.clone(),
        presets,
    }))
}

async fn decode_tx(
    State(state): State<SharedState>,
    req: Result<Json<DecodeRequest>, JsonRejection>,
) -> Result<Json<DecodedTransaction>, AppError> {
    let Json(req) = req.map_err(|e| AppError::BadRequest(e.to_string()))?;
    let network = state.network_for(req.coin.as_deref())?;
    Ok(Json(decode(&req.hex, &network)?))
}

/// A single bundle answers with its records or a mapped error status; a
/// batch always answers 200 with one outcome per bundle.
async fn format_txs(
    State(state): State<SharedState>,
    req: Result<Json<FormatRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = req.map_err(|e| AppError::BadRequest(e.to_string()))?;
    let network = state.network_for(req.coin.as_deref())?;

    match req.payload {
        FormatPayload::Single { bundle } => {
            let classification =
                format_transaction(&bundle, &req.address, &network, req.current_height)?;
            Ok(Json(classification.into_records()).into_response())
        }
        FormatPayload::Batch { bundles } => {
            let outcomes: Vec<FormatOutcome> =
                format_batch(&bundles, &req.address, &network, req.current_height)
                    .into_iter()
                    .map(FormatOutcome::from)
                    .collect();
            Ok(Json(outcomes).into_response())
        }
    }
}

async fn api_not_found() -> AppError {
    AppError::NotFound("API route not found".to_string())
}
