//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Map, Value};

use crate::domain::model::{Explanation, HealthStatus, ModelMetadata, PredictionResult};
use crate::utils::error::{Result, StrengthError};

use super::state::AppState;

pub async fn root(State(state): State<Arc<AppState>>) -> Json<Value> {
    let uptime = chrono::Utc::now().signed_duration_since(state.started_at);
    Json(json!({
        "message": "Concrete Strength Prediction API",
        "docs": "/metadata",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": uptime.num_seconds(),
    }))
}

/// The process only starts serving once the model is loaded, so a running
/// server is always healthy.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        model_loaded: true,
        model_version: state.predictor.metadata().model_version,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn get_metadata(State(state): State<Arc<AppState>>) -> Json<ModelMetadata> {
    Json(state.predictor.metadata())
}

/// 請求內容必須是 JSON 物件，否則回 400
fn json_object(
    payload: std::result::Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Map<String, Value>> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| {
            StrengthError::validation(
                "body",
                format!("Request body must be a JSON object: {}", rejection.body_text()),
            )
        })
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<PredictionResult>> {
    let body = json_object(payload)?;
    state.schema.check(&body)?;
    let result = state.predictor.predict(&body)?;
    Ok(Json(result))
}

pub async fn explain(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Explanation>> {
    let body = json_object(payload)?;
    state.schema.check(&body)?;
    let explanation = state.predictor.explain(&body)?;
    Ok(Json(explanation))
}
