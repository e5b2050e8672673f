use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use chess960_explorer_core::{FilterChange, HighlightTarget, LoadStatus, PositionDetail, ViewModel};
use super::{lock_explorer, ApiError};
use crate::AppState;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: LoadStatus,
    pub loaded_at: Option<String>,
}

pub async fn status(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, ApiError> {
    let status = lock_explorer(&state)?.status();
    let loaded_at = state
        .loaded_at
        .lock()
        .ok()
        .and_then(|t| t.as_ref().map(|t| t.to_rfc3339()));
    Ok(Json(StatusResponse { status, loaded_at }))
}

pub async fn view(State(state): State<Arc<AppState>>) -> Result<Json<ViewModel>, ApiError> {
    Ok(Json(lock_explorer(&state)?.view()?))
}

pub async fn apply_filter(
    State(state): State<Arc<AppState>>,
    Json(change): Json<FilterChange>,
) -> Result<Json<ViewModel>, ApiError> {
    Ok(Json(lock_explorer(&state)?.apply_filter_change(change)?))
}

pub async fn toggle_highlight(
    State(state): State<Arc<AppState>>,
    Json(target): Json<HighlightTarget>,
) -> Result<Json<ViewModel>, ApiError> {
    Ok(Json(lock_explorer(&state)?.toggle_highlight(target)?))
}

pub async fn reset(State(state): State<Arc<AppState>>) -> Result<Json<ViewModel>, ApiError> {
    Ok(Json(lock_explorer(&state)?.reset()?))
}

pub async fn position(
    State(state): State<Arc<AppState>>,
    Path(number): Path<u32>,
) -> Result<Json<PositionDetail>, ApiError> {
    Ok(Json(lock_explorer(&state)?.position(number)?))
}

pub async fn practice(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Option<PositionDetail>>, ApiError> {
    let mut rng = rand::rng();
    Ok(Json(lock_explorer(&state)?.practice(&mut rng)?))
}
