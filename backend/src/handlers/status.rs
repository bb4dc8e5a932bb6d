use axum::{extract::State, http::StatusCode, Json};
use fleet_shared::models::StatusSnapshot;
use std::sync::Arc;

use crate::state::AppState;

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Current snapshot as JSON.
pub async fn get_status(State(state): State<AppState>) -> Json<Arc<StatusSnapshot>> {
    Json(state.cache().snapshot())
}
