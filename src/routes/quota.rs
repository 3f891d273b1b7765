//! Quota status route

use axum::{extract::State, routing::get, Json, Router};

use crate::quota::QuotaStatus;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/quota", get(status))
}

async fn status(State(state): State<AppState>) -> Json<QuotaStatus> {
    Json(state.quota().status().await)
}
