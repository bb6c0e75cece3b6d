use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::database::unit_of_work::UnitOfWork;

use super::AppState;

/// GET /health - liveness probe that opens and closes a database session.
pub async fn health<U: UnitOfWork + Clone + 'static>(
    State(state): State<AppState<U>>,
) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.service.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": err.to_string()
            })),
        ),
    }
}
