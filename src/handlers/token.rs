use axum::{extract::State, Json};

use crate::auth::TokenResponse;
use crate::database::unit_of_work::UnitOfWork;
use crate::error::ApiError;

use super::AppState;

/// GET /token - issue a fresh bearer token.
pub async fn get_token<U: UnitOfWork + Clone + 'static>(
    State(state): State<AppState<U>>,
) -> Result<Json<TokenResponse>, ApiError> {
    Ok(Json(state.tokens.create_token()?))
}
