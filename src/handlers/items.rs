use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::database::model::ItemDraft;
use crate::database::repository::ListQuery;
use crate::database::unit_of_work::UnitOfWork;
use crate::error::ApiError;

use super::AppState;

/// GET /items - list items with optional filtering and pagination.
/// Answers 204 when the page comes back empty.
pub async fn get_items<U: UnitOfWork + Clone + 'static>(
    State(state): State<AppState<U>>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let items = state.service.get_items(&query).await?;
    if items.is_empty() {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Ok(Json(items).into_response())
    }
}

/// GET /items/:id - fetch a single item.
pub async fn get_item<U: UnitOfWork + Clone + 'static>(
    State(state): State<AppState<U>>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let item = state.service.get_item(id).await?;
    Ok(Json(item).into_response())
}

/// POST /items - insert a new item.
pub async fn post_item<U: UnitOfWork + Clone + 'static>(
    State(state): State<AppState<U>>,
    Json(draft): Json<ItemDraft>,
) -> Result<StatusCode, ApiError> {
    state.service.insert_item(&draft).await?;
    Ok(StatusCode::CREATED)
}

/// PATCH /items/:id - overwrite title, description and completed.
pub async fn patch_item<U: UnitOfWork + Clone + 'static>(
    State(state): State<AppState<U>>,
    Path(id): Path<i32>,
    Json(draft): Json<ItemDraft>,
) -> Result<StatusCode, ApiError> {
    state.service.update_item(id, &draft).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /items/:id - remove an item.
pub async fn delete_item<U: UnitOfWork + Clone + 'static>(
    State(state): State<AppState<U>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
