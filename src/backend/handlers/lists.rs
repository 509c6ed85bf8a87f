//! List endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::types::ListQuery;
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::middleware::Caller;
use crate::backend::store::SharedStore;
use crate::shared::board::{List, ListPatch, MessageResponse, NewList};
use crate::shared::position::append_position;
use crate::shared::reorder::ReorderBatch;

/// `GET /api/lists?boardId=`, sorted by position
pub async fn list_lists(
    State(store): State<SharedStore>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<List>>> {
    let board_id = query
        .board_id
        .ok_or_else(|| BackendError::validation("boardId", "boardId is required"))?;
    let lists = store.find_lists_by_board(board_id).await?;
    Ok(Json(lists))
}

/// `POST /api/lists`
///
/// Without an explicit `position` the list is appended after its siblings.
pub async fn create_list(
    State(store): State<SharedStore>,
    _caller: Caller,
    Json(request): Json<NewList>,
) -> ApiResult<(StatusCode, Json<List>)> {
    request.validate()?;
    let position = match request.position {
        Some(position) => position,
        None => append_position(&store.find_lists_by_board(request.board_id).await?),
    };
    let list = store
        .create_list(List::new(request.title, request.board_id, position))
        .await?;
    tracing::debug!(list_id = %list.id, board_id = %list.board_id, position, "List created");
    Ok((StatusCode::CREATED, Json(list)))
}

/// `GET /api/lists/{id}`
pub async fn get_list(
    State(store): State<SharedStore>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<List>> {
    let list = store
        .find_list(id)
        .await?
        .ok_or_else(|| BackendError::not_found("list", id))?;
    Ok(Json(list))
}

/// `PUT /api/lists/{id}`
pub async fn update_list(
    State(store): State<SharedStore>,
    _caller: Caller,
    Path(id): Path<Uuid>,
    Json(patch): Json<ListPatch>,
) -> ApiResult<Json<List>> {
    let list = store.update_list(id, patch).await?;
    Ok(Json(list))
}

/// `DELETE /api/lists/{id}`: removes its cards too
pub async fn delete_list(
    State(store): State<SharedStore>,
    _caller: Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    store.delete_list(id).await?;
    tracing::debug!(list_id = %id, "List deleted");
    Ok(Json(MessageResponse::new("List deleted")))
}

/// `PATCH /api/lists/reorder`
pub async fn reorder_lists(
    State(store): State<SharedStore>,
    _caller: Caller,
    Json(batch): Json<ReorderBatch>,
) -> ApiResult<Json<MessageResponse>> {
    if let Some(item) = batch.items.iter().find(|item| item.list_id.is_some()) {
        return Err(BackendError::validation(
            "listId",
            format!("list {} cannot carry a listId", item.id),
        ));
    }
    store.batch_update_lists(&batch.items).await?;
    tracing::debug!(updates = batch.len(), "Lists reordered");
    Ok(Json(MessageResponse::new("Lists reordered")))
}
