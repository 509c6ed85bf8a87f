//! Board endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::backend::aggregate::load_board;
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::middleware::Caller;
use crate::backend::store::SharedStore;
use crate::shared::aggregate::BoardAggregate;
use crate::shared::board::{Board, BoardPatch, MessageResponse, NewBoard};

/// `GET /api/boards`: the caller's boards, newest first
pub async fn list_boards(
    State(store): State<SharedStore>,
    caller: Caller,
) -> ApiResult<Json<Vec<Board>>> {
    let boards = store.find_boards_by_owner(caller.owner_id()).await?;
    Ok(Json(boards))
}

/// `POST /api/boards`
pub async fn create_board(
    State(store): State<SharedStore>,
    caller: Caller,
    Json(request): Json<NewBoard>,
) -> ApiResult<(StatusCode, Json<Board>)> {
    request.validate()?;
    let board = store
        .create_board(Board::new(request.title, caller.0))
        .await?;
    tracing::info!(board_id = %board.id, owner = %board.owner_id, "Board created");
    Ok((StatusCode::CREATED, Json(board)))
}

/// `GET /api/boards/{id}`
pub async fn get_board(
    State(store): State<SharedStore>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Board>> {
    let board = store
        .find_board(id)
        .await?
        .ok_or_else(|| BackendError::not_found("board", id))?;
    Ok(Json(board))
}

/// `PUT /api/boards/{id}`: title only
pub async fn update_board(
    State(store): State<SharedStore>,
    _caller: Caller,
    Path(id): Path<Uuid>,
    Json(patch): Json<BoardPatch>,
) -> ApiResult<Json<Board>> {
    let board = store.update_board(id, patch).await?;
    Ok(Json(board))
}

/// `DELETE /api/boards/{id}`: removes its lists and cards too
pub async fn delete_board(
    State(store): State<SharedStore>,
    _caller: Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    store.delete_board(id).await?;
    tracing::info!(board_id = %id, "Board deleted");
    Ok(Json(MessageResponse::new("Board deleted")))
}

/// `GET /api/boards/{id}/aggregate`
pub async fn get_board_aggregate(
    State(store): State<SharedStore>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BoardAggregate>> {
    let aggregate = load_board(store.as_ref(), id).await?;
    Ok(Json(aggregate))
}
