//! Card endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::types::CardQuery;
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::middleware::Caller;
use crate::backend::store::{SharedStore, StoreError};
use crate::shared::board::{Card, CardPatch, MessageResponse, NewCard};
use crate::shared::position::append_position;
use crate::shared::reorder::ReorderBatch;

/// `GET /api/cards?listId=` or `?boardId=`, sorted by position
pub async fn list_cards(
    State(store): State<SharedStore>,
    Query(query): Query<CardQuery>,
) -> ApiResult<Json<Vec<Card>>> {
    let cards = match (query.list_id, query.board_id) {
        (Some(list_id), _) => store.find_cards_by_list(list_id).await?,
        (None, Some(board_id)) => store.find_cards_by_board(board_id).await?,
        (None, None) => {
            return Err(BackendError::validation(
                "boardId",
                "boardId or listId is required",
            ))
        }
    };
    Ok(Json(cards))
}

/// `POST /api/cards`
///
/// Without an explicit `position` the card is appended to its list.
pub async fn create_card(
    State(store): State<SharedStore>,
    _caller: Caller,
    Json(request): Json<NewCard>,
) -> ApiResult<(StatusCode, Json<Card>)> {
    request.validate()?;
    if store.find_list(request.list_id).await?.is_none() {
        return Err(StoreError::not_found("list", request.list_id).into());
    }
    let position = match request.position {
        Some(position) => position,
        None => append_position(&store.find_cards_by_list(request.list_id).await?),
    };
    let mut card = Card::new(request.title, request.list_id, position);
    card.description = request.description.filter(|text| !text.is_empty());
    let card = store.create_card(card).await?;
    tracing::debug!(card_id = %card.id, list_id = %card.list_id, position, "Card created");
    Ok((StatusCode::CREATED, Json(card)))
}

/// `GET /api/cards/{id}`
pub async fn get_card(
    State(store): State<SharedStore>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Card>> {
    let card = store
        .find_card(id)
        .await?
        .ok_or_else(|| BackendError::not_found("card", id))?;
    Ok(Json(card))
}

/// `PUT /api/cards/{id}`
pub async fn update_card(
    State(store): State<SharedStore>,
    _caller: Caller,
    Path(id): Path<Uuid>,
    Json(patch): Json<CardPatch>,
) -> ApiResult<Json<Card>> {
    let card = store.update_card(id, patch).await?;
    Ok(Json(card))
}

/// `DELETE /api/cards/{id}`
pub async fn delete_card(
    State(store): State<SharedStore>,
    _caller: Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    store.delete_card(id).await?;
    tracing::debug!(card_id = %id, "Card deleted");
    Ok(Json(MessageResponse::new("Card deleted")))
}

/// `PATCH /api/cards/reorder`
pub async fn reorder_cards(
    State(store): State<SharedStore>,
    _caller: Caller,
    Json(batch): Json<ReorderBatch>,
) -> ApiResult<Json<MessageResponse>> {
    store.batch_update_cards(&batch.items).await?;
    tracing::debug!(updates = batch.len(), "Cards reordered");
    Ok(Json(MessageResponse::new("Cards reordered")))
}
