//! Reorder endpoint tests
//!
//! The batches here are produced by the reorder engine wherever possible,
//! so these also check that what the engine emits is what the endpoints
//! accept.

use axum::http::{Method, StatusCode};
use kanboard::shared::reorder::{reorder_cards, reorder_lists};
use kanboard::shared::{DropLocation, Move};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::common::{titles, TestApp};
use crate::{assert_contiguous, assert_status};

#[tokio::test]
async fn test_reorder_lists_with_engine_batch() {
    let app = TestApp::new();
    let (board, lists, _cards) = app.seed(&[("Todo", &[]), ("Doing", &[]), ("Done", &[])]).await;

    let plan = reorder_lists(&lists, &Move::list(lists[2].id, board.id, 2, 0)).unwrap();
    let response = app
        .patch("/api/lists/reorder", serde_json::to_value(&plan.batch).unwrap())
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["message"], "Lists reordered");

    let stored = app.lists_of(board.id).await;
    let names: Vec<&str> = stored.iter().map(|list| list.title.as_str()).collect();
    assert_eq!(names, vec!["Done", "Todo", "Doing"]);
    assert_contiguous!(stored);
    assert_eq!(stored, plan.lists);
}

#[tokio::test]
async fn test_reorder_cards_within_list() {
    let app = TestApp::new();
    let (_board, lists, cards) = app.seed(&[("Todo", &["A", "B", "C", "D"])]).await;
    let todo = lists[0].id;

    let mv = Move::card(
        cards[0][0].id,
        DropLocation::new(todo, 0),
        DropLocation::new(todo, 2),
    );
    let plan = reorder_cards(&mv, &cards[0], &[]).unwrap();
    let response = app
        .patch("/api/cards/reorder", serde_json::to_value(&plan.batch).unwrap())
        .await;
    assert_status!(response, StatusCode::OK);

    let stored = app.cards_of(todo).await;
    assert_eq!(titles(&stored), vec!["B", "C", "A", "D"]);
    assert_contiguous!(stored);
}

#[tokio::test]
async fn test_reorder_cards_across_lists() {
    let app = TestApp::new();
    let (board, lists, cards) = app
        .seed(&[("Todo", &["A", "B", "C"]), ("Done", &["X", "Y"])])
        .await;
    let (todo, done) = (lists[0].id, lists[1].id);

    let mv = Move::card(
        cards[0][1].id,
        DropLocation::new(todo, 1),
        DropLocation::new(done, 1),
    );
    let plan = reorder_cards(&mv, &cards[0], &cards[1]).unwrap();
    assert_eq!(plan.batch.len(), 5);

    let response = app
        .patch("/api/cards/reorder", serde_json::to_value(&plan.batch).unwrap())
        .await;
    assert_status!(response, StatusCode::OK);

    let source = app.cards_of(todo).await;
    let destination = app.cards_of(done).await;
    assert_eq!(titles(&source), vec!["A", "C"]);
    assert_eq!(titles(&destination), vec!["X", "B", "Y"]);
    assert_contiguous!(source);
    assert_contiguous!(destination);

    let aggregate: kanboard::shared::BoardAggregate = app
        .get(&format!("/api/boards/{}/aggregate", board.id))
        .await
        .json();
    assert_eq!(aggregate.cards.len(), 5);
}

#[tokio::test]
async fn test_batch_with_unknown_id_changes_nothing() {
    let app = TestApp::new();
    let (_board, lists, cards) = app.seed(&[("Todo", &["A", "B"])]).await;

    let response = app
        .patch(
            "/api/cards/reorder",
            json!({ "items": [
                { "id": cards[0][0].id, "position": 1 },
                { "id": cards[0][1].id, "position": 0 },
                { "id": Uuid::new_v4(), "position": 2 },
            ]}),
        )
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
    assert_eq!(app.cards_of(lists[0].id).await, cards[0]);
}

#[tokio::test]
async fn test_batch_with_duplicate_id_is_rejected() {
    let app = TestApp::new();
    let (board, lists, _cards) = app.seed(&[("Todo", &[]), ("Done", &[])]).await;

    let response = app
        .patch(
            "/api/lists/reorder",
            json!({ "items": [
                { "id": lists[0].id, "position": 1 },
                { "id": lists[0].id, "position": 0 },
            ]}),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(app.lists_of(board.id).await, lists);
}

#[tokio::test]
async fn test_list_batch_cannot_carry_list_id() {
    let app = TestApp::new();
    let (board, lists, _cards) = app.seed(&[("Todo", &[]), ("Done", &[])]).await;

    let response = app
        .patch(
            "/api/lists/reorder",
            json!({ "items": [
                { "id": lists[0].id, "position": 1, "listId": Uuid::new_v4() },
            ]}),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(app.lists_of(board.id).await, lists);
}

#[tokio::test]
async fn test_reorder_requires_token() {
    let app = TestApp::new();
    let (_board, lists, cards) = app.seed(&[("Todo", &["A", "B"])]).await;

    let response = app
        .request(
            Method::PATCH,
            "/api/cards/reorder",
            None,
            Some(json!({ "items": [{ "id": cards[0][0].id, "position": 1 }] })),
        )
        .await;
    assert_status!(response, StatusCode::UNAUTHORIZED);
    assert_eq!(app.cards_of(lists[0].id).await, cards[0]);
}

#[tokio::test]
async fn test_empty_batch_is_accepted() {
    let app = TestApp::new();
    let response = app.patch("/api/lists/reorder", json!({ "items": [] })).await;
    assert_status!(response, StatusCode::OK);
}
