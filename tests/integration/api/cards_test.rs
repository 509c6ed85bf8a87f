//! Card endpoint tests

use axum::http::StatusCode;
use kanboard::shared::Card;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::common::{titles, TestApp};
use crate::{assert_contains, assert_contiguous, assert_status};

#[tokio::test]
async fn test_cards_require_a_parent() {
    let app = TestApp::new();
    let response = app.get("/api/cards").await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_contains!(response.error_message(), "listId");
}

#[tokio::test]
async fn test_create_appends_within_list() {
    let app = TestApp::new();
    let (_board, lists, _cards) = app.seed(&[("Todo", &["A", "B", "C"]), ("Done", &["X"])]).await;

    let todo = app.cards_of(lists[0].id).await;
    assert_eq!(titles(&todo), vec!["A", "B", "C"]);
    assert_contiguous!(todo);

    let done = app.cards_of(lists[1].id).await;
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].position, 0);
}

#[tokio::test]
async fn test_cards_by_board() {
    let app = TestApp::new();
    let (board, _lists, cards) = app.seed(&[("Todo", &["A", "B"]), ("Done", &["X"])]).await;
    let other = app.seed(&[("Elsewhere", &["Z"])]).await;

    let on_board: Vec<Card> = app
        .get(&format!("/api/cards?boardId={}", board.id))
        .await
        .json();

    assert_eq!(on_board.len(), 3);
    for card in cards.iter().flatten() {
        assert!(on_board.contains(card));
    }
    assert!(!on_board.contains(&other.2[0][0]));
}

#[tokio::test]
async fn test_list_id_wins_over_board_id() {
    let app = TestApp::new();
    let (board, lists, cards) = app.seed(&[("Todo", &["A", "B"]), ("Done", &["X"])]).await;

    let only_done: Vec<Card> = app
        .get(&format!(
            "/api/cards?boardId={}&listId={}",
            board.id, lists[1].id
        ))
        .await
        .json();
    assert_eq!(only_done, cards[1]);
}

#[tokio::test]
async fn test_create_card_on_unknown_list() {
    let app = TestApp::new();
    let response = app
        .post(
            "/api/cards",
            json!({ "title": "Orphan", "listId": Uuid::new_v4() }),
        )
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_description_round_trips() {
    let app = TestApp::new();
    let (_board, lists, _cards) = app.seed(&[("Todo", &[])]).await;

    let card: Card = app
        .post(
            "/api/cards",
            json!({ "title": "Bug", "listId": lists[0].id, "description": "steps" }),
        )
        .await
        .json();
    assert_eq!(card.description.as_deref(), Some("steps"));

    let blank: Card = app
        .post(
            "/api/cards",
            json!({ "title": "Chore", "listId": lists[0].id, "description": "" }),
        )
        .await
        .json();
    assert_eq!(blank.description, None);

    let cleared: Card = app
        .put(&format!("/api/cards/{}", card.id), json!({ "description": "" }))
        .await
        .json();
    assert_eq!(cleared.description, None);
    assert_eq!(cleared.title, "Bug");
}

#[tokio::test]
async fn test_update_card_moves_list() {
    let app = TestApp::new();
    let (_board, lists, cards) = app.seed(&[("Todo", &["A"]), ("Done", &[])]).await;

    let moved: Card = app
        .put(
            &format!("/api/cards/{}", cards[0][0].id),
            json!({ "listId": lists[1].id, "position": 0 }),
        )
        .await
        .json();
    assert_eq!(moved.list_id, lists[1].id);

    assert!(app.cards_of(lists[0].id).await.is_empty());
    assert_eq!(app.cards_of(lists[1].id).await, vec![moved]);
}

#[tokio::test]
async fn test_update_card_to_unknown_list() {
    let app = TestApp::new();
    let (_board, lists, cards) = app.seed(&[("Todo", &["A"])]).await;

    let response = app
        .put(
            &format!("/api/cards/{}", cards[0][0].id),
            json!({ "listId": Uuid::new_v4() }),
        )
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
    assert_eq!(app.cards_of(lists[0].id).await, cards[0]);
}

#[tokio::test]
async fn test_delete_card() {
    let app = TestApp::new();
    let (_board, lists, cards) = app.seed(&[("Todo", &["A", "B"])]).await;

    let response = app.delete(&format!("/api/cards/{}", cards[0][0].id)).await;
    assert_status!(response, StatusCode::OK);

    let remaining = app.cards_of(lists[0].id).await;
    assert_eq!(titles(&remaining), vec!["B"]);

    let response = app.delete(&format!("/api/cards/{}", cards[0][0].id)).await;
    assert_status!(response, StatusCode::NOT_FOUND);
}
