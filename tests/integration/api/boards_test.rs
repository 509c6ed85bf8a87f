//! Board endpoint tests

use axum::http::{Method, StatusCode};
use kanboard::backend::EntityStore;
use kanboard::shared::{Board, BoardAggregate, List};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::common::{titles, TestApp, OWNER};
use crate::{assert_contains, assert_status};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request(Method::GET, "/health", None, None).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body, json!("ok"));
}

#[tokio::test]
async fn test_create_board_requires_token() {
    let app = TestApp::new();
    let response = app
        .request(
            Method::POST,
            "/api/boards",
            None,
            Some(json!({ "title": "Roadmap" })),
        )
        .await;

    assert_status!(response, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["status"], 401);
    assert!(app.store.find_boards_by_owner(OWNER).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_and_get_board() {
    let app = TestApp::new();
    let board = app.create_board("Roadmap").await;

    assert_eq!(board.title, "Roadmap");
    assert_eq!(board.owner_id, OWNER);

    let fetched: Board = app.get(&format!("/api/boards/{}", board.id)).await.json();
    assert_eq!(fetched, board);
}

#[tokio::test]
async fn test_blank_title_is_rejected() {
    let app = TestApp::new();
    let response = app.post("/api/boards", json!({ "title": "  " })).await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_contains!(response.error_message(), "title");
}

#[tokio::test]
async fn test_list_boards_is_per_owner() {
    let app = TestApp::new();
    let first = app.create_board("First").await;
    let second = app.create_board("Second").await;
    app.request(
        Method::POST,
        "/api/boards",
        Some("someone-else"),
        Some(json!({ "title": "Theirs" })),
    )
    .await;

    let boards: Vec<Board> = app.get("/api/boards").await.json();
    let ids: Vec<Uuid> = boards.iter().map(|board| board.id).collect();

    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&first.id));
    assert!(ids.contains(&second.id));
    assert!(boards[0].created_at >= boards[1].created_at);
}

#[tokio::test]
async fn test_unknown_board_is_404() {
    let app = TestApp::new();
    let response = app.get(&format!("/api/boards/{}", Uuid::new_v4())).await;
    assert_status!(response, StatusCode::NOT_FOUND);
    assert_eq!(response.body["status"], 404);

    let response = app
        .get(&format!("/api/boards/{}/aggregate", Uuid::new_v4()))
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rename_board() {
    let app = TestApp::new();
    let board = app.create_board("Draft").await;

    let response = app
        .put(&format!("/api/boards/{}", board.id), json!({ "title": "Final" }))
        .await;
    assert_status!(response, StatusCode::OK);

    let renamed: Board = response.json();
    assert_eq!(renamed.title, "Final");
    assert_eq!(renamed.created_at, board.created_at);
}

#[tokio::test]
async fn test_delete_board_cascades() {
    let app = TestApp::new();
    let (board, lists, cards) = app.seed(&[("Todo", &["A", "B"]), ("Done", &["X"])]).await;

    let response = app.delete(&format!("/api/boards/{}", board.id)).await;
    assert_status!(response, StatusCode::OK);

    assert_status!(
        app.get(&format!("/api/boards/{}", board.id)).await,
        StatusCode::NOT_FOUND
    );
    assert!(app.lists_of(board.id).await.is_empty());
    assert_status!(
        app.get(&format!("/api/lists/{}", lists[0].id)).await,
        StatusCode::NOT_FOUND
    );
    assert_status!(
        app.get(&format!("/api/cards/{}", cards[1][0].id)).await,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_aggregate_is_sorted() {
    let app = TestApp::new();
    let board = app.create_board("Sprint").await;
    let later = app
        .post(
            "/api/lists",
            json!({ "title": "Later", "boardId": board.id, "position": 1 }),
        )
        .await
        .json::<List>();
    let sooner = app
        .post(
            "/api/lists",
            json!({ "title": "Sooner", "boardId": board.id, "position": 0 }),
        )
        .await
        .json::<List>();
    app.post(
        "/api/cards",
        json!({ "title": "second", "listId": sooner.id, "position": 1 }),
    )
    .await;
    app.post(
        "/api/cards",
        json!({ "title": "first", "listId": sooner.id, "position": 0 }),
    )
    .await;

    let aggregate: BoardAggregate = app
        .get(&format!("/api/boards/{}/aggregate", board.id))
        .await
        .json();

    assert_eq!(aggregate.board, board);
    assert_eq!(aggregate.lists, vec![sooner.clone(), later]);
    let cards: Vec<_> = aggregate.cards_in(sooner.id).into_iter().cloned().collect();
    assert_eq!(titles(&cards), vec!["first", "second"]);
}
