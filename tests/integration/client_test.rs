//! Client against a live server
//!
//! Starts the real router on an ephemeral port and drives it through
//! `HttpBoardApi` and `BoardSync`.

use std::sync::Arc;

use assert_matches::assert_matches;
use kanboard::backend::server::create_app_with_store;
use kanboard::backend::{EntityStore, MemoryStore};
use kanboard::client::{BoardApi, BoardState, BoardSync, HttpBoardApi, SyncError, SyncOutcome};
use kanboard::shared::{AppConfig, DragResult, DropLocation, MoveKind, SharedError};
use pretty_assertions::assert_eq;
use tokio::net::TcpListener;

use crate::common::{titles, OWNER};
use crate::{assert_contiguous, assert_ok};

struct LiveServer {
    url: String,
    store: Arc<MemoryStore>,
}

async fn spawn_server() -> LiveServer {
    let store = Arc::new(MemoryStore::new());
    let app = create_app_with_store(store.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    LiveServer {
        url: format!("http://{}", addr),
        store,
    }
}

fn client(server: &LiveServer) -> HttpBoardApi {
    let config = AppConfig::builder()
        .server_url(server.url.clone())
        .build()
        .unwrap();
    HttpBoardApi::new(config).unwrap().with_token(OWNER)
}

fn card_drop(card_id: uuid::Uuid, from: DropLocation, to: DropLocation) -> DragResult {
    DragResult {
        kind: MoveKind::Card,
        entity_id: card_id,
        source: from,
        destination: Some(to),
    }
}

/// Board with "Todo" (A, B, C) and "Done" (empty), built through the client
async fn seeded_sync(api: &HttpBoardApi) -> BoardSync {
    let board = assert_ok!(api.create_board("Sprint").await);
    let mut sync = assert_ok!(BoardSync::load(api, board.id).await);
    let todo = assert_ok!(sync.add_list(api, "Todo").await);
    assert_ok!(sync.add_list(api, "Done").await);
    for title in ["A", "B", "C"] {
        assert_ok!(sync.add_card(api, todo.id, title, None).await);
    }
    sync
}

#[tokio::test]
async fn test_create_and_load_board() {
    let server = spawn_server().await;
    let api = client(&server);
    let sync = seeded_sync(&api).await;

    let boards = assert_ok!(api.list_boards().await);
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0].owner_id, OWNER);

    let loaded = assert_ok!(BoardSync::load(&api, sync.state().board_id()).await);
    assert_eq!(loaded.state(), sync.state());
    let todo = sync.state().lists()[0].id;
    assert_eq!(titles(sync.state().cards_in(todo)), vec!["A", "B", "C"]);
    assert_contiguous!(sync.state().lists());

    let aggregate = assert_ok!(api.fetch_aggregate(sync.state().board_id()).await);
    assert_eq!(&BoardState::from_aggregate(aggregate), sync.state());
}

#[tokio::test]
async fn test_cross_list_reorder_reconciles() {
    let server = spawn_server().await;
    let api = client(&server);
    let mut sync = seeded_sync(&api).await;
    let (todo, done) = (sync.state().lists()[0].id, sync.state().lists()[1].id);
    let card_b = sync.state().cards_in(todo)[1].id;

    let outcome = sync
        .reorder(
            &api,
            card_drop(card_b, DropLocation::new(todo, 1), DropLocation::new(done, 0)),
            true,
        )
        .await
        .unwrap();
    assert_matches!(outcome, Some(SyncOutcome::Reconciled));

    assert_eq!(titles(sync.state().cards_in(todo)), vec!["A", "C"]);
    assert_eq!(titles(sync.state().cards_in(done)), vec!["B"]);
    assert_eq!(server.store.find_cards_by_list(done).await.unwrap()[0].id, card_b);
    assert_contiguous!(server.store.find_cards_by_list(todo).await.unwrap());
}

#[tokio::test]
async fn test_list_reorder_confirmed_without_refetch() {
    let server = spawn_server().await;
    let api = client(&server);
    let mut sync = seeded_sync(&api).await;
    let board_id = sync.state().board_id();
    let done = sync.state().lists()[1].id;

    let drop = DragResult {
        kind: MoveKind::List,
        entity_id: done,
        source: DropLocation::new(board_id, 1),
        destination: Some(DropLocation::new(board_id, 0)),
    };
    let outcome = sync.reorder(&api, drop, false).await.unwrap();
    assert_matches!(outcome, Some(SyncOutcome::Confirmed));

    let stored = server.store.find_lists_by_board(board_id).await.unwrap();
    assert_eq!(stored[0].id, done);
    assert_eq!(stored, sync.state().lists());
}

#[tokio::test]
async fn test_failed_reorder_rolls_back_to_server() {
    let server = spawn_server().await;
    let api = client(&server);
    let mut sync = seeded_sync(&api).await;
    let todo = sync.state().lists()[0].id;
    let cards: Vec<_> = sync.state().cards_in(todo).iter().map(|card| card.id).collect();

    // Someone else deletes C; the local state still has it
    server.store.delete_card(cards[2]).await.unwrap();

    let outcome = sync
        .reorder(
            &api,
            card_drop(cards[0], DropLocation::new(todo, 0), DropLocation::new(todo, 2)),
            true,
        )
        .await
        .unwrap();
    assert_matches!(outcome, Some(SyncOutcome::RolledBack(SyncError::NotFound(_))));

    assert_eq!(titles(sync.state().cards_in(todo)), vec!["A", "B"]);
    let server_view = BoardState::from_aggregate(api.load_board(sync.state().board_id()).await.unwrap());
    assert_eq!(sync.state(), &server_view);
    assert!(!sync.needs_refresh());
}

#[tokio::test]
async fn test_crud_through_sync() {
    let server = spawn_server().await;
    let api = client(&server);
    let mut sync = seeded_sync(&api).await;
    let (todo, done) = (sync.state().lists()[0].id, sync.state().lists()[1].id);
    let card_a = sync.state().cards_in(todo)[0].id;

    let renamed = assert_ok!(sync.rename_list(&api, done, "Shipped").await);
    assert_eq!(renamed.title, "Shipped");
    assert_eq!(sync.state().list(done).unwrap().title, "Shipped");

    let edited = assert_ok!(sync.edit_card(&api, card_a, None, Some("details")).await);
    assert_eq!(edited.description.as_deref(), Some("details"));
    assert_eq!(sync.state().card(card_a), Some(&edited));

    assert_ok!(sync.delete_card(&api, card_a).await);
    assert!(sync.state().card(card_a).is_none());
    assert!(server.store.find_card(card_a).await.unwrap().is_none());

    assert_ok!(sync.delete_list(&api, todo).await);
    assert!(sync.state().list(todo).is_none());
    assert_eq!(sync.state().card_count(), 0);

    let server_view = BoardState::from_aggregate(api.load_board(sync.state().board_id()).await.unwrap());
    assert_eq!(sync.state(), &server_view);
}

#[tokio::test]
async fn test_missing_token_is_persistence_error() {
    let server = spawn_server().await;
    let config = AppConfig::builder()
        .server_url(server.url.clone())
        .build()
        .unwrap();
    let api = HttpBoardApi::new(config).unwrap();

    let err = api.create_board("Anonymous").await.unwrap_err();
    assert_matches!(err, SyncError::Persistence { status: 401, .. });
}

#[tokio::test]
async fn test_unknown_board_is_not_found() {
    let server = spawn_server().await;
    let api = client(&server);

    let err = BoardSync::load(&api, uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let app = axum::Router::new().route(
        "/api/boards",
        axum::routing::get(|| async { "<html>maintenance</html>" }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let config = AppConfig::builder()
        .server_url(format!("http://{}", addr))
        .build()
        .unwrap();
    let api = HttpBoardApi::new(config).unwrap().with_token(OWNER);

    let err = api.list_boards().await.unwrap_err();
    assert!(!err.is_not_found());
    assert_matches!(err, SyncError::Decode(SharedError::SerializationError { .. }));
}
