/**
 * API Routes
 *
 * ## Boards
 * - `GET /api/boards` - Caller's boards, newest first (requires authentication)
 * - `POST /api/boards` - Create a board (requires authentication)
 * - `GET /api/boards/{id}` - Single board
 * - `PUT /api/boards/{id}` - Edit title (requires authentication)
 * - `DELETE /api/boards/{id}` - Delete with lists and cards (requires authentication)
 * - `GET /api/boards/{id}/aggregate` - Board with sorted lists and cards
 *
 * ## Lists
 * - `GET /api/lists?boardId=` - Lists of a board
 * - `POST /api/lists`, `PUT /api/lists/{id}`, `DELETE /api/lists/{id}`
 * - `PATCH /api/lists/reorder` - Position batch
 *
 * ## Cards
 * - `GET /api/cards?boardId=` or `?listId=`
 * - `POST /api/cards`, `PUT /api/cards/{id}`, `DELETE /api/cards/{id}`
 * - `PATCH /api/cards/reorder` - Position and list batch
 */

use axum::{
    routing::{get, patch},
    Router,
};

use crate::backend::handlers::{boards, cards, lists};
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// `/api/lists/reorder` and `/api/cards/reorder` are static segments and
/// take priority over the `{id}` captures.
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Board endpoints
        .route(
            "/api/boards",
            get(boards::list_boards).post(boards::create_board),
        )
        .route(
            "/api/boards/{id}",
            get(boards::get_board)
                .put(boards::update_board)
                .delete(boards::delete_board),
        )
        .route(
            "/api/boards/{id}/aggregate",
            get(boards::get_board_aggregate),
        )
        // List endpoints
        .route("/api/lists", get(lists::list_lists).post(lists::create_list))
        .route("/api/lists/reorder", patch(lists::reorder_lists))
        .route(
            "/api/lists/{id}",
            get(lists::get_list)
                .put(lists::update_list)
                .delete(lists::delete_list),
        )
        // Card endpoints
        .route("/api/cards", get(cards::list_cards).post(cards::create_card))
        .route("/api/cards/reorder", patch(cards::reorder_cards))
        .route(
            "/api/cards/{id}",
            get(cards::get_card)
                .put(cards::update_card)
                .delete(cards::delete_card),
        )
}
