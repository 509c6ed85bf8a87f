//! Query parameters of the collection endpoints

use serde::Deserialize;
use uuid::Uuid;

/// `GET /api/lists?boardId=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub board_id: Option<Uuid>,
}

/// `GET /api/cards?boardId=` or `?listId=`
///
/// `listId` wins when both are given.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardQuery {
    pub board_id: Option<Uuid>,
    pub list_id: Option<Uuid>,
}
