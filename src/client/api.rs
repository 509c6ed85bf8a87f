//! Board API client
//!
//! [`BoardApi`] is the remote side of the sync layer. [`HttpBoardApi`]
//! talks to the kanboard server over reqwest; tests substitute their own
//! implementation.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::client::error::SyncError;
use crate::shared::aggregate::BoardAggregate;
use crate::shared::board::{
    Board, Card, CardPatch, List, ListPatch, MessageResponse, NewBoard, NewCard, NewList,
};
use crate::shared::config::AppConfig;
use crate::shared::error::SharedError;
use crate::shared::reorder::ReorderBatch;

#[async_trait]
pub trait BoardApi: Send + Sync {
    async fn fetch_board(&self, board_id: Uuid) -> Result<Board, SyncError>;
    async fn fetch_lists(&self, board_id: Uuid) -> Result<Vec<List>, SyncError>;
    async fn fetch_cards(&self, board_id: Uuid) -> Result<Vec<Card>, SyncError>;

    /// The three reads run concurrently and are assembled only once all
    /// succeed
    async fn load_board(&self, board_id: Uuid) -> Result<BoardAggregate, SyncError> {
        let (board, lists, cards) = tokio::try_join!(
            self.fetch_board(board_id),
            self.fetch_lists(board_id),
            self.fetch_cards(board_id),
        )?;
        Ok(BoardAggregate::assemble(board, lists, cards))
    }

    async fn reorder_lists(&self, batch: &ReorderBatch) -> Result<(), SyncError>;
    async fn reorder_cards(&self, batch: &ReorderBatch) -> Result<(), SyncError>;

    async fn create_list(&self, request: &NewList) -> Result<List, SyncError>;
    async fn update_list(&self, list_id: Uuid, patch: &ListPatch) -> Result<List, SyncError>;
    async fn delete_list(&self, list_id: Uuid) -> Result<(), SyncError>;

    async fn create_card(&self, request: &NewCard) -> Result<Card, SyncError>;
    async fn update_card(&self, card_id: Uuid, patch: &CardPatch) -> Result<Card, SyncError>;
    async fn delete_card(&self, card_id: Uuid) -> Result<(), SyncError>;
}

/// reqwest implementation of [`BoardApi`]
#[derive(Debug, Clone)]
pub struct HttpBoardApi {
    config: AppConfig,
    client: Client,
    token: Option<String>,
}

impl HttpBoardApi {
    pub fn new(config: AppConfig) -> Result<Self, SyncError> {
        config.validate()?;
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            config,
            client,
            token: None,
        })
    }

    /// Bearer token sent with every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, SyncError> {
        let response = self.authorized(request).send().await?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| value["error"].as_str().map(str::to_string))
            .unwrap_or(body);

        tracing::debug!("Request failed: {} - {}", status, message);
        if status == StatusCode::NOT_FOUND {
            return Err(SyncError::NotFound(message));
        }
        Err(SyncError::Persistence {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, SyncError> {
        let body = self.send(request).await?.text().await?;
        Ok(serde_json::from_str(&body).map_err(SharedError::from)?)
    }

    /// `GET /api/boards`
    pub async fn list_boards(&self) -> Result<Vec<Board>, SyncError> {
        let url = self.config.api_url("/api/boards");
        self.send_json(self.client.get(url)).await
    }

    /// `POST /api/boards`
    pub async fn create_board(&self, title: &str) -> Result<Board, SyncError> {
        let url = self.config.api_url("/api/boards");
        let request = NewBoard {
            title: title.to_string(),
        };
        self.send_json(self.client.post(url).json(&request)).await
    }

    /// `GET /api/boards/{id}/aggregate`
    pub async fn fetch_aggregate(&self, board_id: Uuid) -> Result<BoardAggregate, SyncError> {
        let url = self.config.api_url(&format!("/api/boards/{}/aggregate", board_id));
        self.send_json(self.client.get(url)).await
    }
}

#[async_trait]
impl BoardApi for HttpBoardApi {
    async fn fetch_board(&self, board_id: Uuid) -> Result<Board, SyncError> {
        let url = self.config.api_url(&format!("/api/boards/{}", board_id));
        self.send_json(self.client.get(url)).await
    }

    async fn fetch_lists(&self, board_id: Uuid) -> Result<Vec<List>, SyncError> {
        let url = self.config.api_url("/api/lists");
        let request = self
            .client
            .get(url)
            .query(&[("boardId", board_id.to_string())]);
        self.send_json(request).await
    }

    async fn fetch_cards(&self, board_id: Uuid) -> Result<Vec<Card>, SyncError> {
        let url = self.config.api_url("/api/cards");
        let request = self
            .client
            .get(url)
            .query(&[("boardId", board_id.to_string())]);
        self.send_json(request).await
    }

    async fn reorder_lists(&self, batch: &ReorderBatch) -> Result<(), SyncError> {
        let url = self.config.api_url("/api/lists/reorder");
        self.send_json::<MessageResponse>(self.client.patch(url).json(batch))
            .await
            .map(|_| ())
    }

    async fn reorder_cards(&self, batch: &ReorderBatch) -> Result<(), SyncError> {
        let url = self.config.api_url("/api/cards/reorder");
        self.send_json::<MessageResponse>(self.client.patch(url).json(batch))
            .await
            .map(|_| ())
    }

    async fn create_list(&self, request: &NewList) -> Result<List, SyncError> {
        let url = self.config.api_url("/api/lists");
        self.send_json(self.client.post(url).json(request)).await
    }

    async fn update_list(&self, list_id: Uuid, patch: &ListPatch) -> Result<List, SyncError> {
        let url = self.config.api_url(&format!("/api/lists/{}", list_id));
        self.send_json(self.client.put(url).json(patch)).await
    }

    async fn delete_list(&self, list_id: Uuid) -> Result<(), SyncError> {
        let url = self.config.api_url(&format!("/api/lists/{}", list_id));
        self.send(self.client.delete(url)).await.map(|_| ())
    }

    async fn create_card(&self, request: &NewCard) -> Result<Card, SyncError> {
        let url = self.config.api_url("/api/cards");
        self.send_json(self.client.post(url).json(request)).await
    }

    async fn update_card(&self, card_id: Uuid, patch: &CardPatch) -> Result<Card, SyncError> {
        let url = self.config.api_url(&format!("/api/cards/{}", card_id));
        self.send_json(self.client.put(url).json(patch)).await
    }

    async fn delete_card(&self, card_id: Uuid) -> Result<(), SyncError> {
        let url = self.config.api_url(&format!("/api/cards/{}", card_id));
        self.send(self.client.delete(url)).await.map(|_| ())
    }
}
