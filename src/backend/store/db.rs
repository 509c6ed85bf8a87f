//! SQLite entity store
//!
//! Uses a sqlx `SqlitePool`. Ids are stored as 16-byte blobs, timestamps as
//! RFC 3339 text and positions as `INTEGER`. Cascading deletes, position
//! batches and patch updates each run inside one transaction. Siblings
//! sharing a position come back in `rowid` (insertion) order.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{check_unique_ids, EntityStore, StoreError, StoreResult};
use crate::shared::board::{Board, BoardPatch, Card, CardPatch, List, ListPatch};
use crate::shared::reorder::PositionUpdate;

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `database_url`, creating the file if needed, and run
    /// migrations
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::from_pool(pool).await
    }

    /// Private in-memory database
    ///
    /// Limited to one connection: every SQLite `:memory:` connection is a
    /// separate database.
    pub async fn in_memory() -> StoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> StoreResult<Self> {
        sqlx::migrate!().run(&pool).await?;
        tracing::debug!("SQLite migrations applied");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn board_exists(&self, id: Uuid) -> StoreResult<bool> {
        let row = sqlx::query("SELECT 1 FROM boards WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn list_exists(&self, id: Uuid) -> StoreResult<bool> {
        let row = sqlx::query("SELECT 1 FROM lists WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

fn decode_position(row: &SqliteRow) -> StoreResult<u32> {
    let raw: i64 = row.try_get("position")?;
    u32::try_from(raw).map_err(|_| StoreError::Corrupt(format!("position {} out of range", raw)))
}

fn board_from_row(row: &SqliteRow) -> StoreResult<Board> {
    Ok(Board {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        owner_id: row.try_get("owner_id")?,
        created_at: row.try_get("created_at")?,
    })
}

fn list_from_row(row: &SqliteRow) -> StoreResult<List> {
    Ok(List {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        board_id: row.try_get("board_id")?,
        position: decode_position(row)?,
    })
}

fn card_from_row(row: &SqliteRow) -> StoreResult<Card> {
    Ok(Card {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        list_id: row.try_get("list_id")?,
        position: decode_position(row)?,
    })
}

#[async_trait]
impl EntityStore for SqliteStore {
    async fn create_board(&self, board: Board) -> StoreResult<Board> {
        sqlx::query("INSERT INTO boards (id, title, owner_id, created_at) VALUES (?, ?, ?, ?)")
            .bind(board.id)
            .bind(&board.title)
            .bind(&board.owner_id)
            .bind(board.created_at)
            .execute(&self.pool)
            .await?;
        Ok(board)
    }

    async fn find_board(&self, id: Uuid) -> StoreResult<Option<Board>> {
        let row = sqlx::query("SELECT id, title, owner_id, created_at FROM boards WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(board_from_row).transpose()
    }

    async fn find_boards_by_owner(&self, owner_id: &str) -> StoreResult<Vec<Board>> {
        let rows =
            sqlx::query("SELECT id, title, owner_id, created_at FROM boards WHERE owner_id = ?")
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await?;
        let mut boards = rows
            .iter()
            .map(board_from_row)
            .collect::<StoreResult<Vec<_>>>()?;
        // Sorted here: the stored text form is not guaranteed to sort lexically
        boards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(boards)
    }

    async fn update_board(&self, id: Uuid, patch: BoardPatch) -> StoreResult<Board> {
        let mut board = self
            .find_board(id)
            .await?
            .ok_or(StoreError::not_found("board", id))?;
        patch.apply(&mut board)?;
        sqlx::query("UPDATE boards SET title = ? WHERE id = ?")
            .bind(&board.title)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(board)
    }

    async fn delete_board(&self, id: Uuid) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "DELETE FROM cards WHERE list_id IN (SELECT id FROM lists WHERE board_id = ?)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM lists WHERE board_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM boards WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::not_found("board", id));
        }
        tx.commit().await?;
        Ok(())
    }

    async fn create_list(&self, list: List) -> StoreResult<List> {
        if !self.board_exists(list.board_id).await? {
            return Err(StoreError::not_found("board", list.board_id));
        }
        sqlx::query("INSERT INTO lists (id, title, board_id, position) VALUES (?, ?, ?, ?)")
            .bind(list.id)
            .bind(&list.title)
            .bind(list.board_id)
            .bind(i64::from(list.position))
            .execute(&self.pool)
            .await?;
        Ok(list)
    }

    async fn find_list(&self, id: Uuid) -> StoreResult<Option<List>> {
        let row = sqlx::query("SELECT id, title, board_id, position FROM lists WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(list_from_row).transpose()
    }

    async fn find_lists_by_board(&self, board_id: Uuid) -> StoreResult<Vec<List>> {
        let rows = sqlx::query(
            "SELECT id, title, board_id, position FROM lists WHERE board_id = ? ORDER BY position, rowid",
        )
        .bind(board_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(list_from_row).collect()
    }

    async fn update_list(&self, id: Uuid, patch: ListPatch) -> StoreResult<List> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query("SELECT id, title, board_id, position FROM lists WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let mut list = row
            .as_ref()
            .map(list_from_row)
            .transpose()?
            .ok_or(StoreError::not_found("list", id))?;
        patch.apply(&mut list)?;
        sqlx::query("UPDATE lists SET title = ?, position = ? WHERE id = ?")
            .bind(&list.title)
            .bind(i64::from(list.position))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(list)
    }

    async fn delete_list(&self, id: Uuid) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM cards WHERE list_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM lists WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::not_found("list", id));
        }
        tx.commit().await?;
        Ok(())
    }

    async fn create_card(&self, card: Card) -> StoreResult<Card> {
        if !self.list_exists(card.list_id).await? {
            return Err(StoreError::not_found("list", card.list_id));
        }
        sqlx::query(
            "INSERT INTO cards (id, title, description, list_id, position) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(card.id)
        .bind(&card.title)
        .bind(&card.description)
        .bind(card.list_id)
        .bind(i64::from(card.position))
        .execute(&self.pool)
        .await?;
        Ok(card)
    }

    async fn find_card(&self, id: Uuid) -> StoreResult<Option<Card>> {
        let row = sqlx::query(
            "SELECT id, title, description, list_id, position FROM cards WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(card_from_row).transpose()
    }

    async fn find_cards_by_list(&self, list_id: Uuid) -> StoreResult<Vec<Card>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, list_id, position
            FROM cards
            WHERE list_id = ?
            ORDER BY position, rowid
            "#,
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(card_from_row).collect()
    }

    async fn find_cards_by_board(&self, board_id: Uuid) -> StoreResult<Vec<Card>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.title, c.description, c.list_id, c.position
            FROM cards c
            JOIN lists l ON l.id = c.list_id
            WHERE l.board_id = ?
            ORDER BY c.position, c.rowid
            "#,
        )
        .bind(board_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(card_from_row).collect()
    }

    async fn update_card(&self, id: Uuid, patch: CardPatch) -> StoreResult<Card> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(
            "SELECT id, title, description, list_id, position FROM cards WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let mut card = row
            .as_ref()
            .map(card_from_row)
            .transpose()?
            .ok_or(StoreError::not_found("card", id))?;
        if let Some(list_id) = patch.list_id {
            let target = sqlx::query("SELECT 1 FROM lists WHERE id = ?")
                .bind(list_id)
                .fetch_optional(&mut *tx)
                .await?;
            if target.is_none() {
                return Err(StoreError::not_found("list", list_id));
            }
        }
        patch.apply(&mut card)?;
        sqlx::query(
            "UPDATE cards SET title = ?, description = ?, list_id = ?, position = ? WHERE id = ?",
        )
        .bind(&card.title)
        .bind(&card.description)
        .bind(card.list_id)
        .bind(i64::from(card.position))
        .bind(id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(card)
    }

    async fn delete_card(&self, id: Uuid) -> StoreResult<()> {
        let deleted = sqlx::query("DELETE FROM cards WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(StoreError::not_found("card", id));
        }
        Ok(())
    }

    async fn batch_update_lists(&self, items: &[PositionUpdate]) -> StoreResult<()> {
        check_unique_ids(items)?;
        let mut tx = self.pool.begin().await?;
        for item in items {
            let updated = sqlx::query("UPDATE lists SET position = ? WHERE id = ?")
                .bind(i64::from(item.position))
                .bind(item.id)
                .execute(&mut *tx)
                .await?;
            if updated.rows_affected() == 0 {
                tx.rollback().await?;
                return Err(StoreError::not_found("list", item.id));
            }
        }
        tx.commit().await?;
        Ok(())
    }

    async fn batch_update_cards(&self, items: &[PositionUpdate]) -> StoreResult<()> {
        check_unique_ids(items)?;
        let mut tx = self.pool.begin().await?;
        for item in items {
            if let Some(list_id) = item.list_id {
                let exists = sqlx::query("SELECT 1 FROM lists WHERE id = ?")
                    .bind(list_id)
                    .fetch_optional(&mut *tx)
                    .await?;
                if exists.is_none() {
                    tx.rollback().await?;
                    return Err(StoreError::not_found("list", list_id));
                }
            }
            let updated = sqlx::query(
                "UPDATE cards SET position = ?, list_id = COALESCE(?, list_id) WHERE id = ?",
            )
            .bind(i64::from(item.position))
            .bind(item.list_id)
            .bind(item.id)
            .execute(&mut *tx)
            .await?;
            if updated.rows_affected() == 0 {
                tx.rollback().await?;
                return Err(StoreError::not_found("card", item.id));
            }
        }
        tx.commit().await?;
        Ok(())
    }
}
