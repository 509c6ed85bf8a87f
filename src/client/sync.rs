//! Client Sync Layer
//!
//! A reorder happens in two phases:
//!
//! 1. [`BoardSync::begin_reorder`] runs the reorder engine against local
//!    state, applies the result immediately and returns a [`PendingCommit`]
//!    tagged with the next sequence number.
//! 2. [`PendingCommit::send`] persists the batch. It borrows nothing from
//!    the sync layer, so further drags can be started while it is in flight.
//!    Its [`CommitResponse`] goes back through [`BoardSync::finish`].
//!
//! On failure the aggregate is re-fetched and replaces local state; the
//! failed batch is not retried. A response older than the newest issued
//! sequence is discarded so an early re-fetch cannot overwrite a later
//! optimistic move. When such a response reports a failure and no newer
//! commit is still in flight, nothing else will repair local state, so it
//! surfaces as [`SyncOutcome::RefreshNeeded`] instead.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::client::api::BoardApi;
use crate::client::error::SyncError;
use crate::client::state::BoardState;
use crate::shared::aggregate::BoardAggregate;
use crate::shared::board::{Card, CardPatch, List, ListPatch, NewCard, NewList};
use crate::shared::reorder::{DragResult, MoveKind, ReorderBatch};

/// A reorder applied locally and waiting to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommit {
    pub seq: u64,
    pub board_id: Uuid,
    pub kind: MoveKind,
    pub batch: ReorderBatch,
}

/// Result of sending one [`PendingCommit`]
#[derive(Debug)]
pub struct CommitResponse {
    pub seq: u64,
    pub result: Result<(), SyncError>,
    /// Present when a re-fetch was taken: always after a failure, and after
    /// a success when reconciliation is enabled
    pub aggregate: Option<Result<BoardAggregate, SyncError>>,
}

impl PendingCommit {
    pub async fn send<A>(self, remote: &A, refetch_on_success: bool) -> CommitResponse
    where
        A: BoardApi + ?Sized,
    {
        let result = match self.kind {
            MoveKind::List => remote.reorder_lists(&self.batch).await,
            MoveKind::Card => remote.reorder_cards(&self.batch).await,
        };
        if let Err(err) = &result {
            tracing::warn!(seq = self.seq, "Reorder batch failed: {}", err);
        }

        let aggregate = if result.is_err() || refetch_on_success {
            Some(remote.load_board(self.board_id).await)
        } else {
            None
        };

        CommitResponse {
            seq: self.seq,
            result,
            aggregate,
        }
    }
}

/// How a [`CommitResponse`] was handled
#[derive(Debug)]
pub enum SyncOutcome {
    /// Batch persisted; local state kept as is
    Confirmed,
    /// Batch persisted; local state replaced by the server's
    Reconciled,
    /// Batch failed; local state replaced by the server's
    RolledBack(SyncError),
    /// Superseded by a newer commit and discarded
    Stale { seq: u64 },
    /// Local state may diverge from the server and no aggregate was
    /// available to repair it; call [`BoardSync::refresh`]
    RefreshNeeded(Option<SyncError>),
}

#[derive(Debug)]
pub struct BoardSync {
    state: BoardState,
    /// Sequence number of the newest issued commit
    issued: u64,
    /// Issued commits whose response has not been finished
    outstanding: BTreeSet<u64>,
    /// A discarded or unrepaired failure is waiting for a re-fetch
    refresh_owed: bool,
}

impl BoardSync {
    pub fn new(state: BoardState) -> Self {
        Self {
            state,
            issued: 0,
            outstanding: BTreeSet::new(),
            refresh_owed: false,
        }
    }

    /// Load a board from the server
    pub async fn load<A>(remote: &A, board_id: Uuid) -> Result<Self, SyncError>
    where
        A: BoardApi + ?Sized,
    {
        let aggregate = remote.load_board(board_id).await?;
        Ok(Self::new(BoardState::from_aggregate(aggregate)))
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn needs_refresh(&self) -> bool {
        self.refresh_owed
    }

    /// Apply a drop locally and prepare its commit
    ///
    /// Returns `Ok(None)` for a drop outside any target or back onto its own
    /// slot. When the engine rejects the move, local state is untouched.
    pub fn begin_reorder(&mut self, drop: DragResult) -> Result<Option<PendingCommit>, SyncError> {
        let Some(mv) = drop.into_move() else {
            return Ok(None);
        };
        if mv.is_noop() {
            return Ok(None);
        }

        let plan = self.state.plan(&mv).map_err(|err| {
            tracing::warn!(entity_id = %mv.entity_id, "Reorder rejected: {}", err);
            err
        })?;
        let kind = plan.kind();
        let batch = plan.batch().clone();
        self.state.apply(plan);

        self.issued += 1;
        self.outstanding.insert(self.issued);
        tracing::debug!(seq = self.issued, %kind, updates = batch.len(), "Reorder applied locally");
        Ok(Some(PendingCommit {
            seq: self.issued,
            board_id: self.state.board_id(),
            kind,
            batch,
        }))
    }

    /// Reconcile local state with a commit's response
    pub fn finish(&mut self, response: CommitResponse) -> SyncOutcome {
        let CommitResponse {
            seq,
            result,
            aggregate,
        } = response;
        self.outstanding.remove(&seq);

        if seq < self.issued {
            if let Err(err) = result {
                self.refresh_owed = true;
                if self.outstanding.range(seq + 1..).next().is_none() {
                    tracing::warn!(
                        seq,
                        newest = self.issued,
                        "Late reorder failure after newer commits settled: {}",
                        err
                    );
                    return SyncOutcome::RefreshNeeded(Some(err));
                }
            }
            tracing::warn!(seq, newest = self.issued, "Discarding stale reorder response");
            return SyncOutcome::Stale { seq };
        }

        match (result, aggregate) {
            (result, Some(Ok(aggregate))) => {
                self.state = BoardState::from_aggregate(aggregate);
                self.refresh_owed = false;
                match result {
                    Ok(()) => SyncOutcome::Reconciled,
                    Err(err) => SyncOutcome::RolledBack(err),
                }
            }
            (result, Some(Err(fetch_err))) => {
                tracing::warn!(seq, "Re-fetch after reorder failed: {}", fetch_err);
                if result.is_err() || self.refresh_owed {
                    self.refresh_owed = true;
                    SyncOutcome::RefreshNeeded(Some(fetch_err))
                } else {
                    SyncOutcome::Confirmed
                }
            }
            (Ok(()), None) if self.refresh_owed => SyncOutcome::RefreshNeeded(None),
            (Ok(()), None) => SyncOutcome::Confirmed,
            (Err(err), None) => {
                self.refresh_owed = true;
                SyncOutcome::RefreshNeeded(Some(err))
            }
        }
    }

    /// Drop, send and finish in one go
    pub async fn reorder<A>(
        &mut self,
        remote: &A,
        drop: DragResult,
        refetch_on_success: bool,
    ) -> Result<Option<SyncOutcome>, SyncError>
    where
        A: BoardApi + ?Sized,
    {
        let Some(commit) = self.begin_reorder(drop)? else {
            return Ok(None);
        };
        let response = commit.send(remote, refetch_on_success).await;
        Ok(Some(self.finish(response)))
    }

    /// Replace local state with the server's
    pub async fn refresh<A>(&mut self, remote: &A) -> Result<(), SyncError>
    where
        A: BoardApi + ?Sized,
    {
        let aggregate = remote.load_board(self.state.board_id()).await?;
        self.state = BoardState::from_aggregate(aggregate);
        self.refresh_owed = false;
        Ok(())
    }

    /// Append a list to the board
    pub async fn add_list<A>(&mut self, remote: &A, title: &str) -> Result<List, SyncError>
    where
        A: BoardApi + ?Sized,
    {
        let request = NewList {
            title: title.to_string(),
            board_id: self.state.board_id(),
            position: Some(self.state.next_list_position()),
        };
        let list = remote.create_list(&request).await?;
        self.state.insert_list(list.clone());
        Ok(list)
    }

    /// Append a card to a list
    pub async fn add_card<A>(
        &mut self,
        remote: &A,
        list_id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> Result<Card, SyncError>
    where
        A: BoardApi + ?Sized,
    {
        let request = NewCard {
            title: title.to_string(),
            description: description.map(str::to_string),
            list_id,
            position: Some(self.state.next_card_position(list_id)),
        };
        let card = remote.create_card(&request).await;
        let card = self.forget_if_missing(card, |state| {
            state.remove_list(list_id);
        })?;
        self.state.insert_card(card.clone());
        Ok(card)
    }

    pub async fn rename_list<A>(
        &mut self,
        remote: &A,
        list_id: Uuid,
        title: &str,
    ) -> Result<List, SyncError>
    where
        A: BoardApi + ?Sized,
    {
        let patch = ListPatch {
            title: Some(title.to_string()),
            ..Default::default()
        };
        let list = remote.update_list(list_id, &patch).await;
        let list = self.forget_if_missing(list, |state| {
            state.remove_list(list_id);
        })?;
        self.state.replace_list(list.clone());
        Ok(list)
    }

    /// Edit a card's title and/or description
    pub async fn edit_card<A>(
        &mut self,
        remote: &A,
        card_id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Card, SyncError>
    where
        A: BoardApi + ?Sized,
    {
        let patch = CardPatch {
            title: title.map(str::to_string),
            description: description.map(str::to_string),
            ..Default::default()
        };
        let card = remote.update_card(card_id, &patch).await;
        let card = self.forget_if_missing(card, |state| {
            state.remove_card(card_id);
        })?;
        self.state.insert_card(card.clone());
        Ok(card)
    }

    /// Delete a list; its cards go with it
    pub async fn delete_list<A>(&mut self, remote: &A, list_id: Uuid) -> Result<(), SyncError>
    where
        A: BoardApi + ?Sized,
    {
        let deleted = remote.delete_list(list_id).await;
        self.forget_if_missing(deleted, |state| {
            state.remove_list(list_id);
        })?;
        self.state.remove_list(list_id);
        Ok(())
    }

    pub async fn delete_card<A>(&mut self, remote: &A, card_id: Uuid) -> Result<(), SyncError>
    where
        A: BoardApi + ?Sized,
    {
        let deleted = remote.delete_card(card_id).await;
        self.forget_if_missing(deleted, |state| {
            state.remove_card(card_id);
        })?;
        self.state.remove_card(card_id);
        Ok(())
    }

    /// A NotFound from the server means the local reference is stale
    fn forget_if_missing<T>(
        &mut self,
        result: Result<T, SyncError>,
        forget: impl FnOnce(&mut BoardState),
    ) -> Result<T, SyncError> {
        if let Err(err) = &result {
            if err.is_not_found() {
                tracing::debug!("Dropping stale local reference: {}", err);
                forget(&mut self.state);
            }
        }
        result
    }
}
