//! In-memory collaborators for service tests.
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::cell::RefCell;
use std::collections::HashMap;
use taskboard_core::db::DbError;
use taskboard_core::{
    Board, BoardAccess, BoardId, BoardList, BoardSnapshotLoader, Card, Recommendation,
    RecommendationSink, RecommendationStore, RepoError, RepoResult, StoredRecommendation, UserId,
};
use uuid::Uuid;

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

/// Builds boards with sequential ids: lists from 1000, cards from 2000.
pub struct BoardBuilder {
    board: Board,
    next_id: u128,
}

impl BoardBuilder {
    pub fn new(id: u128) -> Self {
        Self {
            board: Board::new(Uuid::from_u128(id), "board"),
            next_id: 0,
        }
    }

    pub fn list(mut self, title: &str) -> Self {
        let position = self.board.lists.len() as i64;
        self.board.lists.push(BoardList::new(
            Uuid::from_u128(1000 + position as u128),
            title,
            position,
        ));
        self
    }

    /// Adds a card to the most recently added list.
    pub fn card(
        mut self,
        title: &str,
        description: Option<&str>,
        due_date: Option<DateTime<Utc>>,
    ) -> Self {
        let id = Uuid::from_u128(2000 + self.next_id);
        self.next_id += 1;
        let list = self.board.lists.last_mut().expect("add a list first");
        let mut card = Card::new(id, list.id, title, list.cards.len() as i64);
        card.description = description.map(str::to_string);
        card.due_date = due_date;
        list.cards.push(card);
        self
    }

    pub fn build(self) -> Board {
        self.board
    }
}

pub fn card_id(index: u128) -> Uuid {
    Uuid::from_u128(2000 + index)
}

pub fn list_id(index: u128) -> Uuid {
    Uuid::from_u128(1000 + index)
}

/// Loader over fixed snapshots; owners are the only users with access.
#[derive(Default)]
pub struct StaticBoards {
    boards: HashMap<BoardId, Board>,
    owners: HashMap<BoardId, UserId>,
}

impl StaticBoards {
    pub fn with_board(mut self, board: Board, owner: UserId) -> Self {
        self.owners.insert(board.id, owner);
        self.boards.insert(board.id, board);
        self
    }
}

impl BoardSnapshotLoader for StaticBoards {
    fn load_board_snapshot(&self, board_id: BoardId) -> RepoResult<Option<Board>> {
        Ok(self.boards.get(&board_id).cloned())
    }
}

impl BoardAccess for StaticBoards {
    fn has_access(&self, user_id: UserId, board_id: BoardId) -> RepoResult<bool> {
        Ok(self.owners.get(&board_id) == Some(&user_id))
    }
}

/// Sink that records every replace call and can be told to fail.
#[derive(Default)]
pub struct RecordingSink {
    pub calls: RefCell<Vec<(BoardId, Vec<Recommendation>)>>,
    stored: RefCell<HashMap<BoardId, Vec<StoredRecommendation>>>,
    fail_writes: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn last_call(&self) -> Option<(BoardId, Vec<Recommendation>)> {
        self.calls.borrow().last().cloned()
    }
}

impl RecommendationSink for RecordingSink {
    fn replace_recommendations(
        &self,
        board_id: BoardId,
        recommendations: &[Recommendation],
    ) -> RepoResult<usize> {
        self.calls
            .borrow_mut()
            .push((board_id, recommendations.to_vec()));
        if self.fail_writes {
            return Err(RepoError::Db(DbError::Sqlite(
                rusqlite::Error::InvalidQuery,
            )));
        }
        let stored = recommendations
            .iter()
            .map(|recommendation| StoredRecommendation {
                id: Uuid::new_v4(),
                board_id,
                created_at: now(),
                recommendation: recommendation.clone(),
            })
            .collect();
        self.stored.borrow_mut().insert(board_id, stored);
        Ok(recommendations.len())
    }
}

impl RecommendationStore for RecordingSink {
    fn list_recommendations(&self, board_id: BoardId) -> RepoResult<Vec<StoredRecommendation>> {
        Ok(self
            .stored
            .borrow()
            .get(&board_id)
            .cloned()
            .unwrap_or_default())
    }
}
