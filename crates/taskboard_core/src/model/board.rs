//! Board snapshot model.
//!
//! # Responsibility
//! - Describe one point-in-time view of a board: lists in order, cards in order.
//! - Provide the flattened card view used by recommendation rules.
//!
//! # Invariants
//! - `Board::lists` is ordered ascending by `BoardList::position`.
//! - Each list's `cards` are ordered ascending by `Card::position`.
//! - A card belongs to exactly one list (`Card::list_id`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type BoardId = Uuid;
pub type ListId = Uuid;
pub type CardId = Uuid;
pub type UserId = Uuid;

/// Point-in-time snapshot of one board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    pub lists: Vec<BoardList>,
}

/// Ordered column of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardList {
    pub id: ListId,
    pub title: String,
    pub position: i64,
    pub cards: Vec<Card>,
}

/// Task unit owned by exactly one list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub list_id: ListId,
    pub title: String,
    /// `None` and `Some("")` are equivalent for every consumer.
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub position: i64,
}

/// Card view annotated with its owning list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatCard<'a> {
    pub card: &'a Card,
    pub list_id: ListId,
    pub list_title: &'a str,
}

impl<'a> FlatCard<'a> {
    /// Description text with a missing description read as empty.
    pub fn description(&self) -> &'a str {
        self.card.description.as_deref().unwrap_or("")
    }
}

impl Board {
    /// Creates an empty board snapshot.
    pub fn new(id: BoardId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            lists: Vec::new(),
        }
    }

    /// Flattens lists into one card sequence, list order first, then card order.
    ///
    /// Every card appears exactly once. An empty board yields an empty vector.
    pub fn flatten(&self) -> Vec<FlatCard<'_>> {
        self.lists
            .iter()
            .flat_map(|list| {
                list.cards.iter().map(move |card| FlatCard {
                    card,
                    list_id: list.id,
                    list_title: list.title.as_str(),
                })
            })
            .collect()
    }

    /// Total number of cards across all lists.
    pub fn card_count(&self) -> usize {
        self.lists.iter().map(|list| list.cards.len()).sum()
    }
}

impl BoardList {
    pub fn new(id: ListId, title: impl Into<String>, position: i64) -> Self {
        Self {
            id,
            title: title.into(),
            position,
            cards: Vec::new(),
        }
    }
}

impl Card {
    /// Creates a card without description or due date.
    pub fn new(id: CardId, list_id: ListId, title: impl Into<String>, position: i64) -> Self {
        Self {
            id,
            list_id,
            title: title.into(),
            description: None,
            due_date: None,
            position,
        }
    }
}
