//! Recommendation records.
//!
//! # Responsibility
//! - Define the typed payload of each recommendation kind.
//! - Keep kind, payload and card linkage consistent by construction.
//!
//! # Invariants
//! - `due_date` and `list_movement` recommendations reference one card.
//! - `group_cards` recommendations carry no `card_id`; members live in the payload.
//! - Payload JSON keys are camelCase for compatibility with stored rows.

use crate::model::board::{BoardId, CardId, ListId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type RecommendationId = Uuid;

/// Score of a `due_date` recommendation when only one card has a due date.
pub const SINGLE_DUE_DATE_SCORE: f64 = 0.7;
/// Score of a `due_date` recommendation picked among several due-dated cards.
pub const NEAREST_DUE_DATE_SCORE: f64 = 0.8;
pub const LIST_MOVEMENT_SCORE: f64 = 0.8;
pub const GROUP_CARDS_SCORE: f64 = 0.6;

/// Recommendation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Which card to work on first.
    DueDate,
    /// Card should move to another list.
    ListMovement,
    /// Cards look related and could be grouped.
    GroupCards,
}

impl RecommendationKind {
    /// Stable string id used in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DueDate => "due_date",
            Self::ListMovement => "list_movement",
            Self::GroupCards => "group_cards",
        }
    }

    /// Parses a stable string id.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "due_date" => Some(Self::DueDate),
            "list_movement" => Some(Self::ListMovement),
            "group_cards" => Some(Self::GroupCards),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueDatePayload {
    pub card_id: CardId,
    pub card_title: String,
    pub due_date: DateTime<Utc>,
    /// Present only when the card was picked among several due-dated cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_until: Option<i64>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMovementPayload {
    pub target_list_id: ListId,
    pub target_list_title: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCardsPayload {
    /// Sorted ascending.
    pub card_ids: Vec<CardId>,
    /// Same order as `card_ids`.
    pub card_titles: Vec<String>,
    pub reason: String,
}

/// Kind-specific recommendation data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecommendationPayload {
    DueDate(DueDatePayload),
    ListMovement(ListMovementPayload),
    GroupCards(GroupCardsPayload),
}

impl RecommendationPayload {
    pub fn kind(&self) -> RecommendationKind {
        match self {
            Self::DueDate(_) => RecommendationKind::DueDate,
            Self::ListMovement(_) => RecommendationKind::ListMovement,
            Self::GroupCards(_) => RecommendationKind::GroupCards,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decodes payload JSON according to a known kind.
    pub fn from_json(kind: RecommendationKind, json: &str) -> serde_json::Result<Self> {
        Ok(match kind {
            RecommendationKind::DueDate => Self::DueDate(serde_json::from_str(json)?),
            RecommendationKind::ListMovement => Self::ListMovement(serde_json::from_str(json)?),
            RecommendationKind::GroupCards => Self::GroupCards(serde_json::from_str(json)?),
        })
    }
}

/// One generated suggestion, before the sink assigns identity and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(rename = "type")]
    kind: RecommendationKind,
    score: f64,
    card_id: Option<CardId>,
    payload: RecommendationPayload,
}

impl Recommendation {
    pub fn due_date(score: f64, payload: DueDatePayload) -> Self {
        Self {
            kind: RecommendationKind::DueDate,
            score,
            card_id: Some(payload.card_id),
            payload: RecommendationPayload::DueDate(payload),
        }
    }

    pub fn list_movement(card_id: CardId, payload: ListMovementPayload) -> Self {
        Self {
            kind: RecommendationKind::ListMovement,
            score: LIST_MOVEMENT_SCORE,
            card_id: Some(card_id),
            payload: RecommendationPayload::ListMovement(payload),
        }
    }

    pub fn group_cards(payload: GroupCardsPayload) -> Self {
        Self {
            kind: RecommendationKind::GroupCards,
            score: GROUP_CARDS_SCORE,
            card_id: None,
            payload: RecommendationPayload::GroupCards(payload),
        }
    }

    /// Rebuilds a recommendation from persisted columns.
    ///
    /// Returns `None` when the stored card linkage does not match the payload kind.
    pub fn from_parts(
        score: f64,
        card_id: Option<CardId>,
        payload: RecommendationPayload,
    ) -> Option<Self> {
        let kind = payload.kind();
        let linkage_ok = match kind {
            RecommendationKind::GroupCards => card_id.is_none(),
            RecommendationKind::DueDate | RecommendationKind::ListMovement => card_id.is_some(),
        };
        linkage_ok.then_some(Self {
            kind,
            score,
            card_id,
            payload,
        })
    }

    pub fn kind(&self) -> RecommendationKind {
        self.kind
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn card_id(&self) -> Option<CardId> {
        self.card_id
    }

    pub fn payload(&self) -> &RecommendationPayload {
        &self.payload
    }
}

/// Persisted recommendation as returned by the read side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecommendation {
    pub id: RecommendationId,
    pub board_id: BoardId,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub recommendation: Recommendation,
}
