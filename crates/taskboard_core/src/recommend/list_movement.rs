//! List-movement classification rule.
//!
//! Literal, case-insensitive substring matching over card descriptions and
//! list titles. No stemming, no word boundaries.

use crate::model::board::{BoardList, FlatCard};
use crate::model::recommendation::{ListMovementPayload, Recommendation};

const STARTED_CUE: &str = "started";
const TODO_LIST_CUES: &[&str] = &["todo", "to do", "backlog"];
const PROGRESS_LIST_CUES: &[&str] = &["progress", "in progress", "doing"];
const MOVE_TO_PROGRESS_REASON: &str =
    "Card description contains 'started' - should be in Progress";

/// Returns whether a list title reads like a "not started" column.
pub fn is_todo_like(title: &str) -> bool {
    contains_any(&title.to_lowercase(), TODO_LIST_CUES)
}

/// Returns whether a list title reads like an "in progress" column.
pub fn is_progress_like(title: &str) -> bool {
    contains_any(&title.to_lowercase(), PROGRESS_LIST_CUES)
}

/// First progress-like list in board order.
pub fn find_progress_list(lists: &[BoardList]) -> Option<&BoardList> {
    lists.iter().find(|list| is_progress_like(&list.title))
}

/// Suggests moving one card, if its description and list qualify.
pub fn suggest_list_movement(card: &FlatCard<'_>, lists: &[BoardList]) -> Option<Recommendation> {
    if !card.description().to_lowercase().contains(STARTED_CUE) {
        return None;
    }
    if !is_todo_like(card.list_title) {
        return None;
    }

    let target = find_progress_list(lists)?;
    if target.id == card.list_id {
        return None;
    }

    Some(Recommendation::list_movement(
        card.card.id,
        ListMovementPayload {
            target_list_id: target.id,
            target_list_title: target.title.clone(),
            reason: MOVE_TO_PROGRESS_REASON.to_string(),
        },
    ))
}

/// Runs the movement rule independently for every card.
pub fn classify_list_movements(cards: &[FlatCard<'_>], lists: &[BoardList]) -> Vec<Recommendation> {
    cards
        .iter()
        .filter_map(|card| suggest_list_movement(card, lists))
        .collect()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
