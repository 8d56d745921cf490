//! Recommendation engine.
//!
//! # Responsibility
//! - Flatten one board snapshot and run every recommendation rule over it.
//! - Aggregate rule output into one ordered recommendation set.
//!
//! # Invariants
//! - Pure: output depends only on the snapshot, `now` and options.
//! - Rules never observe each other's output.
//! - Output order is due-date, then list-movement, then grouping results.
//! - At most one `due_date` recommendation per board.
//!
//! # See also
//! - `service::recommendation_service` for load/replace orchestration.

pub mod due_date;
pub mod list_movement;
pub mod similarity;

use crate::model::board::Board;
use crate::model::recommendation::Recommendation;
use chrono::{DateTime, Utc};

/// Tunables for the grouping rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationOptions {
    /// Minimum Jaccard index for two cards to count as related.
    pub similarity_threshold: f64,
    /// Maximum related cards kept per card.
    pub max_related: usize,
}

impl Default for RecommendationOptions {
    fn default() -> Self {
        Self {
            similarity_threshold: similarity::DEFAULT_SIMILARITY_THRESHOLD,
            max_related: similarity::DEFAULT_MAX_RELATED,
        }
    }
}

/// Derives the full recommendation set for one board.
///
/// An empty board yields an empty set.
pub fn generate_recommendations(
    board: &Board,
    now: DateTime<Utc>,
    options: &RecommendationOptions,
) -> Vec<Recommendation> {
    let cards = board.flatten();

    let mut recommendations = Vec::new();
    recommendations.extend(due_date::prioritize_due_dates(&cards, now));
    recommendations.extend(list_movement::classify_list_movements(
        &cards,
        &board.lists,
    ));
    recommendations.extend(similarity::group_similar_cards(
        &cards,
        options.similarity_threshold,
        options.max_related,
    ));
    recommendations
}

#[cfg(test)]
mod tests {
    use super::{generate_recommendations, RecommendationOptions};
    use crate::model::board::{Board, BoardList, Card};
    use crate::model::recommendation::RecommendationKind;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn empty_board_produces_nothing() {
        let board = Board::new(Uuid::from_u128(1), "empty");
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(generate_recommendations(&board, now, &RecommendationOptions::default()).is_empty());
    }

    #[test]
    fn output_is_ordered_by_rule() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut board = Board::new(Uuid::from_u128(1), "board");
        let mut todo = BoardList::new(Uuid::from_u128(10), "To Do", 0);
        let doing = BoardList::new(Uuid::from_u128(11), "Doing", 1);

        let mut first = Card::new(Uuid::from_u128(100), todo.id, "Fix login bug", 0);
        first.description = Some("started on it".to_string());
        let mut second = Card::new(Uuid::from_u128(101), todo.id, "Login bug again", 1);
        second.due_date = Some(now + Duration::days(2));
        todo.cards.push(first);
        todo.cards.push(second);
        board.lists.push(todo);
        board.lists.push(doing);

        let recs = generate_recommendations(&board, now, &RecommendationOptions::default());
        let kinds: Vec<RecommendationKind> = recs.iter().map(|rec| rec.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                RecommendationKind::DueDate,
                RecommendationKind::ListMovement,
                RecommendationKind::GroupCards,
            ]
        );
    }

    #[test]
    fn stricter_threshold_suppresses_groups() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut board = Board::new(Uuid::from_u128(1), "board");
        let mut list = BoardList::new(Uuid::from_u128(10), "Ideas", 0);
        list.cards
            .push(Card::new(Uuid::from_u128(100), list.id, "Fix login bug", 0));
        list.cards.push(Card::new(
            Uuid::from_u128(101),
            list.id,
            "Login button broken",
            1,
        ));
        board.lists.push(list);

        let default_recs =
            generate_recommendations(&board, now, &RecommendationOptions::default());
        assert_eq!(default_recs.len(), 1);

        let strict = RecommendationOptions {
            similarity_threshold: 0.5,
            ..RecommendationOptions::default()
        };
        assert!(generate_recommendations(&board, now, &strict).is_empty());
    }
}
