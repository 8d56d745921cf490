//! Due-date prioritization rule.
//!
//! # Invariants
//! - Emits at most one recommendation per board.
//! - Overdue cards (due before `now`) are never selected.
//! - Ties on `days_until` resolve to the first card in flattened order.

use crate::model::board::FlatCard;
use crate::model::recommendation::{
    DueDatePayload, Recommendation, NEAREST_DUE_DATE_SCORE, SINGLE_DUE_DATE_SCORE,
};
use chrono::{DateTime, Duration, Utc};

/// Whole days from `now` until `due`, rounded toward negative infinity.
///
/// A due date one hour in the past yields `-1`; one hour ahead yields `0`.
/// Floors on the full-precision delta, so any sub-day overdue amount is `-1`.
pub fn days_until(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let delta = due - now;
    // `num_days` truncates toward zero.
    let days = delta.num_days();
    if delta < Duration::days(days) {
        days - 1
    } else {
        days
    }
}

/// Picks the card that should be worked on first.
pub fn prioritize_due_dates(cards: &[FlatCard<'_>], now: DateTime<Utc>) -> Option<Recommendation> {
    let candidates: Vec<(&FlatCard<'_>, DateTime<Utc>, i64)> = cards
        .iter()
        .filter_map(|item| {
            item.card
                .due_date
                .map(|due| (item, due, days_until(due, now)))
        })
        .collect();

    match candidates.as_slice() {
        [] => None,
        [(item, due, days)] => {
            // A lone overdue card yields nothing instead of the plain 0.7
            // "has a due date" record, so overdue cards never surface here.
            if *days < 0 {
                return None;
            }
            Some(Recommendation::due_date(
                SINGLE_DUE_DATE_SCORE,
                DueDatePayload {
                    card_id: item.card.id,
                    card_title: item.card.title.clone(),
                    due_date: *due,
                    days_until: None,
                    reason: "This card has a due date".to_string(),
                },
            ))
        }
        _ => {
            // `min_by_key` returns the first of equal minima.
            let (item, due, days) = candidates
                .iter()
                .copied()
                .filter(|(_, _, days)| *days >= 0)
                .min_by_key(|(_, _, days)| *days)?;
            Some(Recommendation::due_date(
                NEAREST_DUE_DATE_SCORE,
                DueDatePayload {
                    card_id: item.card.id,
                    card_title: item.card.title.clone(),
                    due_date: due,
                    days_until: Some(days),
                    reason: nearest_reason(days),
                },
            ))
        }
    }
}

fn nearest_reason(days: i64) -> String {
    let unit = if days == 1 { "day" } else { "days" };
    format!("This card has the nearest due date ({days} {unit} away) - should be done first")
}
