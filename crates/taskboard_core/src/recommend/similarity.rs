//! Lexical similarity and card grouping.
//!
//! # Responsibility
//! - Score card pairs by Jaccard index over word-token sets.
//! - Derive each card's related set and collapse identical groups.
//!
//! # Invariants
//! - `similarity(a, b) == similarity(b, a)` and a card never matches itself.
//! - Groups merge only when their sorted id sets are identical; overlapping
//!   sets stay separate.
//! - Group output follows the encounter order of the first card producing it.

use crate::model::board::{CardId, FlatCard};
use crate::model::recommendation::{GroupCardsPayload, Recommendation};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.2;
pub const DEFAULT_MAX_RELATED: usize = 5;
/// Minimum token length in UTF-16 code units.
const MIN_TOKEN_UNITS: usize = 3;
const GROUP_REASON: &str = "You may want to group these cards together";

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Lower-cased word tokens of `title + " " + description`.
///
/// Length is measured in UTF-16 code units, so a non-BMP character such as
/// an emoji counts as two.
pub fn tokenize(title: &str, description: &str) -> HashSet<String> {
    let text = format!("{title} {description}").to_lowercase();
    WHITESPACE_RE
        .split(&text)
        .filter(|token| token.encode_utf16().count() >= MIN_TOKEN_UNITS)
        .map(str::to_string)
        .collect()
}

/// Jaccard index of two token sets; `0.0` when both are empty.
pub fn jaccard(left: &HashSet<String>, right: &HashSet<String>) -> f64 {
    let intersection = left.intersection(right).count();
    let union = left.len() + right.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Similarity of two cards. Identical ids always score `0.0`.
pub fn card_similarity(left: &FlatCard<'_>, right: &FlatCard<'_>) -> f64 {
    if left.card.id == right.card.id {
        return 0.0;
    }
    jaccard(
        &tokenize(&left.card.title, left.description()),
        &tokenize(&right.card.title, right.description()),
    )
}

/// Cards related to `cards[index]`, best match first, ties in encounter order.
fn related_cards(
    index: usize,
    cards: &[FlatCard<'_>],
    tokens: &[HashSet<String>],
    threshold: f64,
    max_related: usize,
) -> Vec<(CardId, f64)> {
    let own_id = cards[index].card.id;
    let mut related: Vec<(CardId, f64)> = cards
        .iter()
        .zip(tokens)
        .filter(|(other, _)| other.card.id != own_id)
        .map(|(other, other_tokens)| (other.card.id, jaccard(&tokens[index], other_tokens)))
        .filter(|(_, score)| *score >= threshold)
        .collect();
    // Stable sort keeps encounter order for equal scores.
    related.sort_by(|left, right| right.1.total_cmp(&left.1));
    related.truncate(max_related);
    related
}

/// Canonical group key: sorted, de-duplicated member ids.
pub fn group_key(card_id: CardId, related: impl IntoIterator<Item = CardId>) -> Vec<CardId> {
    let mut ids: Vec<CardId> = std::iter::once(card_id).chain(related).collect();
    ids.sort();
    ids.dedup();
    ids
}

/// Suggests groups of lexically related cards.
pub fn group_similar_cards(
    cards: &[FlatCard<'_>],
    threshold: f64,
    max_related: usize,
) -> Vec<Recommendation> {
    let tokens: Vec<HashSet<String>> = cards
        .iter()
        .map(|item| tokenize(&item.card.title, item.description()))
        .collect();
    let titles: HashMap<CardId, &str> = cards
        .iter()
        .map(|item| (item.card.id, item.card.title.as_str()))
        .collect();

    let mut seen: HashSet<Vec<CardId>> = HashSet::new();
    let mut groups: Vec<Vec<CardId>> = Vec::new();
    for (index, item) in cards.iter().enumerate() {
        let related = related_cards(index, cards, &tokens, threshold, max_related);
        if related.is_empty() {
            continue;
        }
        let key = group_key(item.card.id, related.into_iter().map(|(id, _)| id));
        if seen.insert(key.clone()) {
            groups.push(key);
        }
    }

    groups
        .into_iter()
        .filter_map(|key| {
            let members: Vec<(CardId, &str)> = key
                .iter()
                .filter_map(|id| titles.get(id).map(|title| (*id, *title)))
                .collect();
            if members.len() < 2 {
                return None;
            }
            Some(Recommendation::group_cards(GroupCardsPayload {
                card_ids: members.iter().map(|(id, _)| *id).collect(),
                card_titles: members.iter().map(|(_, title)| title.to_string()).collect(),
                reason: GROUP_REASON.to_string(),
            }))
        })
        .collect()
}
