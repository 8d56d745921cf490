//! Domain model for boards and derived recommendations.
//!
//! # Responsibility
//! - Define the read-only board snapshot consumed by the recommendation engine.
//! - Define recommendation records exchanged with persistence sinks.
//!
//! # Invariants
//! - Every board, list, card and recommendation is identified by a stable UUID.
//! - Recommendations are derived data and never edited in place.

pub mod board;
pub mod recommendation;
