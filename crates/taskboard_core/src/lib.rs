//! Core domain logic for the task-board recommendation engine.
//!
//! The engine (`recommend`) is a pure function of a board snapshot. Loading
//! and persistence sit behind the traits in `repo`, orchestrated by
//! `service::recommendation_service`.

pub mod db;
pub mod logging;
pub mod model;
pub mod recommend;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::board::{Board, BoardId, BoardList, Card, CardId, FlatCard, ListId, UserId};
pub use model::recommendation::{
    DueDatePayload, GroupCardsPayload, ListMovementPayload, Recommendation, RecommendationId,
    RecommendationKind, RecommendationPayload, StoredRecommendation,
};
pub use recommend::{generate_recommendations, RecommendationOptions};
pub use repo::board_repo::{BoardAccess, BoardSnapshotLoader, NewCard, SqliteBoardRepository};
pub use repo::recommendation_repo::{
    RecommendationSink, RecommendationStore, SqliteRecommendationRepository,
};
pub use repo::{RepoError, RepoResult};
pub use service::clock::{Clock, FixedClock, SystemClock};
pub use service::recommendation_service::{RecommendationService, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
