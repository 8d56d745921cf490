//! Recommendation use-case service.
//!
//! # Responsibility
//! - Run one generation: load snapshot, evaluate rules, replace stored set.
//! - Provide the "get" (generate-if-empty) and "refresh" entry points, with
//!   optional access checks for user-facing callers.
//!
//! # Invariants
//! - A missing board aborts generation before the sink is touched.
//! - Every successful generation calls the sink, even with an empty set.
//! - The service holds no state between calls beyond its collaborators.

use crate::model::board::{BoardId, UserId};
use crate::model::recommendation::{Recommendation, StoredRecommendation};
use crate::recommend::{generate_recommendations, RecommendationOptions};
use crate::repo::board_repo::{BoardAccess, BoardSnapshotLoader};
use crate::repo::recommendation_repo::{RecommendationSink, RecommendationStore};
use crate::repo::RepoError;
use crate::service::clock::{Clock, SystemClock};
use log::{debug, error, info, warn};
use std::time::Instant;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for recommendation use-cases.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("board not found: {0}")]
    BoardNotFound(BoardId),
    #[error("user {user_id} has no access to board {board_id}")]
    AccessDenied { user_id: UserId, board_id: BoardId },
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: "board",
                id,
            } => Self::BoardNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Recommendation service over injected loader and sink.
pub struct RecommendationService<L, S, C = SystemClock> {
    loader: L,
    sink: S,
    clock: C,
    options: RecommendationOptions,
}

impl<L, S> RecommendationService<L, S> {
    /// Creates a service using wall-clock time and default options.
    pub fn new(loader: L, sink: S) -> Self {
        Self::with_clock(loader, sink, SystemClock)
    }
}

impl<L, S, C> RecommendationService<L, S, C> {
    pub fn with_clock(loader: L, sink: S, clock: C) -> Self {
        Self {
            loader,
            sink,
            clock,
            options: RecommendationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RecommendationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<L, S, C> RecommendationService<L, S, C>
where
    L: BoardSnapshotLoader,
    S: RecommendationSink,
    C: Clock,
{
    /// Regenerates and replaces the board's recommendation set.
    ///
    /// # Errors
    /// - `BoardNotFound` when the snapshot loader has no such board.
    /// - `Repo` when loading or replacing fails; the prior set is then kept.
    pub fn generate(&self, board_id: BoardId) -> ServiceResult<Vec<Recommendation>> {
        let started_at = Instant::now();
        info!("event=recommendations_generate module=service status=start board_id={board_id}");

        let result = self.generate_inner(board_id);
        match &result {
            Ok(recommendations) => info!(
                "event=recommendations_generate module=service status=ok board_id={} count={} duration_ms={}",
                board_id,
                recommendations.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=recommendations_generate module=service status=error board_id={} duration_ms={} error={}",
                board_id,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn generate_inner(&self, board_id: BoardId) -> ServiceResult<Vec<Recommendation>> {
        let board = self
            .loader
            .load_board_snapshot(board_id)?
            .ok_or(ServiceError::BoardNotFound(board_id))?;
        debug!(
            "event=board_snapshot module=service status=ok board_id={} lists={} cards={}",
            board_id,
            board.lists.len(),
            board.card_count()
        );
        let recommendations = generate_recommendations(&board, self.clock.now(), &self.options);
        self.sink.replace_recommendations(board_id, &recommendations)?;
        Ok(recommendations)
    }
}

impl<L, S, C> RecommendationService<L, S, C>
where
    L: BoardSnapshotLoader,
    S: RecommendationStore,
    C: Clock,
{
    /// Returns stored recommendations, generating them first when none exist.
    ///
    /// A missing board is reported; any other generation failure is logged and
    /// the (empty) stored set is returned.
    pub fn recommendations(&self, board_id: BoardId) -> ServiceResult<Vec<StoredRecommendation>> {
        let stored = self.sink.list_recommendations(board_id)?;
        if !stored.is_empty() {
            return Ok(stored);
        }

        match self.generate(board_id) {
            Ok(_) => Ok(self.sink.list_recommendations(board_id)?),
            Err(ServiceError::BoardNotFound(id)) => Err(ServiceError::BoardNotFound(id)),
            Err(err) => {
                warn!(
                    "event=recommendations_get module=service status=degraded board_id={board_id} error={err}"
                );
                Ok(stored)
            }
        }
    }

    /// Always regenerates, then returns the stored set.
    pub fn refresh(&self, board_id: BoardId) -> ServiceResult<Vec<StoredRecommendation>> {
        self.generate(board_id)?;
        Ok(self.sink.list_recommendations(board_id)?)
    }
}

impl<L, S, C> RecommendationService<L, S, C>
where
    L: BoardSnapshotLoader + BoardAccess,
    S: RecommendationStore,
    C: Clock,
{
    /// [`Self::recommendations`] guarded by a board access check.
    pub fn recommendations_for_user(
        &self,
        user_id: UserId,
        board_id: BoardId,
    ) -> ServiceResult<Vec<StoredRecommendation>> {
        self.ensure_access(user_id, board_id)?;
        self.recommendations(board_id)
    }

    /// [`Self::refresh`] guarded by a board access check.
    pub fn refresh_for_user(
        &self,
        user_id: UserId,
        board_id: BoardId,
    ) -> ServiceResult<Vec<StoredRecommendation>> {
        self.ensure_access(user_id, board_id)?;
        self.refresh(board_id)
    }

    fn ensure_access(&self, user_id: UserId, board_id: BoardId) -> ServiceResult<()> {
        if self.loader.has_access(user_id, board_id)? {
            return Ok(());
        }
        warn!(
            "event=board_access module=service status=denied board_id={board_id} user_id={user_id}"
        );
        Err(ServiceError::AccessDenied { user_id, board_id })
    }
}
