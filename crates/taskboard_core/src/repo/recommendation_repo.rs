//! Recommendation sink and read-side store.
//!
//! # Responsibility
//! - Replace a board's recommendation set as one atomic unit.
//! - Read a board's stored set newest first.
//!
//! # Invariants
//! - `replace_recommendations` deletes and inserts in a single
//!   `BEGIN IMMEDIATE` transaction; on failure the previous set stays intact.
//! - The sink assigns ids and `created_at`; one batch shares one timestamp
//!   and keeps its generation order through `position`.
//! - An empty batch still clears the previous set.

use crate::model::board::BoardId;
use crate::model::recommendation::{
    Recommendation, RecommendationKind, RecommendationPayload, StoredRecommendation,
};
use crate::repo::{ensure_tables, parse_uuid, RepoError, RepoResult};
use chrono::{DateTime, Utc};
use log::{error, info};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::time::Instant;
use uuid::Uuid;

/// Write side: replaces all recommendations of one board.
pub trait RecommendationSink {
    /// Returns the number of inserted recommendations.
    ///
    /// Fails with `RepoError::NotFound` when the board does not exist.
    fn replace_recommendations(
        &self,
        board_id: BoardId,
        recommendations: &[Recommendation],
    ) -> RepoResult<usize>;
}

/// Read side on top of the sink.
pub trait RecommendationStore: RecommendationSink {
    /// Stored recommendations, `created_at` descending.
    fn list_recommendations(&self, board_id: BoardId) -> RepoResult<Vec<StoredRecommendation>>;
}

/// SQLite-backed recommendation repository.
pub struct SqliteRecommendationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecommendationRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["boards", "recommendations"])?;
        Ok(Self { conn })
    }

    fn replace_in_tx(
        &self,
        board_id: BoardId,
        recommendations: &[Recommendation],
    ) -> RepoResult<usize> {
        let board_key = board_id.to_string();
        // Shared-reference transaction: the repository borrows the
        // connection alongside the board repository.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let board_exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM boards WHERE id = ?1);",
            [board_key.as_str()],
            |row| row.get(0),
        )?;
        if board_exists != 1 {
            return Err(RepoError::NotFound {
                entity: "board",
                id: board_id,
            });
        }

        tx.execute(
            "DELETE FROM recommendations WHERE board_id = ?1;",
            [board_key.as_str()],
        )?;

        let created_at = Utc::now().timestamp_millis();
        {
            let mut insert = tx.prepare(
                "INSERT INTO recommendations (
                    id,
                    board_id,
                    card_id,
                    type,
                    score,
                    payload,
                    position,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            )?;
            for (position, recommendation) in recommendations.iter().enumerate() {
                insert.execute(params![
                    Uuid::new_v4().to_string(),
                    board_key.as_str(),
                    recommendation.card_id().map(|id| id.to_string()),
                    recommendation.kind().as_str(),
                    recommendation.score(),
                    recommendation.payload().to_json()?,
                    position as i64,
                    created_at,
                ])?;
            }
        }

        tx.commit()?;
        Ok(recommendations.len())
    }
}

impl RecommendationSink for SqliteRecommendationRepository<'_> {
    fn replace_recommendations(
        &self,
        board_id: BoardId,
        recommendations: &[Recommendation],
    ) -> RepoResult<usize> {
        let started_at = Instant::now();
        let result = self.replace_in_tx(board_id, recommendations);
        match &result {
            Ok(count) => info!(
                "event=recommendations_replace module=repo status=ok board_id={} count={} duration_ms={}",
                board_id,
                count,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=recommendations_replace module=repo status=error board_id={} duration_ms={} error={}",
                board_id,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

impl RecommendationStore for SqliteRecommendationRepository<'_> {
    fn list_recommendations(&self, board_id: BoardId) -> RepoResult<Vec<StoredRecommendation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, board_id, card_id, type, score, payload, created_at
             FROM recommendations
             WHERE board_id = ?1
             ORDER BY created_at DESC, position ASC;",
        )?;
        let mut rows = stmt.query([board_id.to_string()])?;
        let mut stored = Vec::new();
        while let Some(row) = rows.next()? {
            stored.push(parse_recommendation_row(row)?);
        }
        Ok(stored)
    }
}

fn parse_recommendation_row(row: &Row<'_>) -> RepoResult<StoredRecommendation> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "recommendations.id")?;
    let board_text: String = row.get("board_id")?;
    let card_id = match row.get::<_, Option<String>>("card_id")? {
        Some(text) => Some(parse_uuid(&text, "recommendations.card_id")?),
        None => None,
    };

    let kind_text: String = row.get("type")?;
    let kind = RecommendationKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid recommendation type `{kind_text}` in recommendations.type"
        ))
    })?;

    let payload_text: String = row.get("payload")?;
    let payload = RecommendationPayload::from_json(kind, &payload_text).map_err(|err| {
        RepoError::InvalidData(format!("invalid {} payload for {id}: {err}", kind.as_str()))
    })?;

    let recommendation = Recommendation::from_parts(row.get("score")?, card_id, payload)
        .ok_or_else(|| {
            RepoError::InvalidData(format!(
                "card linkage does not match type `{}` for {id}",
                kind.as_str()
            ))
        })?;

    let created_millis: i64 = row.get("created_at")?;
    let created_at = DateTime::<Utc>::from_timestamp_millis(created_millis).ok_or_else(|| {
        RepoError::InvalidData(format!("created_at `{created_millis}` out of range for {id}"))
    })?;

    Ok(StoredRecommendation {
        id,
        board_id: parse_uuid(&board_text, "recommendations.board_id")?,
        created_at,
        recommendation,
    })
}
