//! Repository layer: collaborator contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the narrow interfaces the recommendation service depends on:
//!   snapshot loading, access checks, recommendation replacement and reads.
//! - Keep SQL details out of the engine and service layers.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `InvalidData`) in
//!   addition to DB transport errors.
//! - Persisted rows that cannot be decoded are rejected, never masked.

pub mod board_repo;
pub mod recommendation_repo;

use crate::db::DbError;
use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for board and recommendation persistence.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
    #[error("failed to encode recommendation payload: {0}")]
    PayloadEncoding(#[from] serde_json::Error),
    #[error("required table `{0}` is missing; run migrations first")]
    MissingRequiredTable(&'static str),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn ensure_tables(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    for table in tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [*table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(*table));
        }
    }
    Ok(())
}
