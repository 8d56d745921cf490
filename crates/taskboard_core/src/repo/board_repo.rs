//! Board snapshot and access repositories.
//!
//! # Responsibility
//! - Load a board with its lists and cards as one ordered snapshot.
//! - Answer owner/member access checks.
//! - Provide the minimal inserts used to seed boards (CLI demo, tests).
//!
//! # Invariants
//! - Lists load ascending by `position`, cards ascending by `position`
//!   within their list; `id` breaks position ties.
//! - Empty descriptions load as `None`.
//! - Due dates are stored as epoch milliseconds; out-of-range values fail
//!   the load with `RepoError::InvalidData`.

use crate::model::board::{Board, BoardId, BoardList, Card, CardId, ListId, UserId};
use crate::repo::{ensure_tables, parse_uuid, RepoError, RepoResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use uuid::Uuid;

/// Loads point-in-time board snapshots.
pub trait BoardSnapshotLoader {
    /// Returns `Ok(None)` when the board does not exist.
    fn load_board_snapshot(&self, board_id: BoardId) -> RepoResult<Option<Board>>;
}

/// Answers whether a user may see a board.
pub trait BoardAccess {
    /// Owners and members have access; unknown boards deny access.
    fn has_access(&self, user_id: UserId, board_id: BoardId) -> RepoResult<bool>;
}

/// Input for [`SqliteBoardRepository::create_card`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCard {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewCard {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// SQLite-backed board repository.
pub struct SqliteBoardRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBoardRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["boards", "board_members", "lists", "cards"])?;
        Ok(Self { conn })
    }

    /// Creates an empty board owned by `owner_id`.
    pub fn create_board(&self, owner_id: UserId, title: &str) -> RepoResult<BoardId> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO boards (id, title, owner_id) VALUES (?1, ?2, ?3);",
            params![id.to_string(), title, owner_id.to_string()],
        )?;
        Ok(id)
    }

    /// Grants `user_id` membership of a board. Idempotent.
    pub fn add_member(&self, board_id: BoardId, user_id: UserId) -> RepoResult<()> {
        self.ensure_exists("boards", "board", board_id)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO board_members (board_id, user_id) VALUES (?1, ?2);",
            params![board_id.to_string(), user_id.to_string()],
        )?;
        Ok(())
    }

    /// Appends a list after the board's current last list.
    pub fn create_list(&self, board_id: BoardId, title: &str) -> RepoResult<ListId> {
        self.ensure_exists("boards", "board", board_id)?;
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO lists (id, board_id, title, position)
             SELECT ?1, ?2, ?3, COALESCE(MAX(position) + 1, 0)
             FROM lists
             WHERE board_id = ?2;",
            params![id.to_string(), board_id.to_string(), title],
        )?;
        Ok(id)
    }

    /// Appends a card after the list's current last card.
    pub fn create_card(&self, list_id: ListId, card: &NewCard) -> RepoResult<CardId> {
        self.ensure_exists("lists", "list", list_id)?;
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO cards (id, list_id, title, description, due_date, position)
             SELECT ?1, ?2, ?3, ?4, ?5, COALESCE(MAX(position) + 1, 0)
             FROM cards
             WHERE list_id = ?2;",
            params![
                id.to_string(),
                list_id.to_string(),
                card.title.as_str(),
                card.description.as_deref(),
                card.due_date.map(|due| due.timestamp_millis()),
            ],
        )?;
        Ok(id)
    }

    fn ensure_exists(&self, table: &str, entity: &'static str, id: Uuid) -> RepoResult<()> {
        let exists: i64 = self.conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
            [id.to_string()],
            |row| row.get(0),
        )?;
        if exists == 1 {
            Ok(())
        } else {
            Err(RepoError::NotFound { entity, id })
        }
    }
}

impl BoardSnapshotLoader for SqliteBoardRepository<'_> {
    fn load_board_snapshot(&self, board_id: BoardId) -> RepoResult<Option<Board>> {
        let board_key = board_id.to_string();
        let title: Option<String> = self
            .conn
            .query_row(
                "SELECT title FROM boards WHERE id = ?1;",
                [board_key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(title) = title else {
            return Ok(None);
        };

        let mut board = Board::new(board_id, title);
        let mut list_index: HashMap<ListId, usize> = HashMap::new();

        let mut stmt = self.conn.prepare(
            "SELECT id, title, position
             FROM lists
             WHERE board_id = ?1
             ORDER BY position ASC, id ASC;",
        )?;
        let mut rows = stmt.query([board_key.as_str()])?;
        while let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            let list = BoardList::new(
                parse_uuid(&id_text, "lists.id")?,
                row.get::<_, String>("title")?,
                row.get("position")?,
            );
            list_index.insert(list.id, board.lists.len());
            board.lists.push(list);
        }

        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.list_id, c.title, c.description, c.due_date, c.position
             FROM cards c
             INNER JOIN lists l ON l.id = c.list_id
             WHERE l.board_id = ?1
             ORDER BY c.position ASC, c.id ASC;",
        )?;
        let mut rows = stmt.query([board_key.as_str()])?;
        while let Some(row) = rows.next()? {
            let card = parse_card_row(row)?;
            let slot = list_index.get(&card.list_id).copied().ok_or_else(|| {
                RepoError::InvalidData(format!("card {} references unknown list", card.id))
            })?;
            board.lists[slot].cards.push(card);
        }

        Ok(Some(board))
    }
}

impl BoardAccess for SqliteBoardRepository<'_> {
    fn has_access(&self, user_id: UserId, board_id: BoardId) -> RepoResult<bool> {
        let allowed: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM boards b
                WHERE b.id = ?1
                  AND (
                    b.owner_id = ?2
                    OR EXISTS(
                        SELECT 1
                        FROM board_members m
                        WHERE m.board_id = b.id AND m.user_id = ?2
                    )
                  )
            );",
            params![board_id.to_string(), user_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(allowed == 1)
    }
}

fn parse_card_row(row: &Row<'_>) -> RepoResult<Card> {
    let id_text: String = row.get("id")?;
    let list_text: String = row.get("list_id")?;
    let id = parse_uuid(&id_text, "cards.id")?;

    let due_date = match row.get::<_, Option<i64>>("due_date")? {
        Some(millis) => Some(DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
            RepoError::InvalidData(format!("due date `{millis}` out of range for card {id}"))
        })?),
        None => None,
    };

    Ok(Card {
        id,
        list_id: parse_uuid(&list_text, "cards.list_id")?,
        title: row.get("title")?,
        description: row
            .get::<_, Option<String>>("description")?
            .filter(|text| !text.is_empty()),
        due_date,
        position: row.get("position")?,
    })
}
