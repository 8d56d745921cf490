//! Task-board recommendation CLI.
//!
//! # Responsibility
//! - Wire configuration (flags, environment) into logging and storage.
//! - Expose the get/refresh/list recommendation entry points as JSON output.

mod cli;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use cli::{Cli, Commands};
use log::info;
use rusqlite::Connection;
use serde_json::json;
use std::path::Path;
use taskboard_core::db::open_db;
use taskboard_core::{
    core_version, default_log_level, init_logging, NewCard, RecommendationService,
    RecommendationStore, SqliteBoardRepository, SqliteRecommendationRepository,
};
use uuid::Uuid;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    init_logging(&level, cli.log_dir.as_deref()).context("failed to initialize logging")?;

    match cli.command {
        Commands::Version => {
            println!("taskboard_core version={}", core_version());
        }
        Commands::Demo { owner } => {
            let conn = open_storage(&cli.db)?;
            let boards = SqliteBoardRepository::try_new(&conn)?;
            let owner = owner.unwrap_or_else(Uuid::new_v4);
            let board_id = seed_demo_board(&boards, owner)?;
            info!("event=demo_seed module=cli status=ok board_id={board_id}");
            print_json(&json!({ "boardId": board_id, "ownerId": owner }))?;
        }
        Commands::Recommend { board, user } => {
            let conn = open_storage(&cli.db)?;
            let service = RecommendationService::new(
                SqliteBoardRepository::try_new(&conn)?,
                SqliteRecommendationRepository::try_new(&conn)?,
            );
            let stored = match user {
                Some(user) => service.recommendations_for_user(user, board),
                None => service.recommendations(board),
            }
            .with_context(|| format!("failed to get recommendations for board {board}"))?;
            print_json(&stored)?;
        }
        Commands::Refresh { board, user } => {
            let conn = open_storage(&cli.db)?;
            let service = RecommendationService::new(
                SqliteBoardRepository::try_new(&conn)?,
                SqliteRecommendationRepository::try_new(&conn)?,
            );
            let stored = match user {
                Some(user) => service.refresh_for_user(user, board),
                None => service.refresh(board),
            }
            .with_context(|| format!("failed to refresh recommendations for board {board}"))?;
            print_json(&stored)?;
        }
        Commands::List { board } => {
            let conn = open_storage(&cli.db)?;
            let store = SqliteRecommendationRepository::try_new(&conn)?;
            print_json(&store.list_recommendations(board)?)?;
        }
    }
    Ok(())
}

fn open_storage(path: &Path) -> Result<Connection> {
    open_db(path).with_context(|| format!("failed to open database `{}`", path.display()))
}

fn seed_demo_board(boards: &SqliteBoardRepository<'_>, owner: Uuid) -> Result<Uuid> {
    let now = Utc::now();
    let board_id = boards.create_board(owner, "Demo board")?;
    let todo = boards.create_list(board_id, "To Do")?;
    boards.create_list(board_id, "Doing")?;
    boards.create_list(board_id, "Done")?;

    boards.create_card(
        todo,
        &NewCard::titled("Fix login bug")
            .with_description("I started this yesterday")
            .with_due_date(now + Duration::days(3)),
    )?;
    boards.create_card(
        todo,
        &NewCard::titled("Login bug on mobile").with_due_date(now + Duration::days(7)),
    )?;
    boards.create_card(todo, &NewCard::titled("Write release notes"))?;
    Ok(board_id)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
