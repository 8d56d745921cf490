//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate loader, engine and sink into generation use-cases.
//! - Keep CLI callers decoupled from storage details.

pub mod clock;
pub mod recommendation_service;
