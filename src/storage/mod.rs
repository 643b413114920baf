//! Storage layer for studoro.
//!
//! This module provides SQLite-based persistence for:
//! - Recorded study sessions and the gamification profile
//! - Subjects and tasks
//! - The single active timer snapshot

mod active;
mod database;
mod migrations;

pub use active::ActiveTimerStorage;
pub use database::Database;
