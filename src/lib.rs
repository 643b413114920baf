//! studoro - a study-productivity timer for the terminal
//!
//! This crate provides a Pomodoro-style study timer with subject tracking,
//! task lists, and gamification (XP, levels, streaks), backed by a local
//! SQLite store.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod notify;
pub mod output;
pub mod storage;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::StudoroError;
