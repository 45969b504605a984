//! # Queue Bot
//!
//! A Telegram bot and web dashboard for first-come-first-served signup queues.
//!
//! ## Features
//! - Events with a capped number of numbered positions
//! - Users claim one free position per event, and can give it back
//! - Admin-only event creation, renaming and deletion
//! - Read-only HTML/JSON dashboard over the same SQLite database

/// Bot commands, dialogue and callback handling
pub mod bot;
/// Configuration from environment variables
pub mod config;
/// HTTP dashboard and health checks
pub mod dashboard;
/// Database models, connections, and migrations
pub mod database;
/// Logging, feedback, validation and formatting helpers
pub mod utils;
