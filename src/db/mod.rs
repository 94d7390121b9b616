//! SQLite persistence for sales lines, containers and catalog data.
//!
//! This module provides:
//! - Database initialization and migrations
//! - SQLite pragma configuration
//! - The `Repository` with all query and mutation methods

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::Repository;
