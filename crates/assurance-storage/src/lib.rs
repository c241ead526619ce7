//! # assurance-storage
//!
//! SQLite persistence for the assurance engine.
//! Serialized writer connection, pragmas, versioned migrations via
//! `PRAGMA user_version`, one query module per table, and `SqliteStore`,
//! the `AssuranceStore` implementation.

pub mod connection;
pub mod migrations;
pub mod queries;
pub mod store;

pub use connection::DatabaseManager;
pub use store::SqliteStore;
