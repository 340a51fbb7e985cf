//! # presence-db
//!
//! Database layer implementing the session store with SQLite via SQLx.
//!
//! ## Overview
//!
//! This crate provides the SQLite implementation of `SessionRepository` defined in
//! `presence-core`. It handles:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - The repository implementation, including schema creation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use presence_core::SessionRepository;
//! use presence_db::{create_pool, DatabaseConfig, SqliteSessionRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     let sessions = SqliteSessionRepository::new(pool);
//!     sessions.initialize().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, DatabaseConfig, SqlitePool};
pub use repositories::SqliteSessionRepository;
