//! Integration test utilities for the presence tracker
//!
//! This crate provides helpers for running end-to-end tests against a real
//! SQLite session store and the gateway event feed.

pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
