//! # presence-gateway
//!
//! Gateway adapter: decodes dispatch events from the chat gateway and turns them
//! into tracker calls.

pub mod events;
pub mod handlers;
pub mod members;
pub mod protocol;
pub mod server;
