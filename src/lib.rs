//! codecritic — AI-assisted code review client (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod analytics;
pub mod api;
pub mod chat;
pub mod comments;
pub mod config;
pub mod constants;
pub mod diff;
pub mod env;
pub mod models;
pub mod output;
pub mod session;
pub mod share;
pub mod snippets;
pub mod store;
