//! Nimbus Web - dashboard and JSON API server
//!
//! Serves a server-rendered dashboard over the torrent manager plus a JSON
//! pseudo-API. Mutating endpoints validate the configured credentials
//! before touching the manager; reads are open.

pub mod auth;
pub mod handlers;
pub mod server;

// Re-export main types
pub use server::{AppState, router, run_server};
