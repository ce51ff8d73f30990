//! Nimbus Core - Simulated torrent lifecycle management
//!
//! This crate provides the engine behind the Nimbus dashboard: torrent
//! identity and magnet-link handling, the per-torrent record state machine,
//! the statistics simulation that stands in for a real download engine,
//! placeholder file materialization, and archive packaging.

pub mod config;
pub mod torrent;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::NimbusConfig;
pub use torrent::{
    FileEntry, TorrentError, TorrentId, TorrentManagerHandle, TorrentStatus, TorrentView,
    spawn_torrent_manager,
};

/// Core errors that can bubble up from any Nimbus subsystem.
#[derive(Debug, thiserror::Error)]
pub enum NimbusError {
    #[error("Torrent error: {0}")]
    Torrent(#[from] TorrentError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NimbusError>;
