//! Simulated torrent lifecycle management.
//!
//! The manager owns an in-memory registry of torrent records and runs as an
//! actor: adapters talk to it exclusively through [`TorrentManagerHandle`],
//! which serializes every operation onto a single task.

pub mod actor;
pub mod archive;
pub mod commands;
pub mod handle;
pub mod magnet;
pub mod manager;
pub mod materialize;
pub mod record;
pub mod simulation;

use std::fmt;
use std::str::FromStr;

use sha1::{Digest, Sha1};

pub use actor::spawn_torrent_manager;
pub use archive::pack_files;
pub use commands::ManagerCommand;
pub use handle::TorrentManagerHandle;
pub use manager::TorrentManager;
pub use record::{FileEntry, TorrentOrigin, TorrentRecord, TorrentView};
pub use simulation::{ProgressSource, RandomWalkSource, StepOutcome};

/// Stable short identifier for a torrent.
///
/// Derived from the origin string (magnet link or uploaded filename) by
/// truncating its SHA-1 digest to six bytes, rendered as twelve lowercase
/// hex characters. The same origin always yields the same identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TorrentId([u8; 6]);

impl TorrentId {
    /// Derives the identifier for an origin string.
    pub fn from_origin(origin: &str) -> Self {
        let digest = Sha1::digest(origin.as_bytes());
        let mut bytes = [0u8; 6];
        bytes.copy_from_slice(&digest[..6]);
        Self(bytes)
    }

    /// Returns reference to the underlying six identifier bytes.
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl fmt::Display for TorrentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for TorrentId {
    type Err = TorrentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = hex::decode(s).map_err(|_| TorrentError::InvalidTorrentId {
            value: s.to_string(),
        })?;
        let bytes: [u8; 6] = decoded
            .try_into()
            .map_err(|_| TorrentError::InvalidTorrentId {
                value: s.to_string(),
            })?;
        Ok(Self(bytes))
    }
}

impl serde::Serialize for TorrentId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Lifecycle state of a simulated download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TorrentStatus {
    Downloading,
    Paused,
    Completed,
    Error,
}

impl fmt::Display for TorrentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TorrentStatus::Downloading => "downloading",
            TorrentStatus::Paused => "paused",
            TorrentStatus::Completed => "completed",
            TorrentStatus::Error => "error",
        };
        write!(f, "{name}")
    }
}

impl FromStr for TorrentStatus {
    type Err = TorrentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "downloading" => Ok(TorrentStatus::Downloading),
            "paused" => Ok(TorrentStatus::Paused),
            "completed" => Ok(TorrentStatus::Completed),
            "error" => Ok(TorrentStatus::Error),
            other => Err(TorrentError::InvalidStatus {
                value: other.to_string(),
            }),
        }
    }
}

/// Errors that can occur during torrent lifecycle operations.
///
/// Every failure surfaces to adapters as a structured result; none abort
/// the process.
#[derive(Debug, thiserror::Error)]
pub enum TorrentError {
    #[error("Invalid magnet link: {reason}")]
    InvalidMagnet { reason: String },

    #[error("Invalid torrent descriptor: {reason}")]
    InvalidDescriptor { reason: String },

    #[error("Torrent {id} already exists")]
    DuplicateTorrent { id: TorrentId },

    #[error("Torrent {id} not found")]
    TorrentNotFound { id: TorrentId },

    #[error("Cannot pause completed torrent {id}")]
    CannotPause { id: TorrentId },

    #[error("Torrent {id} is not paused")]
    NotPaused { id: TorrentId },

    #[error("File {name} not found")]
    FileNotFound { name: String },

    #[error("Not a valid torrent id: {value}")]
    InvalidTorrentId { value: String },

    #[error("Unknown status: {value}")]
    InvalidStatus { value: String },

    #[error("Archive packaging failed: {reason}")]
    Archive { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Torrent manager has shut down")]
    ManagerShutdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_torrent_id_is_deterministic() {
        let a = TorrentId::from_origin("magnet:?xt=urn:btih:ABC");
        let b = TorrentId::from_origin("magnet:?xt=urn:btih:ABC");
        assert_eq!(a, b);
    }

    #[test]
    fn test_torrent_id_distinct_origins_differ() {
        let a = TorrentId::from_origin("magnet:?xt=urn:btih:ABC");
        let b = TorrentId::from_origin("magnet:?xt=urn:btih:ABD");
        assert_ne!(a, b);
    }

    #[test]
    fn test_torrent_id_renders_twelve_hex_chars() {
        let id = TorrentId::from_origin("ubuntu.torrent");
        let rendered = id.to_string();
        assert_eq!(rendered.len(), 12);
        assert!(rendered.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_torrent_id_round_trips_through_from_str() {
        let id = TorrentId::from_origin("magnet:?xt=urn:btih:ABC");
        let parsed: TorrentId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_torrent_id_rejects_bad_input() {
        assert!("nothex".parse::<TorrentId>().is_err());
        assert!("abcd".parse::<TorrentId>().is_err());
        assert!("0123456789abcdef".parse::<TorrentId>().is_err());
    }

    #[test]
    fn test_status_round_trips() {
        for status in [
            TorrentStatus::Downloading,
            TorrentStatus::Paused,
            TorrentStatus::Completed,
            TorrentStatus::Error,
        ] {
            let parsed: TorrentStatus = status.to_string().parse().unwrap();
            assert_eq!(status, parsed);
        }
    }
}
