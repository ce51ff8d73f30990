//! Per-torrent record state.
//!
//! A [`TorrentRecord`] is the mutable state for one simulated download. It
//! is owned by the manager and only ever mutated through manager
//! operations; adapters see the serializable [`TorrentView`] snapshot.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{TorrentId, TorrentStatus};

/// One materialized file belonging to a completed torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

/// What a record was created from. Exactly one origin per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TorrentOrigin {
    /// Raw magnet link string as submitted
    Magnet(String),
    /// Path of the persisted torrent descriptor upload
    Descriptor(PathBuf),
}

/// Mutable state for one simulated download.
#[derive(Debug, Clone)]
pub struct TorrentRecord {
    /// Stable fingerprint of the origin
    pub id: TorrentId,
    /// Display name shown in the dashboard
    pub name: String,
    /// Magnet link or descriptor path the record was created from
    pub origin: TorrentOrigin,
    /// Lifecycle state; new records always start downloading
    pub status: TorrentStatus,
    /// Download progress in percent, 0 to 100
    pub progress: f64,
    /// Simulated instantaneous download rate in KB/s
    pub download_speed: f64,
    /// Simulated instantaneous upload rate in KB/s
    pub upload_speed: f64,
    /// Simulated connected peer count
    pub peers: u32,
    /// Simulated seed count
    pub seeds: u32,
    /// Total size in bytes, fixed at creation
    pub total_size: u64,
    /// Bytes downloaded, always derived from progress and total size
    pub downloaded: u64,
    /// Estimated time remaining; absent unless actively downloading
    pub eta: Option<Duration>,
    /// Creation timestamp
    pub added_at: DateTime<Utc>,
    /// Materialized files; empty until the record completes
    pub files: Vec<FileEntry>,
    /// Directory placeholder files are written into
    pub download_path: PathBuf,
}

impl TorrentRecord {
    /// Creates a fresh record in the downloading state.
    pub fn new(
        id: TorrentId,
        name: String,
        origin: TorrentOrigin,
        total_size: u64,
        download_path: PathBuf,
    ) -> Self {
        Self {
            id,
            name,
            origin,
            status: TorrentStatus::Downloading,
            progress: 0.0,
            download_speed: 0.0,
            upload_speed: 0.0,
            peers: 0,
            seeds: 0,
            total_size,
            downloaded: 0,
            eta: None,
            added_at: Utc::now(),
            files: Vec::new(),
            download_path,
        }
    }

    /// Snapshot suitable for transport to adapters.
    pub fn view(&self) -> TorrentView {
        TorrentView {
            id: self.id.to_string(),
            name: self.name.clone(),
            status: self.status,
            progress: round2(self.progress),
            download_speed: round2(self.download_speed),
            upload_speed: round2(self.upload_speed),
            peers: self.peers,
            seeds: self.seeds,
            total_size: self.total_size,
            downloaded: self.downloaded,
            eta: self.eta.map(format_eta),
            added_at: self.added_at.to_rfc3339(),
            files: self.files.clone(),
        }
    }
}

/// Serializable snapshot of a record for API responses and rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorrentView {
    pub id: String,
    pub name: String,
    pub status: TorrentStatus,
    pub progress: f64,
    pub download_speed: f64,
    pub upload_speed: f64,
    pub peers: u32,
    pub seeds: u32,
    pub total_size: u64,
    pub downloaded: u64,
    pub eta: Option<String>,
    pub added_at: String,
    pub files: Vec<FileEntry>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Renders a duration as `h:mm:ss`.
fn format_eta(eta: Duration) -> String {
    let total = eta.as_secs();
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
