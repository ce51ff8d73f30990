//! Core torrent lifecycle manager.
//!
//! Owns the id-to-record registry and every operation on it. The manager is
//! not shared directly; [`spawn_torrent_manager`](super::spawn_torrent_manager)
//! runs it inside an actor task and hands out a
//! [`TorrentManagerHandle`](super::TorrentManagerHandle).

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::fs;

use super::record::{FileEntry, TorrentOrigin, TorrentRecord, TorrentView};
use super::simulation::{ProgressSource, StepOutcome};
use super::{TorrentError, TorrentId, TorrentStatus, archive, magnet, materialize};
use crate::config::NimbusConfig;

const MIB: u64 = 1024 * 1024;

/// Registry of simulated downloads plus the progress source driving them.
///
/// Generic over [`ProgressSource`] so the random walk can be swapped for a
/// real engine without touching callers.
pub struct TorrentManager<S: ProgressSource> {
    config: NimbusConfig,
    records: HashMap<TorrentId, TorrentRecord>,
    source: S,
    rng: ChaCha8Rng,
}

impl<S: ProgressSource> TorrentManager<S> {
    /// Creates a manager with the provided configuration and progress source.
    ///
    /// Ensures the download root exists; failure to create it is logged and
    /// surfaces later on the first operation that writes beneath it.
    pub fn new(config: NimbusConfig, source: S) -> Self {
        if let Err(e) = std::fs::create_dir_all(&config.storage.download_dir) {
            tracing::warn!(
                "Failed to create download directory {}: {e}",
                config.storage.download_dir.display()
            );
        }

        let rng = match config.simulation.deterministic_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };

        Self {
            config,
            records: HashMap::new(),
            source,
            rng,
        }
    }

    /// Adds a torrent from a magnet link.
    ///
    /// # Errors
    /// - `TorrentError::InvalidMagnet` - Link does not start with `magnet:?`
    /// - `TorrentError::DuplicateTorrent` - Same link was already added
    pub fn add_magnet(&mut self, link: &str) -> Result<TorrentId, TorrentError> {
        if !magnet::is_magnet_link(link) {
            return Err(TorrentError::InvalidMagnet {
                reason: "missing magnet:? prefix".to_string(),
            });
        }

        let id = TorrentId::from_origin(link);
        if self.records.contains_key(&id) {
            return Err(TorrentError::DuplicateTorrent { id });
        }

        let name = magnet::display_name(link).unwrap_or_else(magnet::fallback_name);
        let record = self.create_record(id, name, TorrentOrigin::Magnet(link.to_string()));

        tracing::info!("Added magnet torrent {id}: {}", record.name);
        self.records.insert(id, record);
        Ok(id)
    }

    /// Adds a torrent from an uploaded descriptor file.
    ///
    /// Persists the raw bytes under the download root before creating the
    /// record; a failed write fails the whole call.
    ///
    /// # Errors
    /// - `TorrentError::InvalidDescriptor` - Filename lacks the `.torrent` suffix
    /// - `TorrentError::DuplicateTorrent` - Same filename was already added
    /// - `TorrentError::Io` - Descriptor bytes could not be persisted
    pub async fn add_descriptor(
        &mut self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<TorrentId, TorrentError> {
        if !filename.ends_with(".torrent") {
            return Err(TorrentError::InvalidDescriptor {
                reason: "expected a .torrent file".to_string(),
            });
        }

        let id = TorrentId::from_origin(filename);
        if self.records.contains_key(&id) {
            return Err(TorrentError::DuplicateTorrent { id });
        }

        let descriptor_path = self
            .config
            .storage
            .download_dir
            .join(materialize::sanitize_name(filename));
        fs::write(&descriptor_path, bytes).await?;

        let stripped = filename.strip_suffix(".torrent").unwrap_or(filename);
        let name = if stripped.is_empty() {
            magnet::fallback_name()
        } else {
            stripped.to_string()
        };
        let record = self.create_record(id, name, TorrentOrigin::Descriptor(descriptor_path));

        tracing::info!("Added descriptor torrent {id}: {}", record.name);
        self.records.insert(id, record);
        Ok(id)
    }

    /// Pauses a downloading torrent. Returns the display name.
    ///
    /// # Errors
    /// - `TorrentError::TorrentNotFound` - Unknown id
    /// - `TorrentError::CannotPause` - Record already completed
    pub fn pause(&mut self, id: TorrentId) -> Result<String, TorrentError> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(TorrentError::TorrentNotFound { id })?;

        if record.status == TorrentStatus::Completed {
            return Err(TorrentError::CannotPause { id });
        }

        record.status = TorrentStatus::Paused;
        tracing::info!("Paused torrent {id}: {}", record.name);
        Ok(record.name.clone())
    }

    /// Resumes a paused torrent. Returns the display name.
    ///
    /// # Errors
    /// - `TorrentError::TorrentNotFound` - Unknown id
    /// - `TorrentError::NotPaused` - Record is not currently paused
    pub fn resume(&mut self, id: TorrentId) -> Result<String, TorrentError> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(TorrentError::TorrentNotFound { id })?;

        if record.status != TorrentStatus::Paused {
            return Err(TorrentError::NotPaused { id });
        }

        record.status = TorrentStatus::Downloading;
        tracing::info!("Resumed torrent {id}: {}", record.name);
        Ok(record.name.clone())
    }

    /// Removes a torrent from the registry, optionally deleting its files.
    ///
    /// A failed directory removal aborts the call and leaves the record in
    /// place. Returns the display name.
    ///
    /// # Errors
    /// - `TorrentError::TorrentNotFound` - Unknown id
    /// - `TorrentError::Io` - Download directory could not be removed
    pub async fn remove(
        &mut self,
        id: TorrentId,
        remove_files: bool,
    ) -> Result<String, TorrentError> {
        let download_path = self
            .records
            .get(&id)
            .map(|record| record.download_path.clone())
            .ok_or(TorrentError::TorrentNotFound { id })?;

        if remove_files && download_path.exists() {
            fs::remove_dir_all(&download_path).await?;
        }

        let record = self
            .records
            .remove(&id)
            .ok_or(TorrentError::TorrentNotFound { id })?;
        tracing::info!("Removed torrent {id}: {}", record.name);
        Ok(record.name)
    }

    /// Snapshot of a single record, if present.
    pub fn record(&self, id: TorrentId) -> Option<TorrentView> {
        self.records.get(&id).map(TorrentRecord::view)
    }

    /// Snapshots of every record. Order is unspecified; adapters sort.
    pub fn views(&self) -> Vec<TorrentView> {
        self.records.values().map(TorrentRecord::view).collect()
    }

    /// Number of registered torrents.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no torrents are registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Applies one statistics step to every record.
    ///
    /// Records that complete during this pass get their placeholder files
    /// materialized immediately, exactly once.
    pub async fn update_statistics(&mut self) {
        for record in self.records.values_mut() {
            if self.source.step(record) == StepOutcome::Completed {
                record.files = materialize::write_placeholders(
                    &record.download_path,
                    &record.name,
                    &self.config.simulation,
                    &mut self.rng,
                )
                .await;
                tracing::info!(
                    "Torrent {} completed: {} ({} files)",
                    record.id,
                    record.name,
                    record.files.len()
                );
            }
        }
    }

    /// File list for a torrent; empty when the id is unknown.
    pub fn files(&self, id: TorrentId) -> Vec<FileEntry> {
        self.records
            .get(&id)
            .map(|record| record.files.clone())
            .unwrap_or_default()
    }

    /// Removes one materialized file from a record and from disk.
    ///
    /// A file already missing on disk is not an error; only the list entry
    /// goes away.
    ///
    /// # Errors
    /// - `TorrentError::TorrentNotFound` - Unknown id
    /// - `TorrentError::FileNotFound` - No file with that name on the record
    /// - `TorrentError::Io` - On-disk deletion failed
    pub async fn remove_file(&mut self, id: TorrentId, name: &str) -> Result<(), TorrentError> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(TorrentError::TorrentNotFound { id })?;

        let position = record
            .files
            .iter()
            .position(|entry| entry.name == name)
            .ok_or_else(|| TorrentError::FileNotFound {
                name: name.to_string(),
            })?;

        match fs::remove_file(&record.files[position].path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        record.files.remove(position);
        tracing::info!("Removed file {name} from torrent {id}");
        Ok(())
    }

    /// Packs a record's files into a zip archive.
    ///
    /// # Errors
    /// - `TorrentError::TorrentNotFound` - Unknown id
    /// - `TorrentError::Io` / `TorrentError::Archive` - Packaging failed
    pub fn pack_archive(&self, id: TorrentId) -> Result<Vec<u8>, TorrentError> {
        let record = self
            .records
            .get(&id)
            .ok_or(TorrentError::TorrentNotFound { id })?;
        archive::pack_files(&record.files)
    }

    fn create_record(
        &mut self,
        id: TorrentId,
        name: String,
        origin: TorrentOrigin,
    ) -> TorrentRecord {
        let (size_lo, size_hi) = self.config.simulation.total_size_mib;
        let total_size = self.rng.random_range(size_lo..=size_hi) * MIB;
        let download_path = self
            .config
            .storage
            .download_dir
            .join(materialize::sanitize_name(&name));

        TorrentRecord::new(id, name, origin, total_size, download_path)
    }
}
