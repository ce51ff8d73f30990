//! Handle for communicating with the torrent manager actor.

use tokio::sync::{mpsc, oneshot};

use super::commands::ManagerCommand;
use super::record::{FileEntry, TorrentView};
use super::{TorrentError, TorrentId};

/// Cloneable async handle to the torrent manager actor.
///
/// Every method sends one command and awaits the actor's reply. A dead
/// actor surfaces as [`TorrentError::ManagerShutdown`].
#[derive(Clone)]
pub struct TorrentManagerHandle {
    sender: mpsc::Sender<ManagerCommand>,
}

impl TorrentManagerHandle {
    /// Creates a new handle with the given command sender.
    pub fn new(sender: mpsc::Sender<ManagerCommand>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        command: ManagerCommand,
        rx: oneshot::Receiver<T>,
    ) -> Result<T, TorrentError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| TorrentError::ManagerShutdown)?;
        rx.await.map_err(|_| TorrentError::ManagerShutdown)
    }

    /// Adds a torrent from a magnet link.
    ///
    /// # Errors
    /// - `TorrentError::InvalidMagnet` - Malformed link
    /// - `TorrentError::DuplicateTorrent` - Same link already added
    pub async fn add_magnet(&self, link: &str) -> Result<TorrentId, TorrentError> {
        let (responder, rx) = oneshot::channel();
        let cmd = ManagerCommand::AddMagnet {
            link: link.to_string(),
            responder,
        };
        self.request(cmd, rx).await?
    }

    /// Adds a torrent from uploaded descriptor bytes.
    ///
    /// # Errors
    /// - `TorrentError::InvalidDescriptor` - Filename lacks the `.torrent` suffix
    /// - `TorrentError::DuplicateTorrent` - Same filename already added
    /// - `TorrentError::Io` - Descriptor could not be persisted
    pub async fn add_descriptor(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<TorrentId, TorrentError> {
        let (responder, rx) = oneshot::channel();
        let cmd = ManagerCommand::AddDescriptor {
            filename: filename.to_string(),
            bytes,
            responder,
        };
        self.request(cmd, rx).await?
    }

    /// Pauses a downloading torrent. Returns the display name.
    ///
    /// # Errors
    /// - `TorrentError::TorrentNotFound` - Unknown id
    /// - `TorrentError::CannotPause` - Record already completed
    pub async fn pause(&self, id: TorrentId) -> Result<String, TorrentError> {
        let (responder, rx) = oneshot::channel();
        self.request(ManagerCommand::Pause { id, responder }, rx)
            .await?
    }

    /// Resumes a paused torrent. Returns the display name.
    ///
    /// # Errors
    /// - `TorrentError::TorrentNotFound` - Unknown id
    /// - `TorrentError::NotPaused` - Record is not paused
    pub async fn resume(&self, id: TorrentId) -> Result<String, TorrentError> {
        let (responder, rx) = oneshot::channel();
        self.request(ManagerCommand::Resume { id, responder }, rx)
            .await?
    }

    /// Removes a torrent, optionally deleting its files. Returns the name.
    ///
    /// # Errors
    /// - `TorrentError::TorrentNotFound` - Unknown id
    /// - `TorrentError::Io` - Download directory could not be removed
    pub async fn remove(&self, id: TorrentId, remove_files: bool) -> Result<String, TorrentError> {
        let (responder, rx) = oneshot::channel();
        let cmd = ManagerCommand::Remove {
            id,
            remove_files,
            responder,
        };
        self.request(cmd, rx).await?
    }

    /// Snapshot of a single record, if present.
    ///
    /// # Errors
    /// - `TorrentError::ManagerShutdown` - Actor is gone
    pub async fn record(&self, id: TorrentId) -> Result<Option<TorrentView>, TorrentError> {
        let (responder, rx) = oneshot::channel();
        self.request(ManagerCommand::GetRecord { id, responder }, rx)
            .await
    }

    /// Snapshots of every record, in no particular order.
    ///
    /// # Errors
    /// - `TorrentError::ManagerShutdown` - Actor is gone
    pub async fn list(&self) -> Result<Vec<TorrentView>, TorrentError> {
        let (responder, rx) = oneshot::channel();
        self.request(ManagerCommand::List { responder }, rx).await
    }

    /// Applies one statistics step to every record.
    ///
    /// Intended to be driven by an external ticker; the manager never
    /// schedules itself.
    ///
    /// # Errors
    /// - `TorrentError::ManagerShutdown` - Actor is gone
    pub async fn update_statistics(&self) -> Result<(), TorrentError> {
        let (responder, rx) = oneshot::channel();
        self.request(ManagerCommand::UpdateStatistics { responder }, rx)
            .await
    }

    /// File list for a torrent; empty when the id is unknown.
    ///
    /// # Errors
    /// - `TorrentError::ManagerShutdown` - Actor is gone
    pub async fn files(&self, id: TorrentId) -> Result<Vec<FileEntry>, TorrentError> {
        let (responder, rx) = oneshot::channel();
        self.request(ManagerCommand::GetFiles { id, responder }, rx)
            .await
    }

    /// Removes one materialized file from a record and from disk.
    ///
    /// # Errors
    /// - `TorrentError::TorrentNotFound` - Unknown id
    /// - `TorrentError::FileNotFound` - No such file on the record
    pub async fn remove_file(&self, id: TorrentId, name: &str) -> Result<(), TorrentError> {
        let (responder, rx) = oneshot::channel();
        let cmd = ManagerCommand::RemoveFile {
            id,
            name: name.to_string(),
            responder,
        };
        self.request(cmd, rx).await?
    }

    /// Packs a record's files into a zip archive.
    ///
    /// # Errors
    /// - `TorrentError::TorrentNotFound` - Unknown id
    /// - `TorrentError::Archive` / `TorrentError::Io` - Packaging failed
    pub async fn pack_archive(&self, id: TorrentId) -> Result<Vec<u8>, TorrentError> {
        let (responder, rx) = oneshot::channel();
        self.request(ManagerCommand::PackArchive { id, responder }, rx)
            .await?
    }

    /// Shuts the actor down gracefully.
    ///
    /// # Errors
    /// - `TorrentError::ManagerShutdown` - Actor was already gone
    pub async fn shutdown(&self) -> Result<(), TorrentError> {
        let (responder, rx) = oneshot::channel();
        self.request(ManagerCommand::Shutdown { responder }, rx)
            .await
    }
}
