//! Command definitions for the torrent manager actor.

use tokio::sync::oneshot;

use super::record::{FileEntry, TorrentView};
use super::{TorrentError, TorrentId};

/// Commands the torrent manager actor processes.
///
/// Each command carries a response channel the actor answers on. Routing
/// every operation through one command queue keeps the registry free of
/// shared-state locks: operations are applied strictly one at a time.
pub enum ManagerCommand {
    /// Add a torrent from a magnet link.
    AddMagnet {
        link: String,
        responder: oneshot::Sender<Result<TorrentId, TorrentError>>,
    },
    /// Add a torrent from uploaded descriptor bytes.
    AddDescriptor {
        filename: String,
        bytes: Vec<u8>,
        responder: oneshot::Sender<Result<TorrentId, TorrentError>>,
    },
    /// Pause a downloading torrent.
    Pause {
        id: TorrentId,
        responder: oneshot::Sender<Result<String, TorrentError>>,
    },
    /// Resume a paused torrent.
    Resume {
        id: TorrentId,
        responder: oneshot::Sender<Result<String, TorrentError>>,
    },
    /// Remove a torrent, optionally deleting its files on disk.
    Remove {
        id: TorrentId,
        remove_files: bool,
        responder: oneshot::Sender<Result<String, TorrentError>>,
    },
    /// Snapshot a single record.
    GetRecord {
        id: TorrentId,
        responder: oneshot::Sender<Option<TorrentView>>,
    },
    /// Snapshot every record.
    List {
        responder: oneshot::Sender<Vec<TorrentView>>,
    },
    /// Apply one statistics step to every record.
    UpdateStatistics { responder: oneshot::Sender<()> },
    /// File list for a torrent.
    GetFiles {
        id: TorrentId,
        responder: oneshot::Sender<Vec<FileEntry>>,
    },
    /// Remove one materialized file from a record and from disk.
    RemoveFile {
        id: TorrentId,
        name: String,
        responder: oneshot::Sender<Result<(), TorrentError>>,
    },
    /// Pack a record's files into a zip archive.
    PackArchive {
        id: TorrentId,
        responder: oneshot::Sender<Result<Vec<u8>, TorrentError>>,
    },
    /// Shut the actor down gracefully.
    Shutdown { responder: oneshot::Sender<()> },
}
