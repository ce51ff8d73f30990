//! Actor implementation for the torrent manager.

use tokio::sync::mpsc;

use super::commands::ManagerCommand;
use super::handle::TorrentManagerHandle;
use super::manager::TorrentManager;
use super::simulation::ProgressSource;
use crate::config::NimbusConfig;

/// Spawns the torrent manager actor and returns its handle.
///
/// The actor processes commands sequentially on its own task, so the
/// registry never needs a lock even with many concurrent callers: the
/// periodic statistics tick and pause/remove calls on the same torrent
/// cannot interleave.
pub fn spawn_torrent_manager<S>(config: NimbusConfig, source: S) -> TorrentManagerHandle
where
    S: ProgressSource + 'static,
{
    let (sender, receiver) = mpsc::channel(100);
    let manager = TorrentManager::new(config, source);

    tokio::spawn(async move {
        run_actor_loop(manager, receiver).await;
    });

    TorrentManagerHandle::new(sender)
}

/// Runs the command processing loop until the channel closes or a
/// shutdown command arrives.
async fn run_actor_loop<S>(
    mut manager: TorrentManager<S>,
    mut receiver: mpsc::Receiver<ManagerCommand>,
) where
    S: ProgressSource + 'static,
{
    tracing::debug!("Torrent manager actor started");

    while let Some(command) = receiver.recv().await {
        if !handle_command(&mut manager, command).await {
            break;
        }
    }

    tracing::debug!("Torrent manager actor stopped");
}

/// Handles a single command. Returns false to shut the actor down.
async fn handle_command<S>(manager: &mut TorrentManager<S>, command: ManagerCommand) -> bool
where
    S: ProgressSource + 'static,
{
    match command {
        ManagerCommand::AddMagnet { link, responder } => {
            let _ = responder.send(manager.add_magnet(&link));
        }

        ManagerCommand::AddDescriptor {
            filename,
            bytes,
            responder,
        } => {
            let _ = responder.send(manager.add_descriptor(&filename, &bytes).await);
        }

        ManagerCommand::Pause { id, responder } => {
            let _ = responder.send(manager.pause(id));
        }

        ManagerCommand::Resume { id, responder } => {
            let _ = responder.send(manager.resume(id));
        }

        ManagerCommand::Remove {
            id,
            remove_files,
            responder,
        } => {
            let _ = responder.send(manager.remove(id, remove_files).await);
        }

        ManagerCommand::GetRecord { id, responder } => {
            let _ = responder.send(manager.record(id));
        }

        ManagerCommand::List { responder } => {
            let _ = responder.send(manager.views());
        }

        ManagerCommand::UpdateStatistics { responder } => {
            manager.update_statistics().await;
            let _ = responder.send(());
        }

        ManagerCommand::GetFiles { id, responder } => {
            let _ = responder.send(manager.files(id));
        }

        ManagerCommand::RemoveFile {
            id,
            name,
            responder,
        } => {
            let _ = responder.send(manager.remove_file(id, &name).await);
        }

        ManagerCommand::PackArchive { id, responder } => {
            let _ = responder.send(manager.pack_archive(id));
        }

        ManagerCommand::Shutdown { responder } => {
            let _ = responder.send(());
            return false;
        }
    }

    true
}
