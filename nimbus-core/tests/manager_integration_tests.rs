//! Integration tests for the torrent manager.
//!
//! These tests drive the complete simulated lifecycle through the public
//! TorrentManagerHandle API: adding, ticking statistics to completion,
//! file materialization, archive packaging, and removal.

use std::io::Cursor;

use nimbus_core::config::{NimbusConfig, SimulationConfig, StorageConfig};
use nimbus_core::torrent::{
    RandomWalkSource, TorrentError, TorrentId, TorrentManagerHandle, TorrentStatus,
    spawn_torrent_manager,
};
use tempfile::TempDir;

const MAGNET: &str = "magnet:?xt=urn:btih:ABC&dn=My+Movie";

/// Test fixture holding a spawned manager and its scratch download root.
struct ManagerTestFixture {
    handle: TorrentManagerHandle,
    root: TempDir,
}

impl ManagerTestFixture {
    /// Creates a fixture with a deterministic simulation seed.
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let config = NimbusConfig {
            storage: StorageConfig {
                download_dir: root.path().to_path_buf(),
            },
            simulation: SimulationConfig::deterministic_testing(),
            ..NimbusConfig::default()
        };
        let source = RandomWalkSource::new(config.simulation.clone());
        let handle = spawn_torrent_manager(config, source);

        Self { handle, root }
    }

    /// Ticks statistics until the torrent completes.
    ///
    /// The minimum progress step is 0.5 percent, so 300 ticks is a safe
    /// upper bound.
    async fn run_to_completion(&self, id: TorrentId) {
        for _ in 0..300 {
            self.handle.update_statistics().await.unwrap();
            let view = self.handle.record(id).await.unwrap().unwrap();
            if view.status == TorrentStatus::Completed {
                return;
            }
        }
        panic!("torrent did not complete within 300 ticks");
    }
}

#[tokio::test]
async fn test_complete_simulated_lifecycle() {
    let fixture = ManagerTestFixture::new();

    let id = fixture.handle.add_magnet(MAGNET).await.unwrap();
    let view = fixture.handle.record(id).await.unwrap().unwrap();
    assert_eq!(view.name, "My Movie");
    assert_eq!(view.status, TorrentStatus::Downloading);
    assert_eq!(view.progress, 0.0);

    fixture.run_to_completion(id).await;

    let completed = fixture.handle.record(id).await.unwrap().unwrap();
    assert_eq!(completed.progress, 100.0);
    assert_eq!(completed.downloaded, completed.total_size);
    assert_eq!(completed.download_speed, 0.0);
    assert_eq!(completed.eta.as_deref(), Some("0:00:00"));
    assert!((2..=5).contains(&completed.files.len()));

    let download_path = fixture.root.path().join("My Movie");
    assert!(download_path.exists());

    let name = fixture.handle.remove(id, true).await.unwrap();
    assert_eq!(name, "My Movie");
    assert!(fixture.handle.record(id).await.unwrap().is_none());
    assert!(!download_path.exists());
}

#[tokio::test]
async fn test_progress_is_monotone_across_ticks() {
    let fixture = ManagerTestFixture::new();
    let id = fixture.handle.add_magnet(MAGNET).await.unwrap();

    let mut previous = 0.0;
    for _ in 0..25 {
        fixture.handle.update_statistics().await.unwrap();
        let view = fixture.handle.record(id).await.unwrap().unwrap();
        assert!(view.progress >= previous);
        assert!(view.downloaded <= view.total_size);
        previous = view.progress;
        if view.status == TorrentStatus::Completed {
            break;
        }
    }
}

#[tokio::test]
async fn test_duplicate_add_leaves_registry_unchanged() {
    let fixture = ManagerTestFixture::new();

    fixture.handle.add_magnet(MAGNET).await.unwrap();
    let result = fixture.handle.add_magnet(MAGNET).await;

    assert!(matches!(result, Err(TorrentError::DuplicateTorrent { .. })));
    assert_eq!(fixture.handle.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_magnet_creates_no_record() {
    let fixture = ManagerTestFixture::new();

    let result = fixture.handle.add_magnet("not-a-magnet").await;

    assert!(matches!(result, Err(TorrentError::InvalidMagnet { .. })));
    assert!(fixture.handle.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_pause_zeroes_speeds_on_next_tick() {
    let fixture = ManagerTestFixture::new();
    let id = fixture.handle.add_magnet(MAGNET).await.unwrap();

    fixture.handle.update_statistics().await.unwrap();
    let running = fixture.handle.record(id).await.unwrap().unwrap();
    assert!(running.download_speed > 0.0);

    fixture.handle.pause(id).await.unwrap();
    fixture.handle.update_statistics().await.unwrap();

    let paused = fixture.handle.record(id).await.unwrap().unwrap();
    assert_eq!(paused.status, TorrentStatus::Paused);
    assert_eq!(paused.download_speed, 0.0);
    assert_eq!(paused.upload_speed, 0.0);
    assert_eq!(paused.eta, None);
    assert_eq!(paused.progress, running.progress);

    fixture.handle.resume(id).await.unwrap();
    let resumed = fixture.handle.record(id).await.unwrap().unwrap();
    assert_eq!(resumed.status, TorrentStatus::Downloading);
}

#[tokio::test]
async fn test_pause_on_completed_torrent_is_rejected() {
    let fixture = ManagerTestFixture::new();
    let id = fixture.handle.add_magnet(MAGNET).await.unwrap();
    fixture.run_to_completion(id).await;

    let result = fixture.handle.pause(id).await;

    assert!(matches!(result, Err(TorrentError::CannotPause { .. })));
    let view = fixture.handle.record(id).await.unwrap().unwrap();
    assert_eq!(view.status, TorrentStatus::Completed);
}

#[tokio::test]
async fn test_archive_contains_one_entry_per_existing_file() {
    let fixture = ManagerTestFixture::new();
    let id = fixture.handle.add_magnet(MAGNET).await.unwrap();
    fixture.run_to_completion(id).await;

    let files = fixture.handle.files(id).await.unwrap();
    let bytes = fixture.handle.pack_archive(id).await.unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), files.len());

    // Dropping one file from disk shrinks the archive without failing it.
    std::fs::remove_file(&files[0].path).unwrap();
    let bytes = fixture.handle.pack_archive(id).await.unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), files.len() - 1);
}

#[tokio::test]
async fn test_descriptor_upload_lifecycle() {
    let fixture = ManagerTestFixture::new();

    let id = fixture
        .handle
        .add_descriptor("linux-iso.torrent", b"d8:announce0:e".to_vec())
        .await
        .unwrap();

    let view = fixture.handle.record(id).await.unwrap().unwrap();
    assert_eq!(view.name, "linux-iso");
    assert!(fixture.root.path().join("linux-iso.torrent").exists());

    let result = fixture.handle.add_descriptor("notes.txt", b"x".to_vec()).await;
    assert!(matches!(
        result,
        Err(TorrentError::InvalidDescriptor { .. })
    ));
}

#[tokio::test]
async fn test_shutdown_stops_the_actor() {
    let fixture = ManagerTestFixture::new();

    fixture.handle.shutdown().await.unwrap();

    let result = fixture.handle.add_magnet(MAGNET).await;
    assert!(matches!(result, Err(TorrentError::ManagerShutdown)));
}
