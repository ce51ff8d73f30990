//! Placeholder file materialization for completed torrents.
//!
//! Runs exactly once per record, on the downloading-to-completed
//! transition. Files carry synthetic text content; their on-disk size is
//! what gets recorded. A failed directory or file write downgrades to a
//! warning and the completion stands with fewer files.

use std::path::Path;

use rand::Rng;
use tokio::fs;

use super::record::FileEntry;
use crate::config::SimulationConfig;

/// Replaces path separators so a display name cannot escape the download root.
pub fn sanitize_name(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

/// Writes 2 to 5 placeholder files into `dir` and returns their entries.
pub async fn write_placeholders<R: Rng>(
    dir: &Path,
    name: &str,
    config: &SimulationConfig,
    rng: &mut R,
) -> Vec<FileEntry> {
    if let Err(e) = fs::create_dir_all(dir).await {
        tracing::warn!(
            "Failed to create download directory {}: {e}",
            dir.display()
        );
        return Vec::new();
    }

    let (count_lo, count_hi) = config.placeholder_files;
    let count = rng.random_range(count_lo..=count_hi);
    let safe_name = sanitize_name(name);
    let mut entries = Vec::with_capacity(count);

    for index in 1..=count {
        let extension = config.placeholder_extensions
            [rng.random_range(0..config.placeholder_extensions.len())];
        let filename = format!("{safe_name}_part{index}{extension}");
        let path = dir.join(&filename);
        let content = format!(
            "Placeholder content for {filename}\n\
             Torrent: {name}\n\
             This file was produced by a simulated download.\n"
        );

        if let Err(e) = fs::write(&path, content.as_bytes()).await {
            tracing::warn!("Failed to write placeholder {}: {e}", path.display());
            continue;
        }

        let size = match fs::metadata(&path).await {
            Ok(metadata) => metadata.len(),
            Err(_) => content.len() as u64,
        };

        entries.push(FileEntry {
            name: filename,
            path,
            size,
        });
    }

    tracing::debug!(
        "Materialized {} placeholder files for {name} in {}",
        entries.len(),
        dir.display()
    );
    entries
}
