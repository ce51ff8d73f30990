//! Archive packaging for a record's materialized files.
//!
//! Produces a single deflate zip with each file under its bare name.
//! Entries whose on-disk path has disappeared are skipped silently.

use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::write::FileOptions;

use super::TorrentError;
use super::record::FileEntry;

/// Packs the listed files into an in-memory zip archive.
///
/// # Errors
/// - `TorrentError::Io` - A listed file exists but could not be read
/// - `TorrentError::Archive` - The zip writer rejected an entry
pub fn pack_files(files: &[FileEntry]) -> Result<Vec<u8>, TorrentError> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in files {
        if !entry.path.exists() {
            continue;
        }
        let bytes = std::fs::read(&entry.path)?;
        writer
            .start_file(entry.name.as_str(), options)
            .map_err(|e| TorrentError::Archive {
                reason: e.to_string(),
            })?;
        writer.write_all(&bytes)?;
    }

    let cursor = writer.finish().map_err(|e| TorrentError::Archive {
        reason: e.to_string(),
    })?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_entry(dir: &std::path::Path, name: &str, content: &str) -> FileEntry {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        FileEntry {
            name: name.to_string(),
            path,
            size: content.len() as u64,
        }
    }

    #[test]
    fn test_archive_contains_every_existing_file_by_bare_name() {
        let dir = tempfile::tempdir().unwrap();
        let entries = vec![
            write_entry(dir.path(), "movie_part1.mp4", "first"),
            write_entry(dir.path(), "movie_part2.txt", "second"),
        ];

        let bytes = pack_files(&entries).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

        assert_eq!(archive.len(), 2);
        assert!(archive.by_name("movie_part1.mp4").is_ok());
        assert!(archive.by_name("movie_part2.txt").is_ok());
    }

    #[test]
    fn test_missing_file_is_skipped_silently() {
        let dir = tempfile::tempdir().unwrap();
        let entries = vec![
            write_entry(dir.path(), "kept.txt", "kept"),
            write_entry(dir.path(), "gone.txt", "gone"),
        ];
        std::fs::remove_file(&entries[1].path).unwrap();

        let bytes = pack_files(&entries).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_empty_file_list_still_produces_an_archive() {
        let bytes = pack_files(&[]).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
