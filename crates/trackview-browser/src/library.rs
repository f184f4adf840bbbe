//! Collection scanning
//!
//! Walks a music folder and turns every supported audio file into a
//! [`TrackEntry`]. File names of the form `Artist - Title.ext` are split
//! into artist and title.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use walkdir::WalkDir;

use trackview_core::playlist::is_supported_location;
use trackview_core::{TrackEntry, TrackId};

/// Scan `root` recursively for audio files, sorted by path
pub fn scan_collection(root: &Path) -> Result<Vec<TrackEntry>> {
    if !root.is_dir() {
        bail!("collection folder {:?} does not exist", root);
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("scan_collection: skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_supported_location(&p.to_string_lossy()))
        .collect();
    paths.sort();

    let entries: Vec<TrackEntry> = paths
        .iter()
        .enumerate()
        .map(|(i, path)| entry_for_path(TrackId(i as u64 + 1), path))
        .collect();

    log::info!("scan_collection: {} tracks in {:?}", entries.len(), root);
    Ok(entries)
}

/// Track entry for an audio file
pub fn entry_for_path(id: TrackId, path: &Path) -> TrackEntry {
    let entry = TrackEntry::from_location(id, path.to_string_lossy());
    let album = path
        .parent()
        .and_then(|dir| dir.file_name())
        .map(|name| name.to_string_lossy().into_owned());

    let entry = match entry.title.split_once(" - ") {
        Some((artist, title)) if !artist.trim().is_empty() && !title.trim().is_empty() => {
            let (artist, title) = (artist.trim().to_string(), title.trim().to_string());
            TrackEntry { title, ..entry }.with_artist(artist)
        }
        _ => entry,
    };
    match album {
        Some(album) => entry.with_album(album),
        None => entry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_collection_filters_and_orders() {
        let dir = tempfile::tempdir().unwrap();
        let album = dir.path().join("Homework");
        fs::create_dir(&album).unwrap();
        fs::write(album.join("Daft Punk - Da Funk.flac"), b"").unwrap();
        fs::write(album.join("Daft Punk - Around the World.mp3"), b"").unwrap();
        fs::write(album.join("cover.jpg"), b"").unwrap();
        fs::write(dir.path().join("loose.wav"), b"").unwrap();

        let entries = scan_collection(dir.path()).unwrap();
        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Around the World", "Da Funk", "loose"]);
        assert_eq!(entries[0].artist.as_deref(), Some("Daft Punk"));
        assert_eq!(entries[0].album.as_deref(), Some("Homework"));
        assert_eq!(entries[2].artist, None);
        assert_eq!(
            entries.iter().map(|e| e.id.0).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_scan_missing_folder_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_collection(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_entry_without_artist_separator() {
        let entry = entry_for_path(TrackId(7), Path::new("/music/ - untitled.ogg"));
        assert_eq!(entry.title, " - untitled");
        assert_eq!(entry.artist, None);
    }
}
