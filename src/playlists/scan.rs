use std::path::Path;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::{Result, SyncError};

use super::model::{Catalog, PlaylistFileRef};

fn is_playlist_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .playlist_extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

/// Build the catalog of playlists under `root`.
///
/// A root that is missing altogether is an error. A root that cannot be
/// read is logged and yields an empty catalog; unreadable entries below it
/// are logged and skipped.
pub fn scan(root: &Path, recursive: bool, settings: &LibrarySettings) -> Result<Catalog> {
    if !root.is_dir() {
        return Err(SyncError::MissingRoot(root.to_path_buf()));
    }

    let mut walker = WalkDir::new(root)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    // Non-recursive = only the root directory.
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut entries: Vec<PlaylistFileRef> = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let err = SyncError::ScanFailure {
                    path: e.path().unwrap_or(root).to_path_buf(),
                    reason: e.to_string(),
                };
                if e.depth() == 0 {
                    warn!(error = %err, "treating playlist directory as empty");
                    return Ok(Catalog::default());
                }
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() || !is_playlist_file(path, settings) {
            continue;
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(name = %name, path = %path.display(), "found playlist");
        entries.push(PlaylistFileRef {
            name,
            path: path.to_path_buf(),
        });
    }

    let catalog = Catalog::new(entries);
    info!(
        "Found {} playlist(s) in {}",
        catalog.len(),
        root.display()
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_playlist_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_playlist_file(Path::new("/tmp/a.m3u"), &settings));
        assert!(is_playlist_file(Path::new("/tmp/a.M3U"), &settings));
        assert!(!is_playlist_file(Path::new("/tmp/a.m3u8"), &settings));
        assert!(!is_playlist_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(!is_playlist_file(Path::new("/tmp/m3u"), &settings));
    }

    #[test]
    fn is_playlist_file_accepts_dotted_extension_settings() {
        let settings = LibrarySettings {
            playlist_extensions: vec![".m3u8".into()],
            ..LibrarySettings::default()
        };
        assert!(is_playlist_file(Path::new("/tmp/a.m3u8"), &settings));
        assert!(!is_playlist_file(Path::new("/tmp/a.m3u"), &settings));
    }
}
