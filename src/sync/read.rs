use std::fs;
use std::path::Path;

use tracing::{error, info, warn};

use crate::error::{Result, SyncError};
use crate::metadata::TagExtractor;
use crate::playlists::{AbstractPlaylist, Catalog, PlaylistFileRef, SongRecord};

use super::Engine;

/// Song entries of a playlist file: every line that is neither blank nor a
/// `#` comment/directive.
pub fn playlist_entries(text: &str) -> impl Iterator<Item = &str> {
    text.trim_start_matches('\u{feff}')
        .lines()
        .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
}

impl<E: TagExtractor> Engine<E> {
    /// Read every playlist in `catalog`. Playlists that cannot be read are
    /// logged and left out.
    pub fn read_playlists(&self, catalog: &Catalog) -> Vec<AbstractPlaylist> {
        catalog
            .iter()
            .filter_map(|entry| match self.read_playlist(entry) {
                Ok(playlist) => Some(playlist),
                Err(e) => {
                    error!(error = %e, "skipping playlist {}", entry.name);
                    None
                }
            })
            .collect()
    }

    pub fn read_playlist(&self, entry: &PlaylistFileRef) -> Result<AbstractPlaylist> {
        let text = fs::read_to_string(&entry.path).map_err(|source| SyncError::PlaylistRead {
            path: entry.path.clone(),
            source,
        })?;

        info!("Processing playlist: {}", entry.name);
        let mut playlist = AbstractPlaylist::new(&entry.name);

        for line in playlist_entries(&text) {
            match self.read_song(line) {
                Ok(song) => playlist.songs.push(song),
                Err(SyncError::MissingSourceFile(path)) => {
                    warn!("{} does not exist! Skipping this song.", path.display());
                }
                Err(SyncError::UnsupportedFormat(path)) => {
                    warn!("The file {} is not a supported filetype", path.display());
                }
                Err(e) => {
                    error!(error = %e, "Could not load tags from song: {line}");
                }
            }
        }

        info!(
            "Read {} song(s) from playlist {}",
            playlist.songs.len(),
            entry.name
        );
        Ok(playlist)
    }

    fn read_song(&self, line: &str) -> Result<SongRecord> {
        let location = self.translator.to_orchestrator(line);
        let path = Path::new(&location);
        if !path.is_file() {
            return Err(SyncError::MissingSourceFile(path.to_path_buf()));
        }

        let mut song = self.extractor.extract(path)?;
        song.location = Some(location);
        Ok(song)
    }
}
