use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, SyncError};
use crate::metadata::TagExtractor;
use crate::playlists::{AbstractPlaylist, Catalog, PlaylistFileRef};

use super::Engine;

const ILLEGAL_NAME_CHARS: [char; 8] = ['\\', '/', ':', '*', '?', '|', '<', '>'];

/// Strip characters that cannot appear in a file name, along with any
/// spaces directly following them ("AC/DC: Live" -> "ACDCLive").
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut after_illegal = false;
    for c in name.chars() {
        if ILLEGAL_NAME_CHARS.contains(&c) {
            after_illegal = true;
            continue;
        }
        if c == ' ' && after_illegal {
            continue;
        }
        after_illegal = false;
        out.push(c);
    }
    out
}

impl<E: TagExtractor> Engine<E> {
    /// Write `playlists` into `root`, replacing any playlist of the same name
    /// found in `catalog` and creating the rest. Returns how many files were
    /// written.
    pub fn write_playlists(
        &self,
        root: &Path,
        mut catalog: Catalog,
        playlists: &[AbstractPlaylist],
    ) -> Result<usize> {
        let mut written = 0;

        for playlist in playlists {
            let name = sanitize_name(&playlist.name);
            if name.trim().is_empty() {
                warn!("Playlist name {:?} has no usable characters, skipping", playlist.name);
                continue;
            }

            let target = match catalog.find(&name) {
                Some(existing) => {
                    debug!("Updating existing playlist {}", existing.path.display());
                    existing.path.clone()
                }
                None => {
                    let path = root.join(format!("{name}.{}", self.new_playlist_extension()));
                    debug!("Creating new playlist {}", path.display());
                    catalog.push(PlaylistFileRef {
                        name: name.clone(),
                        path: path.clone(),
                    });
                    path
                }
            };

            let contents = self.render(playlist);
            replace_file(&target, &contents)?;
            info!("Wrote playlist {} to {}", name, target.display());
            written += 1;
        }

        Ok(written)
    }

    /// Playlist file contents: one local-convention path per song, each
    /// terminated by a newline. Songs without a location are left out.
    fn render(&self, playlist: &AbstractPlaylist) -> String {
        let mut out = String::new();
        for song in &playlist.songs {
            let Some(location) = song.location.as_deref() else {
                debug!("Song without location in {}, skipping", playlist.name);
                continue;
            };
            out.push_str(&self.translator.to_local(location));
            out.push('\n');
        }
        out
    }

    fn new_playlist_extension(&self) -> String {
        self.library
            .playlist_extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.'))
            .find(|e| !e.is_empty())
            .unwrap_or("m3u")
            .to_string()
    }
}

/// Write `contents` next to `path` and rename it into place. A symlinked
/// playlist is replaced at the file it points to, leaving the link intact.
fn replace_file(path: &Path, contents: &str) -> Result<()> {
    let target = resolve_link(path)?;
    let tmp = temp_sibling(&target);
    if let Err(e) = fs::write(&tmp, contents) {
        let _ = fs::remove_file(&tmp);
        return Err(SyncError::write(path, e));
    }
    fs::rename(&tmp, &target).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        SyncError::write(path, e)
    })
}

fn resolve_link(path: &Path) -> Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::canonicalize(path).map_err(|e| SyncError::write(path, e))
        }
        _ => Ok(path.to_path_buf()),
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{file_name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_illegal_chars_and_following_spaces() {
        assert_eq!(sanitize_name("AC/DC: Live?"), "ACDCLive");
        assert_eq!(sanitize_name("a :b"), "a b");
        assert_eq!(sanitize_name("a: :b"), "ab");
        assert_eq!(sanitize_name("Best <of> 2020"), "Best of2020");
        assert_eq!(sanitize_name("Plain name"), "Plain name");
    }

    #[test]
    fn temp_sibling_is_hidden_next_to_target() {
        assert_eq!(
            temp_sibling(Path::new("/p/Jazz.m3u")),
            PathBuf::from("/p/.Jazz.m3u.tmp")
        );
    }
}
