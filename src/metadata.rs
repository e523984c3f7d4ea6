//! Tag extraction for songs referenced by playlists.
//!
//! Uses lofty to read whatever tag the file carries (ID3v2, Vorbis comments,
//! MP4 atoms, ...). Unknown file types are reported separately from files
//! that lofty recognises but cannot read.

use std::path::Path;

use lofty::error::ErrorKind;
use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use tracing::debug;

use crate::error::{Result, SyncError};
use crate::playlists::SongRecord;

/// Turns an audio file into a [`SongRecord`].
pub trait TagExtractor {
    fn extract(&self, path: &Path) -> Result<SongRecord>;
}

impl<F> TagExtractor for F
where
    F: Fn(&Path) -> Result<SongRecord>,
{
    fn extract(&self, path: &Path) -> Result<SongRecord> {
        self(path)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyExtractor;

impl TagExtractor for LoftyExtractor {
    fn extract(&self, path: &Path) -> Result<SongRecord> {
        let tagged = Probe::open(path)
            .and_then(|probe| probe.read())
            .map_err(|e| match e.kind() {
                ErrorKind::UnknownFormat => SyncError::UnsupportedFormat(path.to_path_buf()),
                _ => SyncError::ExtractionFailure {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                },
            })?;

        let mut song = SongRecord::at(path.to_string_lossy());
        song = song.with_tag("duration", tagged.properties().duration().as_secs());

        let fallback_title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
            debug!("No tags found in {}", path.display());
            return Ok(song.with_tag("title", fallback_title));
        };

        let title = tag
            .title()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(fallback_title);
        song = song.with_tag("title", title);

        let text_fields = [
            ("artist", tag.artist()),
            ("album", tag.album()),
            ("genre", tag.genre()),
        ];
        for (key, value) in text_fields {
            if let Some(v) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
                song = song.with_tag(key, v);
            }
        }
        if let Some(n) = tag.track() {
            song = song.with_tag("track", n);
        }
        if let Some(n) = tag.disk() {
            song = song.with_tag("disc", n);
        }

        Ok(song)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn unknown_extension_is_unsupported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"not audio").unwrap();

        let err = LoftyExtractor.extract(&path).unwrap_err();
        assert!(matches!(err, SyncError::UnsupportedFormat(p) if p == path));
    }

    #[test]
    fn corrupt_audio_is_an_extraction_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.flac");
        fs::write(&path, b"not a real flac").unwrap();

        let err = LoftyExtractor.extract(&path).unwrap_err();
        assert!(err.is_recoverable());
        assert!(!matches!(err, SyncError::MissingRoot(_)));
    }

    #[test]
    fn closures_can_stand_in_for_extractors() {
        let stub = |p: &Path| -> Result<SongRecord> {
            Ok(SongRecord::at(p.to_string_lossy()).with_tag("title", "stub"))
        };
        let song = stub.extract(Path::new("/a.mp3")).unwrap();
        assert_eq!(song.location.as_deref(), Some("/a.mp3"));
        assert_eq!(song.tag("title"), Some(&serde_json::json!("stub")));
    }
}
