use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A playlist file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistFileRef {
    /// File name without its extension.
    pub name: String,
    pub path: PathBuf,
}

/// Playlists found during a scan, ordered by name.
///
/// Several files can share a name when scanning recursively; lookups return
/// the first one.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<PlaylistFileRef>,
}

impl Catalog {
    pub fn new(mut entries: Vec<PlaylistFileRef>) -> Self {
        entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlaylistFileRef> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn find(&self, name: &str) -> Option<&PlaylistFileRef> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Record a playlist created during this job. Existing entries keep
    /// precedence for lookups.
    pub fn push(&mut self, entry: PlaylistFileRef) {
        self.entries.push(entry);
    }

    /// Keep only entries whose name appears in `names`.
    pub fn retain_names(&self, names: &[String]) -> Catalog {
        Catalog {
            entries: self
                .entries
                .iter()
                .filter(|e| names.iter().any(|n| n == &e.name))
                .cloned()
                .collect(),
        }
    }
}

/// One song of an abstract playlist: its orchestrator-side location plus
/// whatever tag fields were extracted for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(flatten)]
    pub tags: BTreeMap<String, Value>,
}

impl SongRecord {
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            tags: BTreeMap::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn tag(&self, key: &str) -> Option<&Value> {
        self.tags.get(key)
    }
}

/// Filesystem-agnostic playlist exchanged with the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbstractPlaylist {
    pub name: String,
    /// Orchestrator-owned identifiers, passed through untouched.
    #[serde(default)]
    pub id: Map<String, Value>,
    #[serde(default)]
    pub songs: Vec<SongRecord>,
}

impl AbstractPlaylist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.songs.iter().filter_map(|s| s.location.as_deref())
    }
}
