use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/m3usync/config.toml` or `~/.config/m3usync/config.toml`
///
/// Precedence (highest wins):
/// 1) Command line flags
/// 2) Environment variables (prefix `M3USYNC__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub job: JobSettings,
    pub paths: PathSettings,
    pub library: LibrarySettings,
    pub backup: BackupSettings,
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            job: JobSettings::default(),
            paths: PathSettings::default(),
            library: LibrarySettings::default(),
            backup: BackupSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Per-job settings, as handed over by the orchestrator.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct JobSettings {
    /// Directory holding the playlist files.
    pub dir: PathBuf,
    /// Whether subdirectories are searched for playlists too.
    pub recursive: Recursive,
    /// Regex-style playlist name filter (source mode). Empty selects everything.
    pub filter: String,
    /// How many playlist directory snapshots to keep (sink mode).
    pub retention: Retention,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Recursive {
    #[serde(rename = "Yes", alias = "yes")]
    Yes,
    #[default]
    #[serde(rename = "No", alias = "no")]
    No,
}

impl Recursive {
    pub fn enabled(self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl FromStr for Recursive {
    type Err = String;

    /// Accepts the labels ("Yes"/"No") as well as booleans.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" => Ok(Self::Yes),
            "no" | "false" => Ok(Self::No),
            other => Err(format!("unknown recursive option '{other}', expected Yes or No")),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Retention {
    #[default]
    #[serde(rename = "No Backups", alias = "none")]
    NoBackups,
    #[serde(rename = "3 Backups")]
    Three,
    #[serde(rename = "5 Backups")]
    Five,
    #[serde(rename = "10 Backups")]
    Ten,
}

impl Retention {
    /// Number of snapshots kept after pruning.
    pub fn limit(self) -> usize {
        match self {
            Self::NoBackups => 0,
            Self::Three => 3,
            Self::Five => 5,
            Self::Ten => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NoBackups => "No Backups",
            Self::Three => "3 Backups",
            Self::Five => "5 Backups",
            Self::Ten => "10 Backups",
        }
    }
}

impl fmt::Display for Retention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Retention {
    type Err = String;

    /// Accepts the labels ("3 Backups") as well as bare counts ("3").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "no backups" | "none" | "0" => Ok(Self::NoBackups),
            "3 backups" | "3" => Ok(Self::Three),
            "5 backups" | "5" => Ok(Self::Five),
            "10 backups" | "10" => Ok(Self::Ten),
            other => Err(format!(
                "unknown retention '{other}', expected one of: No Backups, 3 Backups, 5 Backups, 10 Backups"
            )),
        }
    }
}

/// Prefixes for the two path conventions.
///
/// Each prefix is the longest path common to all audio files on that side,
/// e.g. `D:/Music` inside the playlists and `/mnt/music` on this machine.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PathSettings {
    pub local_prefix: String,
    pub orchestrator_prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as playlists (case-insensitive, without dot).
    pub playlist_extensions: Vec<String>,
    /// Whether to descend into symlinked directories during scanning.
    pub follow_links: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            playlist_extensions: vec!["m3u".into()],
            follow_links: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BackupSettings {
    /// Root under which `m3usync/backups/<job>` is created.
    /// Falls back to the XDG config home when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` wins when set.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
