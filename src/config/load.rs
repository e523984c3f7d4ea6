use std::{
    env,
    path::{Path, PathBuf},
};

use super::schema::Settings;
use crate::error::{Result, SyncError};

/// Layered loading: struct defaults, then the config file (if present), then
/// `M3USYNC__SECTION__KEY` environment variables. CLI flags are applied last
/// by the binary.
impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(resolve_config_path().as_deref())
    }

    /// Load with an explicit config file; a missing file is not an error.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(::config::File::from(path).required(false));
        }

        builder
            .add_source(
                ::config::Environment::with_prefix("M3USYNC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| SyncError::Config(e.to_string()))
    }

    /// A job needs a playlist directory and at least one playlist extension.
    pub fn validate(&self) -> Result<()> {
        if self.job.dir.as_os_str().is_empty() {
            return Err(SyncError::Config(
                "job.dir must be set to the playlist directory".to_string(),
            ));
        }
        if !self
            .library
            .playlist_extensions
            .iter()
            .any(|e| !e.trim().trim_start_matches('.').is_empty())
        {
            return Err(SyncError::Config(
                "library.playlist_extensions must name at least one extension".to_string(),
            ));
        }
        Ok(())
    }

    /// Directory backups are nested under, if one can be determined.
    pub fn config_root(&self) -> Option<PathBuf> {
        self.backup.config_root.clone().or_else(config_home)
    }
}

/// `M3USYNC_CONFIG_PATH` when set and non-empty, else the XDG default.
pub fn resolve_config_path() -> Option<PathBuf> {
    match env::var_os("M3USYNC_CONFIG_PATH") {
        Some(p) if !p.is_empty() => Some(PathBuf::from(p)),
        _ => default_config_path(),
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    config_home().map(|d| d.join(crate::APP_NAME).join("config.toml"))
}

/// `$XDG_CONFIG_HOME`, or `~/.config`.
pub fn config_home() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .filter(|x| !x.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
}
