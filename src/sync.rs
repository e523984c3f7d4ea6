//! The sync engine: one call per job, in either source or sink mode.
//!
//! Both modes start by scanning the playlist directory. Source mode then
//! filters the catalog by name and reads every selected playlist into an
//! [`AbstractPlaylist`]. Sink mode snapshots the directory and writes the
//! incoming playlists over it.

use std::path::PathBuf;

use tracing::{debug, info, info_span};

use crate::backup::BackupManager;
use crate::config::{JobSettings, LibrarySettings, PathSettings};
use crate::error::Result;
use crate::metadata::{LoftyExtractor, TagExtractor};
use crate::paths::PathTranslator;
use crate::playlists::{self, AbstractPlaylist, Catalog};

mod read;
mod write;

pub use read::playlist_entries;
pub use write::sanitize_name;

#[derive(Debug, Clone)]
pub enum Mode {
    /// Read local playlists for the orchestrator.
    Source,
    /// Write the given playlists to the local directory.
    Sink(Vec<AbstractPlaylist>),
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Source => "source",
            Mode::Sink(_) => "sink",
        }
    }
}

/// Everything about a job that does not come from its settings.
#[derive(Debug, Clone)]
pub struct JobContext {
    pub mode: Mode,
    pub job_id: String,
    /// Backups go under `<config_root>/m3usync/backups/<job_id>`.
    pub config_root: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobOutput {
    Playlists(Vec<AbstractPlaylist>),
    /// Number of playlist files written.
    Written(usize),
}

pub struct Engine<E = LoftyExtractor> {
    translator: PathTranslator,
    library: LibrarySettings,
    extractor: E,
}

impl Engine<LoftyExtractor> {
    pub fn new(paths: &PathSettings, library: LibrarySettings) -> Self {
        Self::with_extractor(paths, library, LoftyExtractor)
    }
}

impl<E: TagExtractor> Engine<E> {
    pub fn with_extractor(paths: &PathSettings, library: LibrarySettings, extractor: E) -> Self {
        Self {
            translator: PathTranslator::from_settings(paths),
            library,
            extractor,
        }
    }

    pub fn translator(&self) -> &PathTranslator {
        &self.translator
    }

    pub fn run(&self, job: &JobSettings, ctx: JobContext) -> Result<JobOutput> {
        let _span = info_span!("job", id = %ctx.job_id, mode = ctx.mode.name()).entered();
        let root = job.dir.as_path();

        if self.translator.converts_separators() {
            debug!("orchestrator paths and local playlist paths do not use the same separators");
        }

        let catalog = playlists::scan(root, job.recursive.enabled(), &self.library)?;

        match ctx.mode {
            Mode::Source => {
                let selected = select(&catalog, &job.filter)?;
                info!("{} playlist(s) match supplied filter", selected.len());
                Ok(JobOutput::Playlists(self.read_playlists(&selected)))
            }
            Mode::Sink(incoming) => {
                BackupManager::new(&ctx.config_root, &ctx.job_id, job.retention).run(root)?;
                let written = self.write_playlists(root, catalog, &incoming)?;
                Ok(JobOutput::Written(written))
            }
        }
    }
}

fn select(catalog: &Catalog, pattern: &str) -> Result<Catalog> {
    let names = playlists::filter_names(catalog.names(), pattern)?;
    Ok(catalog.retain_names(&names))
}
