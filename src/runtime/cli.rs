use std::path::PathBuf;

use clap::{Parser, Subcommand};
use m3usync::config::{Recursive, Retention, Settings};

/// m3usync - keep local .m3u playlists in sync with an orchestrator
///
/// Playlists are exchanged as JSON: an array of
/// `{ "name", "id", "songs": [ { "location", ...tags } ] }`.
#[derive(Parser, Debug)]
#[command(name = "m3usync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Playlist directory
    #[arg(short, long, global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Search subdirectories for playlists too: "Yes" or "No"
    #[arg(short, long, global = true, value_name = "YES|NO")]
    pub recursive: Option<Recursive>,

    /// Only read playlists whose name matches this regex (case-insensitive)
    #[arg(short, long, global = true, value_name = "REGEX")]
    pub filter: Option<String>,

    /// Snapshots to keep: "No Backups", "3 Backups", "5 Backups" or "10 Backups"
    #[arg(long, global = true, value_name = "N")]
    pub retention: Option<Retention>,

    /// Job identifier; backups are kept per job
    #[arg(long, global = true, default_value = "default")]
    pub job_id: String,

    /// Root directory for backups (defaults to the XDG config home)
    #[arg(long, global = true, value_name = "DIR", env = "M3USYNC_CONFIG_ROOT")]
    pub config_root: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read local playlists and print them as JSON
    Source {
        /// Write the JSON here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Write JSON playlists to the local playlist directory
    Sink {
        /// Read the JSON from here instead of stdin
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Print the effective settings as TOML
    Config,
}

impl Cli {
    /// Apply command line overrides on top of loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(dir) = &self.dir {
            settings.job.dir = dir.clone();
        }
        if let Some(recursive) = self.recursive {
            settings.job.recursive = recursive;
        }
        if let Some(filter) = &self.filter {
            settings.job.filter = filter.clone();
        }
        if let Some(retention) = self.retention {
            settings.job.retention = retention;
        }
        if let Some(root) = &self.config_root {
            settings.backup.config_root = Some(root.clone());
        }
    }

    /// Log filter directive derived from the flags, if they ask for one.
    pub fn log_level(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}
