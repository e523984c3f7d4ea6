use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use m3usync::config::Settings;
use m3usync::playlists::AbstractPlaylist;
use m3usync::{Engine, JobContext, JobOutput, Mode, SyncError};
use tracing::info;

mod cli;
mod logging;
mod settings;

use cli::{Cli, Command};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut settings = settings::load_settings();
    cli.apply(&mut settings);
    logging::init_logging(cli.log_level().unwrap_or(settings.logging.level.as_str()));

    match &cli.command {
        Command::Config => {
            print!("{}", toml::to_string_pretty(&settings)?);
        }
        Command::Source { output } => {
            let engine = prepare(&settings)?;
            let ctx = JobContext {
                mode: Mode::Source,
                job_id: cli.job_id.clone(),
                config_root: settings.config_root().unwrap_or_default(),
            };
            if let JobOutput::Playlists(playlists) = engine.run(&settings.job, ctx)? {
                write_json(output.as_deref(), &playlists)?;
            }
        }
        Command::Sink { input } => {
            let engine = prepare(&settings)?;
            let playlists = read_json(input.as_deref())?;
            let ctx = JobContext {
                mode: Mode::Sink(playlists),
                job_id: cli.job_id.clone(),
                config_root: config_root(&settings)?,
            };
            if let JobOutput::Written(n) = engine.run(&settings.job, ctx)? {
                info!("Synced {n} playlist(s) to {}", settings.job.dir.display());
            }
        }
    }

    Ok(())
}

fn prepare(settings: &Settings) -> Result<Engine, SyncError> {
    settings.validate()?;
    Ok(Engine::new(&settings.paths, settings.library.clone()))
}

fn config_root(settings: &Settings) -> Result<PathBuf, SyncError> {
    settings.config_root().ok_or_else(|| {
        SyncError::Config("no backup location; set backup.config_root or --config-root".to_string())
    })
}

fn read_json(input: Option<&Path>) -> Result<Vec<AbstractPlaylist>, SyncError> {
    let playlists: Vec<AbstractPlaylist> = match input {
        Some(path) => {
            let file = File::open(path).map_err(|e| SyncError::interchange_file(path, e))?;
            serde_json::from_reader(BufReader::new(file))?
        }
        None => serde_json::from_reader(io::stdin().lock())?,
    };
    Ok(playlists)
}

fn write_json(output: Option<&Path>, playlists: &[AbstractPlaylist]) -> Result<(), SyncError> {
    let target = output.unwrap_or(Path::new("-"));
    let mut out: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).map_err(|e| SyncError::interchange_file(path, e))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    serde_json::to_writer_pretty(&mut out, playlists)?;
    writeln!(out)
        .and_then(|()| out.flush())
        .map_err(|e| SyncError::interchange_file(target, e))?;
    Ok(())
}
