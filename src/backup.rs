//! Snapshots of the playlist directory taken before a sink job overwrites
//! anything, with a retention limit on how many are kept.
//!
//! Layout: `<config_root>/m3usync/backups/<job_id>/<timestamp>/`, each
//! snapshot mirroring the full playlist tree.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::Retention;
use crate::error::{Result, SyncError};

/// Sortable, directory-safe timestamp with second precision.
pub fn timestamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    now.format("%Y-%m-%d-%H-%M-%S").to_string()
}

/// What a backup pass did.
#[derive(Debug, Clone, Default)]
pub struct BackupReport {
    pub snapshot: Option<PathBuf>,
    pub pruned: Vec<PathBuf>,
    /// Bytes used by all remaining snapshots.
    pub total_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct BackupManager {
    root: PathBuf,
    retention: Retention,
}

impl BackupManager {
    pub fn new(config_root: &Path, job_id: &str, retention: Retention) -> Self {
        Self {
            root: config_root
                .join(crate::APP_NAME)
                .join("backups")
                .join(job_id),
            retention,
        }
    }

    /// Directory holding this job's snapshots.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn run(&self, playlist_dir: &Path) -> Result<BackupReport> {
        self.run_at(playlist_dir, &timestamp(&Local::now()))
    }

    /// Snapshot `playlist_dir` under `stamp` (when retention allows any
    /// snapshots at all), then prune down to the retention limit.
    pub fn run_at(&self, playlist_dir: &Path, stamp: &str) -> Result<BackupReport> {
        match fs::create_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(SyncError::backup(&self.root, e)),
        }

        let limit = self.retention.limit();
        let mut report = BackupReport::default();

        if limit > 0 {
            debug!("Backing up local playlists...");
            let target = self.snapshot_dir(stamp);
            self.copy_tree(playlist_dir, &target)?;
            debug!("Backed up local playlists to: {}", target.display());
            report.snapshot = Some(target);
        }

        report.pruned = self.prune(limit)?;
        report.total_bytes = self.total_bytes()?;
        info!(
            "Your backups are currently taking up {:.2}MB of space",
            report.total_bytes as f64 / 1024.0 / 1024.0
        );
        Ok(report)
    }

    /// Snapshot directories, oldest first.
    pub fn snapshots(&self) -> Result<Vec<PathBuf>> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        let read = fs::read_dir(&self.root).map_err(|e| SyncError::backup(&self.root, e))?;
        for entry in read {
            let entry = entry.map_err(|e| SyncError::backup(&self.root, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| SyncError::backup(entry.path(), e))?;
            if file_type.is_dir() {
                dirs.push(entry.path());
            }
        }
        dirs.sort_by_key(|p| sort_key(p));
        Ok(dirs)
    }

    fn prune(&self, limit: usize) -> Result<Vec<PathBuf>> {
        let mut snapshots = self.snapshots()?;
        let mut pruned = Vec::new();

        while snapshots.len() > limit {
            info!(
                "Number of backups ({}) exceeds backup retention ({})",
                snapshots.len(),
                limit
            );
            let oldest = snapshots.remove(0);
            fs::remove_dir_all(&oldest).map_err(|e| SyncError::backup(&oldest, e))?;
            info!("Deleted oldest backup {}", oldest.display());
            pruned.push(oldest);
        }
        Ok(pruned)
    }

    /// Two runs within the same second get `_1`, `_2`, ... appended, which
    /// still sorts after the bare stamp.
    fn snapshot_dir(&self, stamp: &str) -> PathBuf {
        let mut candidate = self.root.join(stamp);
        let mut n = 1;
        while candidate.exists() {
            candidate = self.root.join(format!("{stamp}_{n}"));
            n += 1;
        }
        candidate
    }

    fn copy_tree(&self, src: &Path, dest: &Path) -> Result<()> {
        if !src.is_dir() {
            let e = io::Error::new(io::ErrorKind::NotFound, "playlist directory is missing");
            return Err(SyncError::backup(src, e));
        }
        fs::create_dir_all(dest).map_err(|e| SyncError::backup(dest, e))?;

        let walker = WalkDir::new(src)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !e.path().starts_with(&self.root));

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(src).to_path_buf();
                SyncError::backup(path, e.into())
            })?;
            let rel_path = entry.path().strip_prefix(src).unwrap_or(entry.path());
            let new_path = dest.join(rel_path);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&new_path).map_err(|e| SyncError::backup(&new_path, e))?;
            } else if entry.path_is_symlink() && !entry.path().is_file() {
                debug!("Not copying linked directory {}", entry.path().display());
            } else {
                if let Some(parent) = new_path.parent() {
                    fs::create_dir_all(parent).map_err(|e| SyncError::backup(parent, e))?;
                }
                fs::copy(entry.path(), &new_path).map_err(|e| SyncError::backup(&new_path, e))?;
            }
        }
        Ok(())
    }

    fn total_bytes(&self) -> Result<u64> {
        let mut total = 0;
        for entry in WalkDir::new(&self.root) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.root).to_path_buf();
                SyncError::backup(path, e.into())
            })?;
            if entry.file_type().is_file() {
                let meta = entry
                    .metadata()
                    .map_err(|e| SyncError::backup(entry.path(), e.into()))?;
                total += meta.len();
            }
        }
        Ok(total)
    }
}

fn sort_key(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().replace('-', ""))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;

    fn playlist_dir(root: &Path) -> PathBuf {
        let dir = root.join("playlists");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("Jazz.m3u"), "/a.mp3\n").unwrap();
        fs::write(dir.join("nested").join("Disco.m3u"), "/b.mp3\n").unwrap();
        dir
    }

    fn stamp(n: u32) -> String {
        timestamp(&Utc.with_ymd_and_hms(2026, 1, n, 12, 0, 0).unwrap())
    }

    #[test]
    fn timestamp_is_second_precision_and_dash_separated() {
        let t = Utc.with_ymd_and_hms(2026, 10, 19, 8, 5, 3).unwrap();
        assert_eq!(timestamp(&t), "2026-10-19-08-05-03");
    }

    #[test]
    fn backup_root_is_nested_per_job() {
        let m = BackupManager::new(Path::new("/cfg"), "job-7", Retention::Three);
        assert_eq!(m.root(), Path::new("/cfg/m3usync/backups/job-7"));
    }

    #[test]
    fn snapshot_mirrors_playlist_tree() {
        let tmp = tempdir().unwrap();
        let dir = playlist_dir(tmp.path());
        let m = BackupManager::new(&tmp.path().join("cfg"), "job", Retention::Three);

        let report = m.run_at(&dir, &stamp(1)).unwrap();
        let snap = report.snapshot.unwrap();
        assert_eq!(
            fs::read_to_string(snap.join("nested").join("Disco.m3u")).unwrap(),
            "/b.mp3\n"
        );
        assert_eq!(fs::read_to_string(snap.join("Jazz.m3u")).unwrap(), "/a.mp3\n");
        assert!(report.pruned.is_empty());
        assert!(report.total_bytes > 0);
    }

    #[test]
    fn retention_keeps_most_recent_snapshots() {
        let tmp = tempdir().unwrap();
        let dir = playlist_dir(tmp.path());
        let m = BackupManager::new(&tmp.path().join("cfg"), "job", Retention::Three);

        for day in 1..=5 {
            m.run_at(&dir, &stamp(day)).unwrap();
        }

        let left: Vec<String> = m
            .snapshots()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(left, vec![stamp(3), stamp(4), stamp(5)]);
    }

    #[test]
    fn no_backups_still_prunes_old_snapshots() {
        let tmp = tempdir().unwrap();
        let dir = playlist_dir(tmp.path());
        let cfg = tmp.path().join("cfg");

        BackupManager::new(&cfg, "job", Retention::Three)
            .run_at(&dir, &stamp(1))
            .unwrap();

        let m = BackupManager::new(&cfg, "job", Retention::NoBackups);
        let report = m.run_at(&dir, &stamp(2)).unwrap();
        assert!(report.snapshot.is_none());
        assert_eq!(report.pruned.len(), 1);
        assert!(m.snapshots().unwrap().is_empty());
        assert_eq!(report.total_bytes, 0);
    }

    #[test]
    fn same_second_runs_get_distinct_snapshots() {
        let tmp = tempdir().unwrap();
        let dir = playlist_dir(tmp.path());
        let m = BackupManager::new(&tmp.path().join("cfg"), "job", Retention::Five);

        let first = m.run_at(&dir, &stamp(1)).unwrap().snapshot.unwrap();
        let second = m.run_at(&dir, &stamp(1)).unwrap().snapshot.unwrap();
        assert_ne!(first, second);
        assert_eq!(m.snapshots().unwrap(), vec![first, second]);
    }

    #[cfg(unix)]
    #[test]
    fn linked_files_are_copied_and_linked_directories_skipped() {
        let tmp = tempdir().unwrap();
        let dir = playlist_dir(tmp.path());
        let shared = tmp.path().join("shared.m3u");
        fs::write(&shared, "/c.mp3\n").unwrap();
        std::os::unix::fs::symlink(&shared, dir.join("Shared.m3u")).unwrap();
        std::os::unix::fs::symlink(&dir, dir.join("nested").join("loop")).unwrap();
        let m = BackupManager::new(&tmp.path().join("cfg"), "job", Retention::Three);

        let snap = m.run_at(&dir, &stamp(1)).unwrap().snapshot.unwrap();
        assert_eq!(fs::read_to_string(snap.join("Shared.m3u")).unwrap(), "/c.mp3\n");
        assert!(!snap.join("nested").join("loop").exists());
    }

    #[test]
    fn missing_playlist_dir_is_a_backup_failure() {
        let tmp = tempdir().unwrap();
        let m = BackupManager::new(&tmp.path().join("cfg"), "job", Retention::Three);
        let err = m.run_at(&tmp.path().join("gone"), &stamp(1)).unwrap_err();
        assert!(matches!(err, SyncError::BackupFailure { .. }));
        assert!(!err.is_recoverable());
    }
}
