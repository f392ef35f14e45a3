//! Executes cleanup targets and produces one [`ResultRecord`] per target.
//!
//! For each target the pattern is rebased under the configured root,
//! expanded, and every match is truncated or deleted. The record is handed to
//! the caller's sink before the next target is touched, so a report can be
//! printed while the sweep runs.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::LogsweepError;
use crate::status::{Outcome, ResultRecord};
use crate::targets::{Action, Group, Target};
use crate::Result;

/// Options for a sweep.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Directory that absolute patterns are resolved under (`/` normally)
    pub root: PathBuf,
    /// Only run targets in these groups (empty = all groups)
    pub groups: Vec<Group>,
    /// Measure matches without modifying anything
    pub dry_run: bool,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/"),
            groups: Vec::new(),
            dry_run: false,
        }
    }
}

impl SweepOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve patterns under `root` instead of `/`.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Restrict the sweep to specific groups.
    pub fn groups(mut self, groups: Vec<Group>) -> Self {
        self.groups = groups;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn selects(&self, target: &Target) -> bool {
        self.groups.is_empty() || self.groups.contains(&target.group)
    }
}

/// Totals over all records of a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    pub succeeded: usize,
    pub missing: usize,
    pub failed: usize,
    pub freed_bytes: u64,
}

impl SweepSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one record.
    pub fn add(&mut self, record: &ResultRecord) {
        match record.outcome {
            Outcome::Success => self.succeeded += 1,
            Outcome::Missing => self.missing += 1,
            Outcome::Failed => self.failed += 1,
        }
        self.freed_bytes += record.freed_bytes;
    }

    /// Number of records accounted for.
    pub fn total(&self) -> usize {
        self.succeeded + self.missing + self.failed
    }
}

/// Run `targets` in order, passing each record to `sink` as soon as it exists.
///
/// Per-target I/O failures become [`Outcome::Failed`] records. An error is
/// only returned for an unusable pattern or when `sink` fails.
///
/// # Example
///
/// ```rust,ignore
/// use logsweeplib::{builtin_targets, sweep, SweepOptions};
///
/// let summary = sweep(&builtin_targets(), &SweepOptions::new().dry_run(true), |record| {
///     println!("{} {}", record.label, record.outcome);
///     Ok(())
/// })?;
/// ```
pub fn sweep<F>(targets: &[Target], options: &SweepOptions, mut sink: F) -> Result<SweepSummary>
where
    F: FnMut(&ResultRecord) -> Result<()>,
{
    let mut summary = SweepSummary::new();

    for target in targets.iter().filter(|t| options.selects(t)) {
        let record = process_target(target, options)?;
        summary.add(&record);
        sink(&record)?;
    }

    Ok(summary)
}

/// Process a single target.
pub fn process_target(target: &Target, options: &SweepOptions) -> Result<ResultRecord> {
    let (matches, mut errors) = expand(target, &options.root)?;

    if matches.is_empty() && errors.is_empty() {
        debug!(pattern = %target.pattern, "no match");
        return Ok(ResultRecord::new(&target.label, &target.pattern, Outcome::Missing));
    }

    let mut freed = 0u64;
    for path in &matches {
        match apply(path, target.action, &options.root, options.dry_run) {
            Ok(bytes) => {
                debug!(path = %path.display(), bytes, action = ?target.action, "cleaned");
                freed += bytes;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cleanup failed");
                errors.push(format!("{}: {}", path.display(), e));
            }
        }
    }

    let record = ResultRecord::new(&target.label, &target.pattern, Outcome::Success);
    let record = match errors.into_iter().next() {
        Some(error) => ResultRecord {
            outcome: Outcome::Failed,
            ..record
        }
        .with_error(error),
        None => record,
    };
    Ok(record.with_freed_bytes(freed))
}

/// Rebase an absolute pattern under `root`.
pub fn resolve(pattern: &str, root: &Path) -> PathBuf {
    root.join(pattern.trim_start_matches('/'))
}

/// Matches for `target`, plus errors hit while walking glob directories.
fn expand(target: &Target, root: &Path) -> Result<(Vec<PathBuf>, Vec<String>)> {
    if !target.is_glob() {
        let path = resolve(&target.pattern, root);
        let found = fs::symlink_metadata(&path).is_ok();
        return Ok((if found { vec![path] } else { Vec::new() }, Vec::new()));
    }

    let root_str = root.to_string_lossy();
    let full = format!(
        "{}/{}",
        Pattern::escape(root_str.trim_end_matches('/')),
        target.pattern.trim_start_matches('/')
    );
    let paths = glob::glob(&full).map_err(|e| LogsweepError::InvalidGlob {
        pattern: target.pattern.clone(),
        message: e.to_string(),
    })?;

    let mut matches = Vec::new();
    let mut errors = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => matches.push(path),
            Err(e) => errors.push(e.to_string()),
        }
    }
    Ok((matches, errors))
}

/// Apply `action` to one path, returning the bytes it releases.
///
/// A symlink is truncated through its target only when that target lies
/// under `root`. Deleting a symlink removes the link and frees nothing.
fn apply(path: &Path, action: Action, root: &Path, dry_run: bool) -> io::Result<u64> {
    let meta = fs::symlink_metadata(path)?;
    let is_link = meta.file_type().is_symlink();

    match action {
        Action::Truncate => {
            let meta = if is_link {
                fs::metadata(resolve_link(path, root)?)?
            } else {
                meta
            };
            if meta.is_dir() {
                return Err(io::Error::other("cannot truncate a directory"));
            }
            if !dry_run {
                OpenOptions::new().write(true).open(path)?.set_len(0)?;
            }
            Ok(meta.len())
        }
        Action::Delete => {
            let size = if is_link {
                0
            } else if meta.is_dir() {
                dir_size(path)
            } else {
                meta.len()
            };
            if !dry_run {
                if meta.is_dir() {
                    fs::remove_dir_all(path)?;
                } else {
                    fs::remove_file(path)?;
                }
            }
            Ok(size)
        }
    }
}

/// Final target of the symlink at `path`, which must stay under `root`.
fn resolve_link(path: &Path, root: &Path) -> io::Result<PathBuf> {
    let resolved = fs::canonicalize(path)?;
    let root = fs::canonicalize(root)?;
    if !resolved.starts_with(&root) {
        return Err(io::Error::other(format!(
            "symlink points outside {} to {}",
            root.display(),
            resolved.display()
        )));
    }
    Ok(resolved)
}

/// Total size of regular files below `path`.
fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Human-readable size in binary units.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn write(root: &Path, rel: &str, len: usize) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, vec![b'x'; len]).unwrap();
        path
    }

    fn setup() -> TempDir {
        let dir = tempdir().unwrap();
        write(dir.path(), "var/log/auth.log", 100);
        write(dir.path(), "var/log/syslog.1", 40);
        write(dir.path(), "var/log/kern.log.2.gz", 60);
        write(dir.path(), "var/log/dpkg.log.3.gz", 25);
        write(dir.path(), "www/backup/site/a/index.html", 10);
        write(dir.path(), "www/backup/site/a/img/logo.png", 20);
        dir
    }

    fn opts(dir: &TempDir) -> SweepOptions {
        SweepOptions::new().root(dir.path())
    }

    #[test]
    fn test_truncate_existing() {
        let dir = setup();
        let target = Target::new(
            "授权日志",
            "/var/log/auth.log",
            Action::Truncate,
            Group::SystemLogs,
        );
        let record = process_target(&target, &opts(&dir)).unwrap();

        assert_eq!(record.outcome, Outcome::Success);
        assert_eq!(record.freed_bytes, 100);
        assert_eq!(record.target, "/var/log/auth.log");
        let meta = fs::metadata(dir.path().join("var/log/auth.log")).unwrap();
        assert_eq!(meta.len(), 0);
    }

    #[test]
    fn test_missing_path() {
        let dir = setup();
        let target = Target::new(
            "x",
            "/var/log/nonexistent.log",
            Action::Truncate,
            Group::SystemLogs,
        );
        let record = process_target(&target, &opts(&dir)).unwrap();
        assert_eq!(record.outcome, Outcome::Missing);
        assert_eq!(record.freed_bytes, 0);
    }

    #[test]
    fn test_missing_glob() {
        let dir = setup();
        let target = Target::new("x", "/var/log/*.xz", Action::Delete, Group::ArchivedLogs);
        let record = process_target(&target, &opts(&dir)).unwrap();
        assert_eq!(record.outcome, Outcome::Missing);
    }

    #[test]
    fn test_delete_glob() {
        let dir = setup();
        let target = Target::new(
            "压缩归档日志",
            "/var/log/*.gz",
            Action::Delete,
            Group::ArchivedLogs,
        );
        let record = process_target(&target, &opts(&dir)).unwrap();

        assert_eq!(record.outcome, Outcome::Success);
        assert_eq!(record.freed_bytes, 85);
        assert!(!dir.path().join("var/log/kern.log.2.gz").exists());
        assert!(!dir.path().join("var/log/dpkg.log.3.gz").exists());
        assert!(dir.path().join("var/log/syslog.1").exists());
    }

    #[test]
    fn test_delete_directory() {
        let dir = setup();
        let target =
            Target::new("网站备份", "/www/backup/site/*", Action::Delete, Group::Backups);
        let record = process_target(&target, &opts(&dir)).unwrap();

        assert_eq!(record.outcome, Outcome::Success);
        assert_eq!(record.freed_bytes, 30);
        assert!(!dir.path().join("www/backup/site/a").exists());
        assert!(dir.path().join("www/backup/site").exists());
    }

    #[test]
    fn test_truncate_directory_fails() {
        let dir = setup();
        let target = Target::new("x", "/www/backup/site", Action::Truncate, Group::Backups);
        let record = process_target(&target, &opts(&dir)).unwrap();
        assert_eq!(record.outcome, Outcome::Failed);
        assert!(record.error.unwrap().contains("directory"));
    }

    #[test]
    fn test_partial_glob_failure() {
        let dir = setup();
        write(dir.path(), "srv/app/app.log", 70);
        fs::create_dir_all(dir.path().join("srv/app/sub.log")).unwrap();
        let target = Target::new("应用日志", "/srv/app/*.log", Action::Truncate, Group::AppLogs);
        let record = process_target(&target, &opts(&dir)).unwrap();

        assert_eq!(record.outcome, Outcome::Failed);
        assert_eq!(record.freed_bytes, 70);
        let error = record.error.unwrap();
        assert!(error.contains("sub.log"), "{error}");
        assert!(error.contains("directory"), "{error}");
        assert_eq!(fs::metadata(dir.path().join("srv/app/app.log")).unwrap().len(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_truncate_symlink_outside_root_fails() {
        let dir = setup();
        let host = tempdir().unwrap();
        let outside = write(host.path(), "host.log", 500);
        std::os::unix::fs::symlink(&outside, dir.path().join("var/log/linked.log")).unwrap();

        let target = Target::new("x", "/var/log/linked.log", Action::Truncate, Group::SystemLogs);
        let record = process_target(&target, &opts(&dir)).unwrap();

        assert_eq!(record.outcome, Outcome::Failed);
        assert_eq!(record.freed_bytes, 0);
        assert!(record.error.unwrap().contains("outside"));
        assert_eq!(fs::metadata(&outside).unwrap().len(), 500);
    }

    #[cfg(unix)]
    #[test]
    fn test_truncate_symlink_inside_root() {
        let dir = setup();
        let auth = dir.path().join("var/log/auth.log");
        std::os::unix::fs::symlink(&auth, dir.path().join("var/log/current.log")).unwrap();

        let target = Target::new("x", "/var/log/current.log", Action::Truncate, Group::SystemLogs);
        let record = process_target(&target, &opts(&dir)).unwrap();

        assert_eq!(record.outcome, Outcome::Success);
        assert_eq!(record.freed_bytes, 100);
        assert_eq!(fs::metadata(&auth).unwrap().len(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_delete_symlink_keeps_target() {
        let dir = setup();
        let host = tempdir().unwrap();
        let outside = write(host.path(), "host.gz", 500);
        std::os::unix::fs::symlink(&outside, dir.path().join("var/log/linked.gz")).unwrap();

        let target = Target::new("x", "/var/log/linked.gz", Action::Delete, Group::ArchivedLogs);
        let record = process_target(&target, &opts(&dir)).unwrap();

        assert_eq!(record.outcome, Outcome::Success);
        assert_eq!(record.freed_bytes, 0);
        assert!(fs::symlink_metadata(dir.path().join("var/log/linked.gz")).is_err());
        assert_eq!(fs::metadata(&outside).unwrap().len(), 500);
    }

    #[test]
    fn test_dry_run_leaves_files() {
        let dir = setup();
        let target = Target::new("x", "/var/log/*.gz", Action::Delete, Group::ArchivedLogs);
        let record = process_target(&target, &opts(&dir).dry_run(true)).unwrap();

        assert_eq!(record.outcome, Outcome::Success);
        assert_eq!(record.freed_bytes, 85);
        assert!(dir.path().join("var/log/kern.log.2.gz").exists());
    }

    #[test]
    fn test_sweep_streams_in_order() {
        let dir = setup();
        let targets = vec![
            Target::new("a", "/var/log/auth.log", Action::Truncate, Group::SystemLogs),
            Target::new("b", "/var/log/missing", Action::Truncate, Group::SystemLogs),
            Target::new("c", "/var/log/*.[0-9]", Action::Delete, Group::ArchivedLogs),
        ];
        let mut seen = Vec::new();
        let summary = sweep(&targets, &opts(&dir), |r| {
            seen.push((r.label.clone(), r.outcome));
            Ok(())
        })
        .unwrap();

        assert_eq!(
            seen,
            vec![
                ("a".to_string(), Outcome::Success),
                ("b".to_string(), Outcome::Missing),
                ("c".to_string(), Outcome::Success),
            ]
        );
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.freed_bytes, 140);
    }

    #[test]
    fn test_sweep_group_filter() {
        let dir = setup();
        let targets = vec![
            Target::new("a", "/var/log/auth.log", Action::Truncate, Group::SystemLogs),
            Target::new("b", "/www/backup/site/*", Action::Delete, Group::Backups),
        ];
        let mut labels = Vec::new();
        sweep(&targets, &opts(&dir).groups(vec![Group::Backups]), |r| {
            labels.push(r.label.clone());
            Ok(())
        })
        .unwrap();
        assert_eq!(labels, vec!["b"]);
        assert_eq!(fs::metadata(dir.path().join("var/log/auth.log")).unwrap().len(), 100);
    }

    #[test]
    fn test_sweep_sink_error_stops() {
        let dir = setup();
        let targets = vec![
            Target::new("a", "/var/log/auth.log", Action::Truncate, Group::SystemLogs),
            Target::new("b", "/var/log/*.gz", Action::Delete, Group::ArchivedLogs),
        ];
        let result = sweep(&targets, &opts(&dir), |_| {
            Err(LogsweepError::Io(io::Error::other("closed")))
        });
        assert!(result.is_err());
        assert!(dir.path().join("var/log/kern.log.2.gz").exists());
    }

    #[test]
    fn test_resolve() {
        assert_eq!(
            resolve("/var/log/syslog", Path::new("/")),
            PathBuf::from("/var/log/syslog")
        );
        assert_eq!(
            resolve("/var/log/syslog", Path::new("/srv/chroot")),
            PathBuf::from("/srv/chroot/var/log/syslog")
        );
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.0 KiB");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5.0 GiB");
    }
}
