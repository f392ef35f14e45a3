//! # logsweeplib
//!
//! Frees disk space on a server by truncating live logs and deleting rotated
//! archives, control-panel log databases and stale backups, and reports every
//! operation as a row in a bordered terminal table.
//!
//! ## Overview
//!
//! The library is split into a cleanup side and a reporting side:
//!
//! - **Targets**: labelled paths or glob patterns with a truncate/delete action,
//!   grouped as system logs, archived logs, panel logs, application logs and backups
//! - **Sweep**: runs targets in order and yields one [`ResultRecord`] per target
//!   (`Success`, `Missing` or `Failed`)
//! - **Table**: renders records in fixed-width columns, with CJK ideographs counted
//!   as two columns and a colored status cell
//!
//! ## Example
//!
//! ```rust
//! use logsweeplib::{Action, Group, SweepOptions, Target, TableRenderer, sweep};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::create_dir_all(dir.path().join("var/log")).unwrap();
//! fs::write(dir.path().join("var/log/auth.log"), "Jan 1 sshd[1]: accepted\n").unwrap();
//!
//! let targets = vec![
//!     Target::new("授权日志", "/var/log/auth.log", Action::Truncate, Group::SystemLogs),
//!     Target::new("系统日志", "/var/log/syslog", Action::Truncate, Group::SystemLogs),
//! ];
//!
//! let renderer = TableRenderer::new().colored(false);
//! let mut rows = Vec::new();
//! let summary = sweep(&targets, &SweepOptions::new().root(dir.path()), |record| {
//!     rows.push(renderer.row(record));
//!     Ok(())
//! })
//! .unwrap();
//!
//! assert_eq!(summary.succeeded, 1);
//! assert_eq!(summary.missing, 1);
//! assert!(rows[0].contains("✓ 成功"));
//! assert!(rows[1].contains("! 不存在"));
//! ```

pub mod config;
pub mod error;
pub mod status;
pub mod sweep;
pub mod system;
pub mod table;
pub mod targets;
pub mod width;

pub use config::{load_targets, parse_targets};
pub use error::LogsweepError;
pub use status::{Outcome, ResultRecord, StatusLabel};
pub use sweep::{format_bytes, process_target, sweep, SweepOptions, SweepSummary};
pub use system::{disk_usage, ensure_root, rotate_logs, LOGROTATE_CONF};
pub use table::{ColumnTitles, TableLayout, TableRenderer, TableWriter};
pub use targets::{builtin_targets, Action, Group, Target};
pub use width::{display_width, pad, pad_with, truncate};

/// Result type for logsweeplib operations
pub type Result<T> = std::result::Result<T, LogsweepError>;
