//! Host interaction around a sweep: privilege check, log rotation and disk
//! usage reports.

use std::path::Path;
use std::process::Command;

use crate::error::LogsweepError;
use crate::Result;

/// Default logrotate configuration.
pub const LOGROTATE_CONF: &str = "/etc/logrotate.conf";

/// Effective user id of this process.
pub fn effective_uid() -> u32 {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() }
}

/// Fail with [`LogsweepError::NotRoot`] unless running as uid 0.
pub fn ensure_root() -> Result<()> {
    match effective_uid() {
        0 => Ok(()),
        uid => Err(LogsweepError::NotRoot(uid)),
    }
}

/// Force a logrotate pass over `conf`.
pub fn rotate_logs(conf: impl AsRef<Path>) -> Result<()> {
    let conf = conf.as_ref();
    let mut cmd = Command::new("logrotate");
    cmd.arg("-f").arg(conf);
    run(cmd, "logrotate").map(|_| ())
}

/// Output of `df -h` for the filesystem holding `path`.
pub fn disk_usage(path: impl AsRef<Path>) -> Result<String> {
    let mut cmd = Command::new("df");
    cmd.arg("-h").arg(path.as_ref());
    run(cmd, "df")
}

fn run(mut cmd: Command, name: &str) -> Result<String> {
    tracing::info!(command = ?cmd, "running");
    let output = cmd.output().map_err(|e| LogsweepError::CommandFailed {
        command: name.to_string(),
        message: e.to_string(),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LogsweepError::CommandFailed {
            command: name.to_string(),
            message: format!("{} {}", output.status, stderr.trim()),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
