//! Target lists loaded from TOML.
//!
//! ```toml
//! [[target]]
//! label = "授权日志"
//! pattern = "/var/log/auth.log"
//! action = "truncate"
//! group = "system-logs"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::LogsweepError;
use crate::targets::Target;
use crate::Result;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TargetFile {
    #[serde(default, rename = "target")]
    targets: Vec<Target>,
}

/// Parse a target list from TOML text.
///
/// `origin` is only used in error messages.
pub fn parse_targets(text: &str, origin: &Path) -> Result<Vec<Target>> {
    let file: TargetFile = toml::from_str(text).map_err(|e| LogsweepError::ConfigParse {
        path: origin.to_path_buf(),
        message: e.message().to_string(),
    })?;

    for target in &file.targets {
        glob::Pattern::new(&target.pattern).map_err(|e| LogsweepError::InvalidGlob {
            pattern: target.pattern.clone(),
            message: e.to_string(),
        })?;
    }

    Ok(file.targets)
}

/// Read and parse a target list file.
pub fn load_targets(path: impl AsRef<Path>) -> Result<Vec<Target>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LogsweepError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let targets = parse_targets(&text, path)?;
    tracing::debug!(path = %path.display(), count = targets.len(), "loaded target list");
    Ok(targets)
}
