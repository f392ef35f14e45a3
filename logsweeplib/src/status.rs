//! Operation outcomes and their colored status labels.

use std::fmt;
use std::str::FromStr;

use console::{strip_ansi_codes, Style};
use serde::{Deserialize, Serialize};

use crate::width::display_width;

/// Result of processing one cleanup target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The operation completed.
    Success,
    /// Nothing matched the target; no-op.
    Missing,
    /// The operation was attempted and errored.
    Failed,
}

impl Outcome {
    /// Label text shown in the status column.
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Success => "✓ 成功",
            Outcome::Missing => "! 不存在",
            Outcome::Failed => "✗ 失败",
        }
    }

    /// Terminal style used for the label.
    pub fn style(self) -> Style {
        match self {
            Outcome::Success => Style::new().green(),
            Outcome::Missing => Style::new().yellow(),
            Outcome::Failed => Style::new().red(),
        }
    }

    /// Machine-readable name, as accepted by `FromStr`.
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Missing => "missing",
            Outcome::Failed => "failed",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(Outcome::Success),
            "missing" => Ok(Outcome::Missing),
            "failed" => Ok(Outcome::Failed),
            other => Err(format!("unknown outcome '{other}'")),
        }
    }
}

/// One reported cleanup operation, rendered as a single table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Human-readable description of what was processed
    pub label: String,
    /// Path or glob pattern acted upon
    pub target: String,
    pub outcome: Outcome,
    /// Bytes released by the matches that were cleaned
    #[serde(default)]
    pub freed_bytes: u64,
    /// First error encountered, for `Failed` records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultRecord {
    pub fn new(label: impl Into<String>, target: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
            outcome,
            freed_bytes: 0,
            error: None,
        }
    }

    pub fn with_freed_bytes(mut self, bytes: u64) -> Self {
        self.freed_bytes = bytes;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// A status cell: the text as printed (possibly with escapes) and its
/// visible, escape-free counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLabel {
    /// Text written to the terminal
    pub rendered: String,
    /// Text with color sequences stripped
    pub visible: String,
}

impl StatusLabel {
    /// Classify an outcome into its label, colored when `colored` is set.
    pub fn classify(outcome: Outcome, colored: bool) -> Self {
        let text = outcome.label();
        let rendered = outcome
            .style()
            .force_styling(colored)
            .apply_to(text)
            .to_string();
        Self::from_rendered(rendered)
    }

    fn from_rendered(rendered: String) -> Self {
        let visible = strip_ansi_codes(&rendered).into_owned();
        Self { rendered, visible }
    }

    /// Display width of the visible text.
    pub fn width(&self) -> usize {
        display_width(&self.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Outcome::Success.label(), "✓ 成功");
        assert_eq!(Outcome::Missing.label(), "! 不存在");
        assert_eq!(Outcome::Failed.label(), "✗ 失败");
    }

    #[test]
    fn test_classify_colored() {
        let status = StatusLabel::classify(Outcome::Success, true);
        assert_eq!(status.rendered, "\u{1b}[32m✓ 成功\u{1b}[0m");
        assert_eq!(status.visible, "✓ 成功");
        assert_eq!(status.width(), 6);

        let status = StatusLabel::classify(Outcome::Missing, true);
        assert!(status.rendered.starts_with("\u{1b}[33m"));
        assert_eq!(status.width(), 8);

        let status = StatusLabel::classify(Outcome::Failed, true);
        assert!(status.rendered.starts_with("\u{1b}[31m"));
        assert_eq!(status.visible, "✗ 失败");
    }

    #[test]
    fn test_classify_plain() {
        let status = StatusLabel::classify(Outcome::Failed, false);
        assert_eq!(status.rendered, "✗ 失败");
        assert_eq!(status.rendered, status.visible);
    }

    #[test]
    fn test_escapes_have_no_width() {
        let colored = StatusLabel::classify(Outcome::Missing, true);
        let plain = StatusLabel::classify(Outcome::Missing, false);
        assert!(colored.rendered.chars().count() > plain.rendered.chars().count());
        assert_eq!(colored.width(), plain.width());
    }

    #[test]
    fn test_outcome_parse() {
        assert_eq!("missing".parse::<Outcome>(), Ok(Outcome::Missing));
        assert_eq!(" FAILED ".parse::<Outcome>(), Ok(Outcome::Failed));
        assert!("gone".parse::<Outcome>().is_err());
        assert_eq!(Outcome::Success.to_string(), "success");
    }

    #[test]
    fn test_record_builder() {
        let record = ResultRecord::new("授权日志", "/var/log/auth.log", Outcome::Success)
            .with_freed_bytes(1024);
        assert_eq!(record.freed_bytes, 1024);
        assert!(record.error.is_none());

        let failed = ResultRecord::new("x", "/x", Outcome::Failed).with_error("denied");
        assert_eq!(failed.error.as_deref(), Some("denied"));
    }
}
