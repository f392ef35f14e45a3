//! Output formatting for the CLI: summary lines and the JSON report.

use std::str::FromStr;

use console::Style;
use logsweeplib::{format_bytes, ResultRecord, SweepSummary};
use serde::Serialize;

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Streamed bordered table
    #[default]
    Table,
    /// A single JSON document once the sweep ends
    Json,
}

impl OutputMode {
    pub fn is_structured(self) -> bool {
        self == OutputMode::Json
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Ok(OutputMode::Table),
            "json" => Ok(OutputMode::Json),
            _ => Err(format!("Unknown output mode: {}", s)),
        }
    }
}

/// Structured report for `--output json`.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub dry_run: bool,
    pub records: Vec<ResultRecord>,
    pub summary: SweepSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_after: Option<String>,
}

/// Summary printed under the table.
pub fn summary_text(summary: &SweepSummary, dry_run: bool, colored: bool) -> String {
    let bold = Style::new().bold().force_styling(colored);
    let freed_label = if dry_run { "可释放空间" } else { "已释放空间" };

    format!(
        "共处理 {} 项: 成功 {}, 不存在 {}, 失败 {}\n{}: {}",
        summary.total(),
        summary.succeeded,
        summary.missing,
        summary.failed,
        freed_label,
        bold.apply_to(format_bytes(summary.freed_bytes)),
    )
}

/// Heading printed above a `df -h` block.
pub fn disk_heading(title: &str, colored: bool) -> String {
    Style::new()
        .cyan()
        .bold()
        .force_styling(colored)
        .apply_to(format!("== {title} =="))
        .to_string()
}
