//! Bordered result table.
//!
//! Every record becomes one row of fixed-width columns:
//!
//! ```text
//! ┌──────────────────────────────────┬──────────────┬──────────────────────────────────────────────────────────────┐
//! │ 日志描述                         │ 状态         │ 路径                                                         │
//! ├──────────────────────────────────┼──────────────┼──────────────────────────────────────────────────────────────┤
//! │ 授权日志                         │ ✓ 成功       │ /var/log/auth.log                                            │
//! └──────────────────────────────────┴──────────────┴──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Label and path cells are truncated then padded with [`crate::width`];
//! the status cell is padded after its color sequences, using the visible
//! width of the label.

use std::io::Write;

use crate::status::{ResultRecord, StatusLabel};
use crate::width::{display_width, pad, truncate};
use crate::Result;

/// Column widths and border characters shared by every line of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub label_width: usize,
    pub status_width: usize,
    pub path_width: usize,
    pub vertical: char,
    pub horizontal: char,
}

impl TableLayout {
    /// The layout used by every report.
    pub const STANDARD: TableLayout = TableLayout {
        label_width: 32,
        status_width: 12,
        path_width: 60,
        vertical: '│',
        horizontal: '─',
    };

    fn widths(&self) -> [usize; 3] {
        [self.label_width, self.status_width, self.path_width]
    }

    /// Horizontal rule with the given left, crossing and right characters.
    fn rule(&self, left: char, cross: char, right: char) -> String {
        let runs: Vec<String> = self
            .widths()
            .iter()
            .map(|w| self.horizontal.to_string().repeat(w + 2))
            .collect();
        let cross = cross.to_string();
        format!("{left}{}{right}", runs.join(cross.as_str()))
    }

    /// Join three already padded cells between vertical borders.
    fn join_cells(&self, label: &str, status: &str, path: &str) -> String {
        let v = self.vertical;
        format!("{v} {label} {v} {status} {v} {path} {v}")
    }
}

impl Default for TableLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Column titles for the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnTitles {
    pub label: String,
    pub status: String,
    pub path: String,
}

impl Default for ColumnTitles {
    fn default() -> Self {
        Self {
            label: "日志描述".to_string(),
            status: "状态".to_string(),
            path: "路径".to_string(),
        }
    }
}

/// Renders header, rows and footer for a [`TableLayout`].
///
/// The renderer holds no per-row state; rendering the same record twice
/// yields identical output.
#[derive(Debug, Clone)]
pub struct TableRenderer {
    layout: TableLayout,
    titles: ColumnTitles,
    colored: bool,
}

impl TableRenderer {
    /// Renderer using the standard layout and titles, with colored status.
    pub fn new() -> Self {
        Self {
            layout: TableLayout::STANDARD,
            titles: ColumnTitles::default(),
            colored: true,
        }
    }

    pub fn layout(mut self, layout: TableLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn titles(mut self, titles: ColumnTitles) -> Self {
        self.titles = titles;
        self
    }

    /// Whether status cells carry ANSI color sequences.
    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Top border, title row and separator, newline-separated.
    pub fn header(&self) -> String {
        let layout = &self.layout;
        let titles = layout.join_cells(
            &pad(&truncate(&self.titles.label, layout.label_width), layout.label_width),
            &pad(&truncate(&self.titles.status, layout.status_width), layout.status_width),
            &pad(&truncate(&self.titles.path, layout.path_width), layout.path_width),
        );
        [
            layout.rule('┌', '┬', '┐'),
            titles,
            layout.rule('├', '┼', '┤'),
        ]
        .join("\n")
    }

    /// One table row for `record`.
    pub fn row(&self, record: &ResultRecord) -> String {
        let layout = &self.layout;

        let label = truncate(&record.label, layout.label_width);
        let path = truncate(&record.target, layout.path_width);
        let status = StatusLabel::classify(record.outcome, self.colored);

        let label = pad(&label, layout.label_width);
        let path = pad(&path, layout.path_width);

        // padding goes after the reset sequence
        let fill = layout.status_width.saturating_sub(status.width());
        let status = format!("{}{}", status.rendered, " ".repeat(fill));

        layout.join_cells(&label, &status, &path)
    }

    /// Bottom border.
    pub fn footer(&self) -> String {
        self.layout.rule('└', '┴', '┘')
    }
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes a table to `W` one row at a time.
///
/// The header is written by [`TableWriter::begin`], each row as soon as it is
/// pushed, and the footer by [`TableWriter::finish`].
#[derive(Debug)]
pub struct TableWriter<W: Write> {
    renderer: TableRenderer,
    out: W,
    rows: usize,
}

impl<W: Write> TableWriter<W> {
    /// Write the header and return a writer ready for rows.
    pub fn begin(renderer: TableRenderer, mut out: W) -> Result<Self> {
        writeln!(out, "{}", renderer.header())?;
        Ok(Self {
            renderer,
            out,
            rows: 0,
        })
    }

    pub fn push(&mut self, record: &ResultRecord) -> Result<()> {
        writeln!(self.out, "{}", self.renderer.row(record))?;
        self.out.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Number of rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Write the footer and hand back the sink.
    pub fn finish(mut self) -> Result<W> {
        writeln!(self.out, "{}", self.renderer.footer())?;
        self.out.flush()?;
        Ok(self.out)
    }
}
