//! Display width, truncation and padding for table cells.
//!
//! Widths here are an approximation: characters in the basic CJK Unified
//! Ideographs block (U+4E00 to U+9FA5) occupy two terminal columns, every
//! other character occupies one. Full-width punctuation, extended CJK blocks
//! and emoji count as single-width.

/// Marker appended to a cell that had to be shortened.
pub const ELLIPSIS: &str = "..";

const CJK_START: char = '\u{4E00}';
const CJK_END: char = '\u{9FA5}';

/// Whether a character falls in the double-width CJK range.
pub fn is_wide(c: char) -> bool {
    (CJK_START..=CJK_END).contains(&c)
}

/// Number of terminal columns `text` occupies.
pub fn display_width(text: &str) -> usize {
    text.chars().map(|c| if is_wide(c) { 2 } else { 1 }).sum()
}

/// Shorten `text` so it fits in `width` columns, appending [`ELLIPSIS`].
///
/// Characters are dropped from the end one at a time until the remainder
/// fits in `width - 2`. A single remaining character is never dropped, so a
/// lone wide character can exceed a very narrow column by one or two columns.
pub fn truncate(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        return text.to_string();
    }

    let budget = width.saturating_sub(ELLIPSIS.len());
    let mut kept: Vec<char> = text.chars().collect();
    let mut kept_width = display_width(text);

    while kept_width > budget && kept.len() > 1 {
        if let Some(c) = kept.pop() {
            kept_width -= if is_wide(c) { 2 } else { 1 };
        }
    }

    let mut out: String = kept.into_iter().collect();
    out.push_str(ELLIPSIS);
    out
}

/// Right-pad `text` with spaces up to `width` columns.
pub fn pad(text: &str, width: usize) -> String {
    pad_with(text, width, ' ')
}

/// Right-pad `text` with `fill` up to `width` columns.
///
/// Text already at or beyond `width` is returned unchanged; padding never
/// truncates.
pub fn pad_with(text: &str, width: usize, fill: char) -> String {
    let mut out = text.to_string();
    let mut current = display_width(text);
    let step = if is_wide(fill) { 2 } else { 1 };

    while current < width {
        out.push(fill);
        current += step;
    }
    out
}
