//! Text formatting functions for `rotsit`.
//!
//! Plain text with optional color:
//! - Status icons (○ ✓ ≡)
//! - One-line record summaries for `list`
//! - Full record detail for `show` and `export`

use crate::model::{Field, Record, Status};
use crossterm::style::Stylize;
use std::fmt::Write as _;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Status icon characters.
pub mod icons {
    /// Open issue (hollow circle).
    pub const OPEN: &str = "○";
    /// Closed issue (checkmark).
    pub const CLOSED: &str = "✓";
    /// Duplicate of another issue.
    pub const DUPLICATE: &str = "≡";
    /// Unrecognised status value.
    pub const UNKNOWN: &str = "?";
}

/// Formatting options for text output.
#[derive(Debug, Clone, Copy)]
pub struct TextFormatOptions {
    pub use_color: bool,
    pub max_width: Option<usize>,
}

impl TextFormatOptions {
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            use_color: false,
            max_width: None,
        }
    }
}

#[must_use]
pub const fn format_status_icon(status: Option<Status>) -> &'static str {
    match status {
        Some(Status::Open) => icons::OPEN,
        Some(Status::Closed) => icons::CLOSED,
        Some(Status::Duplicate) => icons::DUPLICATE,
        None => icons::UNKNOWN,
    }
}

/// Format status icon with optional color.
#[must_use]
pub fn format_status_icon_colored(status: Option<Status>, use_color: bool) -> String {
    let icon = format_status_icon(status);
    if !use_color {
        return icon.to_string();
    }

    match status {
        Some(Status::Open) => icon.green().to_string(),
        Some(Status::Closed) => icon.dark_grey().to_string(),
        Some(Status::Duplicate) => icon.blue().to_string(),
        None => icon.red().to_string(),
    }
}

/// Determine terminal width: `COLUMNS`, then the terminal itself, then 80.
#[must_use]
pub fn terminal_width() -> usize {
    if let Ok(columns) = std::env::var("COLUMNS") {
        if let Ok(value) = columns.trim().parse::<usize>() {
            if value > 0 {
                return value;
            }
        }
    }
    crossterm::terminal::size()
        .ok()
        .map(|(cols, _)| usize::from(cols))
        .filter(|cols| *cols > 0)
        .unwrap_or(80)
}

/// Truncate text to fit within `max_len` visible columns.
///
/// Handles wide characters (emojis, CJK) correctly using `unicode-width`.
#[must_use]
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if UnicodeWidthStr::width(text) <= max_len {
        return text.to_string();
    }

    let (target_len, ellipsis) = if max_len <= 3 {
        (max_len, "")
    } else {
        (max_len - 3, "...")
    };
    let mut w = 0;
    let mut s = String::new();
    for c in text.chars() {
        let cw = UnicodeWidthChar::width(c).unwrap_or(0);
        if w + cw > target_len {
            break;
        }
        w += cw;
        s.push(c);
    }
    s.push_str(ellipsis);
    s
}

/// Format a single-line record summary with options.
///
/// Format: `{icon} {guid} {assignee?} {summary}`
#[must_use]
pub fn format_record_line_with(record: &Record, options: TextFormatOptions) -> String {
    let status = record.status().ok();
    let assignee = record
        .get(Field::AssignedTo)
        .map(|user| format!("@{user} "))
        .unwrap_or_default();

    let prefix_len = UnicodeWidthStr::width(format_status_icon(status))
        + 1
        + UnicodeWidthStr::width(record.guid())
        + 1
        + UnicodeWidthStr::width(assignee.as_str());

    let summary = options.max_width.map_or_else(
        || record.summary().to_string(),
        |width| truncate_text(record.summary(), width.saturating_sub(prefix_len)),
    );

    let icon = format_status_icon_colored(status, options.use_color);
    let guid = if options.use_color {
        record.guid().cyan().to_string()
    } else {
        record.guid().to_string()
    };

    format!("{icon} {guid} {assignee}{summary}")
}

#[must_use]
pub fn format_record_line(record: &Record) -> String {
    format_record_line_with(record, TextFormatOptions::plain())
}

/// Full record: one `Label: value` line per stored field, the message as an
/// indented block, then the comments in order.
#[must_use]
pub fn format_record_detail(record: &Record, use_color: bool) -> String {
    let mut out = String::new();
    let header_fields = || {
        record
            .fields()
            .filter(|(key, _)| Field::from_key(key) != Some(Field::Message))
    };
    let label_width = header_fields().map(|(key, _)| key.len()).max().unwrap_or(0);

    for (key, value) in header_fields() {
        let label = format!("{key:<label_width$}");
        let label = if use_color {
            label.bold().to_string()
        } else {
            label
        };
        let _ = writeln!(out, "{label}  {value}");
    }

    if !record.message().is_empty() {
        out.push('\n');
        for line in record.message().lines() {
            let _ = writeln!(out, "    {line}");
        }
    }

    for comment in record.comments() {
        let header = format!(
            "--- {} by {} on {}",
            comment.guid, comment.user, comment.time
        );
        let header = if use_color {
            header.dark_grey().to_string()
        } else {
            header
        };
        let _ = writeln!(out, "\n{header}");
        for line in comment.text.lines() {
            let _ = writeln!(out, "    {line}");
        }
    }

    out
}
