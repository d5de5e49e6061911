//! Output formatting for `rotsit`.
//!
//! Human-readable text for terminals, and the JSON shapes commands print
//! under `--json`. Records themselves serialize with their query field
//! names (see [`crate::model::Record`]).

mod output;
mod text;

pub use output::{ChangeResult, ListResult};
pub use text::{
    TextFormatOptions, format_record_detail, format_record_line, format_record_line_with,
    format_status_icon, format_status_icon_colored, terminal_width, truncate_text,
};
