//! Command implementations.
//!
//! Each command exposes `execute(.., json, &CliOverrides) -> Result<()>`.
//! Shared plumbing lives here: opening the configured store and collecting
//! message text from a flag, a file or the editor.

pub mod add;
pub mod assign;
pub mod close;
pub mod comment;
pub mod completions;
pub mod dup;
pub mod export;
pub mod init;
pub mod list;
pub mod reopen;
pub mod show;

use crate::cli::MessageSource;
use crate::config::{self, CliOverrides, Config};
use crate::error::{Result, RotsitError};
use crate::storage::RecordStore;
use anyhow::{Context, anyhow};
use serde::Serialize;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::process::Command;
use tracing::debug;

/// Resolved configuration plus the store it points at.
pub(crate) fn open_store(cli: &CliOverrides) -> Result<(Config, RecordStore)> {
    let config = config::load_config(cli)?;
    let store = RecordStore::open(&config.db_path)?;
    Ok((config, store))
}

/// Whether colored text output is wanted on stdout.
pub(crate) fn use_color() -> bool {
    io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Collect message text: `--message`, then `--file` (`-` is stdin), then
/// the editor. Surrounding whitespace is trimmed; an empty message aborts.
pub(crate) fn read_message(source: &MessageSource, config: &Config, what: &str) -> Result<String> {
    let text = if let Some(message) = &source.message {
        message.clone()
    } else if let Some(path) = &source.file {
        if path.as_os_str() == "-" {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading message from stdin")?;
            buf
        } else {
            fs::read_to_string(path)
                .with_context(|| format!("reading message from {}", path.display()))?
        }
    } else {
        edit_message(&config::resolve_editor(config), what)?
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(RotsitError::validation(what, "empty message, aborting"));
    }
    Ok(text)
}

/// Open `editor` on a scratch file and return what was saved, minus
/// `#` comment lines.
fn edit_message(editor: &str, what: &str) -> Result<String> {
    let file = tempfile::Builder::new()
        .prefix("rotsit-")
        .suffix(".txt")
        .tempfile()
        .context("creating message file")?;
    fs::write(
        file.path(),
        format!("\n# Enter the {what}. Lines starting with '#' are ignored.\n"),
    )
    .context("writing message template")?;

    let mut parts = editor.split_whitespace();
    let program = parts.next().ok_or_else(|| anyhow!("no editor configured"))?;
    debug!(editor, path = %file.path().display(), "launching editor");
    let status = Command::new(program)
        .args(parts)
        .arg(file.path())
        .status()
        .with_context(|| format!("launching editor '{editor}'"))?;
    if !status.success() {
        return Err(anyhow!("editor '{editor}' exited with {status}").into());
    }

    let text = fs::read_to_string(file.path()).context("reading message file")?;
    Ok(strip_comment_lines(&text))
}

fn strip_comment_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}
