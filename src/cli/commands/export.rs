//! Export command implementation.

use super::{open_store, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::format::format_record_detail;
use crate::model::Record;
use tracing::info;

const SEPARATOR: &str = "==============================";

/// Plain-text dump of every record, separated by rule lines.
#[must_use]
pub fn render(records: &[Record]) -> String {
    records
        .iter()
        .map(|record| format_record_detail(record, false))
        .collect::<Vec<_>>()
        .join(&format!("{SEPARATOR}\n"))
}

/// Execute the export command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened.
pub fn execute(json: bool, cli: &CliOverrides) -> Result<()> {
    let (_config, store) = open_store(cli)?;
    info!(records = store.len(), "Exporting issues");

    if json {
        return print_json(store.records());
    }
    print!("{}", render(store.records()));
    Ok(())
}
