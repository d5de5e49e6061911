//! Show command implementation.

use super::{open_store, print_json, use_color};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::format::format_record_detail;
use tracing::info;

/// Execute the show command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or any id does not
/// resolve to exactly one issue.
pub fn execute(ids: &[String], json: bool, cli: &CliOverrides) -> Result<()> {
    let (_config, store) = open_store(cli)?;
    info!(count = ids.len(), "Showing issues");

    let records = ids
        .iter()
        .map(|id| store.get(id))
        .collect::<Result<Vec<_>>>()?;

    if json {
        return print_json(&records);
    }

    let color = use_color();
    for (index, record) in records.iter().enumerate() {
        if index > 0 {
            println!();
        }
        print!("{}", format_record_detail(record, color));
    }
    Ok(())
}
