//! List command implementation.

use super::{open_store, print_json, use_color};
use crate::cli::ListArgs;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::format::{ListResult, TextFormatOptions, format_record_line_with, terminal_width};
use crate::model::Record;
use crate::query::{QueryError, filter};
use std::io::{self, IsTerminal};
use tracing::{debug, info};

/// Records matching `expr`, or all of them when it is blank.
///
/// # Errors
///
/// Tokenize and syntax errors from the query.
pub fn select<'a>(records: &'a [Record], expr: &str) -> Result<Vec<&'a Record>> {
    if expr.trim().is_empty() {
        return Ok(records.iter().collect());
    }
    match filter(records, expr) {
        Ok(selected) => Ok(selected),
        Err(QueryError::NoRecords) => {
            debug!(query = expr, "no records to query");
            Ok(Vec::new())
        }
        Err(err) => Err(err.into()),
    }
}

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the expression is
/// malformed.
pub fn execute(args: &ListArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (_config, store) = open_store(cli)?;
    let expr = args.expr.join(" ");
    info!(query = %expr, records = store.len(), "Listing issues");

    let selected = select(store.records(), &expr)?;

    if json {
        let query = Some(expr.as_str()).filter(|expr| !expr.trim().is_empty());
        return print_json(&ListResult::new(query, selected));
    }

    if selected.is_empty() {
        println!("No issues found.");
        return Ok(());
    }

    let options = TextFormatOptions {
        use_color: use_color(),
        max_width: io::stdout().is_terminal().then(terminal_width),
    };
    for record in selected {
        println!("{}", format_record_line_with(record, options));
    }
    Ok(())
}
