//! Close command implementation.

use super::{open_store, print_json, read_message};
use crate::cli::IdMessageArgs;
use crate::config::CliOverrides;
use crate::error::{Result, RotsitError};
use crate::format::ChangeResult;
use crate::model::{Field, Record, Status};
use crate::util::format_record_time;
use chrono::{DateTime, Local};
use tracing::info;

/// Close an open issue.
///
/// # Errors
///
/// `InvalidTransition` when the issue is already closed or a duplicate,
/// `InvalidStatus` when its status cannot be read.
pub fn close(record: &mut Record, by: &str, message: &str, at: DateTime<Local>) -> Result<()> {
    let status = record.status()?;
    if status.is_terminal() {
        return Err(RotsitError::InvalidTransition {
            id: record.guid().to_string(),
            action: "close",
            status: status.to_string(),
        });
    }
    record.set(Field::Status, Status::Closed.as_str());
    record.set(Field::ClosedBy, by);
    record.set(Field::ClosedOn, format_record_time(&at));
    record.set(Field::ClosedMsg, message);
    Ok(())
}

/// Execute the close command.
///
/// # Errors
///
/// Returns an error if the issue cannot be resolved or closed, or the store
/// cannot be saved.
pub fn execute(args: &IdMessageArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (config, mut store) = open_store(cli)?;
    let guid = store.resolve(&args.id)?;

    // Refuse before asking for a message.
    let status = store.get(&guid)?.status()?;
    if status.is_terminal() {
        return Err(RotsitError::InvalidTransition {
            id: guid,
            action: "close",
            status: status.to_string(),
        });
    }
    let message = read_message(&args.source, &config, "close message")?;

    info!(guid = %guid, actor = %config.actor, "Closing issue");
    let record = store.get_mut(&guid)?;
    close(record, &config.actor, &message, Local::now())?;
    let result = ChangeResult::new("close", record);
    store.save()?;

    if json {
        print_json(&result)?;
    } else {
        println!("Closed {guid}");
    }
    Ok(())
}
