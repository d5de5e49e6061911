//! Dup command implementation.

use super::{open_store, print_json, read_message};
use crate::cli::DupArgs;
use crate::config::CliOverrides;
use crate::error::{Result, RotsitError};
use crate::format::ChangeResult;
use crate::model::{Field, Record, Status};
use tracing::info;

/// Mark `record` as a duplicate of the issue `original`.
///
/// # Errors
///
/// `InvalidTransition` when the issue is already closed or a duplicate,
/// `Validation` when it would duplicate itself.
pub fn mark_duplicate(record: &mut Record, original: &str, by: &str, message: &str) -> Result<()> {
    if record.guid() == original {
        return Err(RotsitError::validation(
            "original",
            "an issue cannot duplicate itself",
        ));
    }
    let status = record.status()?;
    if status.is_terminal() {
        return Err(RotsitError::InvalidTransition {
            id: record.guid().to_string(),
            action: "mark as duplicate",
            status: status.to_string(),
        });
    }
    record.set(Field::Status, Status::Duplicate.as_str());
    record.set(Field::DupBy, by);
    record.set(Field::Duplicates, original);
    record.set(Field::DupMsg, message);
    Ok(())
}

/// Execute the dup command.
///
/// # Errors
///
/// Returns an error if either issue cannot be resolved, the transition is
/// not allowed, or the store cannot be saved.
pub fn execute(args: &DupArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (config, mut store) = open_store(cli)?;
    let guid = store.resolve(&args.id)?;
    let original = store.resolve(&args.original)?;

    // Validate on a copy so a bad request never opens the editor.
    mark_duplicate(&mut store.get(&guid)?.clone(), &original, &config.actor, "")?;
    let message = read_message(&args.source, &config, "duplicate message")?;

    info!(guid = %guid, original = %original, actor = %config.actor, "Marking duplicate");
    let record = store.get_mut(&guid)?;
    mark_duplicate(record, &original, &config.actor, &message)?;
    let result = ChangeResult::new("dup", record);
    store.save()?;

    if json {
        print_json(&result)?;
    } else {
        println!("Marked {guid} as a duplicate of {original}");
    }
    Ok(())
}
