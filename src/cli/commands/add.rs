//! Add command implementation.

use super::{open_store, print_json, read_message};
use crate::cli::MessageArgs;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::format::ChangeResult;
use crate::model::{Field, Record, Status};
use crate::util::{format_record_time, generate_guid};
use chrono::{DateTime, Local};
use tracing::info;

/// Build a new open record. `exists` reports GUIDs already taken.
pub fn new_record<F>(
    actor: &str,
    message: &str,
    created_at: DateTime<Local>,
    order: usize,
    exists: F,
) -> Record
where
    F: Fn(&str) -> bool,
{
    let mut record = Record::new();
    record.set(Field::Guid, generate_guid(actor, message, created_at, exists));
    record.set(Field::Order, order.to_string());
    record.set(Field::OpenedBy, actor);
    record.set(Field::OpenedOn, format_record_time(&created_at));
    record.set(Field::Message, message);
    record.set(Field::Status, Status::Open.as_str());
    record
}

/// Execute the add command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or saved, or the message
/// is empty.
pub fn execute(args: &MessageArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (config, mut store) = open_store(cli)?;
    let message = read_message(&args.source, &config, "issue description")?;

    let record = {
        let guids = store.guids();
        new_record(
            &config.actor,
            &message,
            Local::now(),
            store.len() + 1,
            |guid| guids.contains(&guid),
        )
    };
    let result = ChangeResult::new("add", &record)
        .with_order(record.get(Field::Order).unwrap_or_default());
    info!(guid = %result.guid, actor = %config.actor, "Adding issue");

    store.push(record);
    store.save()?;

    if json {
        print_json(&result)?;
    } else {
        println!("Added {}", result.guid);
    }
    Ok(())
}
