//! Reopen command implementation.

use super::comment::add_comment;
use super::{open_store, print_json, read_message};
use crate::cli::IdMessageArgs;
use crate::config::CliOverrides;
use crate::error::{Result, RotsitError};
use crate::format::ChangeResult;
use crate::model::{Field, Record, Status};
use chrono::{DateTime, Local};
use tracing::info;

const CLEARED_ON_REOPEN: [Field; 6] = [
    Field::ClosedBy,
    Field::ClosedOn,
    Field::ClosedMsg,
    Field::DupBy,
    Field::Duplicates,
    Field::DupMsg,
];

/// Reopen a closed or duplicate issue, keeping the reason as a comment.
///
/// # Errors
///
/// `InvalidTransition` when the issue is already open.
pub fn reopen(record: &mut Record, by: &str, message: &str, at: DateTime<Local>) -> Result<()> {
    let status = record.status()?;
    if !status.is_terminal() {
        return Err(RotsitError::InvalidTransition {
            id: record.guid().to_string(),
            action: "reopen",
            status: status.to_string(),
        });
    }
    for field in CLEARED_ON_REOPEN {
        record.remove(field);
    }
    record.set(Field::Status, Status::Open.as_str());
    add_comment(record, by, message, at);
    Ok(())
}

/// Execute the reopen command.
///
/// # Errors
///
/// Returns an error if the issue cannot be resolved or reopened, or the
/// store cannot be saved.
pub fn execute(args: &IdMessageArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (config, mut store) = open_store(cli)?;
    let guid = store.resolve(&args.id)?;

    let status = store.get(&guid)?.status()?;
    if !status.is_terminal() {
        return Err(RotsitError::InvalidTransition {
            id: guid,
            action: "reopen",
            status: status.to_string(),
        });
    }
    let message = read_message(&args.source, &config, "reason for reopening")?;

    info!(guid = %guid, actor = %config.actor, "Reopening issue");
    let record = store.get_mut(&guid)?;
    reopen(record, &config.actor, &message, Local::now())?;
    let result = ChangeResult::new("reopen", record);
    store.save()?;

    if json {
        print_json(&result)?;
    } else {
        println!("Reopened {guid}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::close::close;
    use crate::logging::init_test_logging;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap()
    }

    fn record() -> Record {
        let mut record = Record::new();
        record.set(Field::Guid, "0x00000000000000ff");
        record.set(Field::Message, "Crash on start");
        record.set(Field::Status, "open");
        record
    }

    #[test]
    fn test_reopen_clears_closing_fields_and_comments() {
        init_test_logging();
        let mut record = record();
        close(&mut record, "alice", "cannot reproduce", at()).unwrap();
        reopen(&mut record, "bob", "still crashes on 1.3", at()).unwrap();

        assert_eq!(record.status().unwrap(), Status::Open);
        for field in CLEARED_ON_REOPEN {
            assert_eq!(record.get(field), None, "{field} should be cleared");
        }
        assert_eq!(record.comments().len(), 1);
        assert_eq!(record.comments()[0].user, "bob");
        assert_eq!(record.comments()[0].text, "still crashes on 1.3");
        assert_eq!(record.message(), "Crash on start");
    }

    #[test]
    fn test_reopen_clears_duplicate_fields() {
        init_test_logging();
        let mut record = record();
        record.set(Field::Status, "duplicate");
        record.set(Field::DupBy, "alice");
        record.set(Field::Duplicates, "0x0000000000000001");
        record.set(Field::DupMsg, "same crash");
        reopen(&mut record, "bob", "different crash", at()).unwrap();
        assert_eq!(record.get(Field::Duplicates), None);
        assert_eq!(record.get(Field::Status), Some("open"));
    }

    #[test]
    fn test_open_issue_cannot_be_reopened() {
        init_test_logging();
        let mut record = record();
        let err = reopen(&mut record, "bob", "why", at()).unwrap_err();
        assert!(matches!(err, RotsitError::InvalidTransition { action: "reopen", .. }));
        assert!(record.comments().is_empty());
    }
}
