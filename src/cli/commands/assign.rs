//! Assign command implementation.

use super::{open_store, print_json};
use crate::cli::AssignArgs;
use crate::config::CliOverrides;
use crate::error::{Result, RotsitError};
use crate::format::ChangeResult;
use crate::model::{Field, Record};
use crate::util::format_record_time;
use chrono::{DateTime, Local};
use tracing::info;

/// Record that `by` assigned the issue to `user` at `at`.
///
/// # Errors
///
/// Returns a validation error when `user` is blank.
pub fn assign(record: &mut Record, user: &str, by: &str, at: DateTime<Local>) -> Result<()> {
    let user = user.trim();
    if user.is_empty() {
        return Err(RotsitError::validation("user", "assignee cannot be empty"));
    }
    record.set(Field::AssignedTo, user);
    record.set(Field::AssignedBy, by);
    record.set(Field::AssignedOn, format_record_time(&at));
    Ok(())
}

/// Execute the assign command.
///
/// # Errors
///
/// Returns an error if the issue cannot be resolved or the store cannot be
/// saved.
pub fn execute(args: &AssignArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (config, mut store) = open_store(cli)?;
    let guid = store.resolve(&args.id)?;

    info!(guid = %guid, user = %args.user, actor = %config.actor, "Assigning issue");
    let record = store.get_mut(&guid)?;
    assign(record, &args.user, &config.actor, Local::now())?;
    let result = ChangeResult::new("assign", record);
    store.save()?;

    if json {
        print_json(&result)?;
    } else {
        println!("Assigned {guid} to {}", args.user.trim());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;
    use chrono::TimeZone;

    #[test]
    fn test_assign_sets_all_three_fields() {
        init_test_logging();
        let mut record = Record::new();
        record.set(Field::Guid, "0x00000000000000ff");
        let at = Local.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap();

        assign(&mut record, " carol ", "alice", at).unwrap();
        assert_eq!(record.get(Field::AssignedTo), Some("carol"));
        assert_eq!(record.get(Field::AssignedBy), Some("alice"));
        assert_eq!(record.get(Field::AssignedOn), Some("Mon Oct 19 09:30:00 2026"));

        assign(&mut record, "dave", "alice", at).unwrap();
        assert_eq!(record.get(Field::AssignedTo), Some("dave"));
        assert_eq!(record.fields().count(), 4);
    }

    #[test]
    fn test_blank_assignee_is_rejected() {
        init_test_logging();
        let mut record = Record::new();
        let at = Local.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap();
        assert!(matches!(
            assign(&mut record, "  ", "alice", at),
            Err(RotsitError::Validation { .. })
        ));
    }
}
