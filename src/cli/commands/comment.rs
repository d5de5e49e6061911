//! Comment command implementation.

use super::{open_store, print_json, read_message};
use crate::cli::IdMessageArgs;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::{Comment, Record};
use crate::util::{format_record_time, generate_guid};
use chrono::{DateTime, Local};
use tracing::info;

/// Append a comment by `user` and return it.
pub fn add_comment(record: &mut Record, user: &str, text: &str, at: DateTime<Local>) -> Comment {
    let guid = {
        let taken: Vec<&str> = record
            .comments()
            .iter()
            .map(|comment| comment.guid.as_str())
            .chain(std::iter::once(record.guid()))
            .collect();
        generate_guid(user, text, at, |guid| taken.contains(&guid))
    };
    let comment = Comment {
        guid,
        user: user.to_string(),
        time: format_record_time(&at),
        text: text.to_string(),
    };
    record.add_comment(comment.clone());
    comment
}

/// Execute the comment command.
///
/// # Errors
///
/// Returns an error if the issue cannot be resolved, the message is empty,
/// or the store cannot be saved.
pub fn execute(args: &IdMessageArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (config, mut store) = open_store(cli)?;
    let guid = store.resolve(&args.id)?;
    let text = read_message(&args.source, &config, "comment")?;

    info!(guid = %guid, actor = %config.actor, "Commenting on issue");
    let comment = add_comment(store.get_mut(&guid)?, &config.actor, &text, Local::now());
    store.save()?;

    if json {
        print_json(&comment)?;
    } else {
        println!("Comment added to {guid}");
    }
    Ok(())
}
