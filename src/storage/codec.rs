//! Flat-file record encoding.
//!
//! ```text
//! 1\n
//! GUID:0x...<FD>ORDER:1<FD>...<FD>COMMENT:guid\tuser\ttime\ttext<FD>\n
//! GUID:0x...<FD>...<FD>\n
//! ```
//!
//! The first line is the format version. Every field is `KEY:value`
//! followed by the field delimiter `\x0c\x08`; a newline after the last
//! delimiter ends the record. Values may span lines but may not contain the
//! delimiter.

use crate::model::{Comment, Record};
use thiserror::Error;

pub const FORMAT_VERSION: u32 = 1;
pub const FIELD_DELIM: &str = "\x0c\x08";
pub const RECORD_DELIM: &str = "\x0c\x08\n";
pub const COMMENT_KEY: &str = "COMMENT";

/// Why a database file could not be read or written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("missing format version line")]
    MissingVersion,
    #[error("unsupported format version '{found}' (expected {FORMAT_VERSION})")]
    UnsupportedVersion { found: String },
    #[error("record {record}: field '{field}' has no ':' separator")]
    MalformedField { record: usize, field: String },
    #[error("record {record}: comment is missing its guid, user or time")]
    MalformedComment { record: usize },
    #[error("data after the last complete record at byte {offset}")]
    Truncated { offset: usize },
    #[error("value of '{key}' contains the field delimiter")]
    DelimiterInValue { key: String },
    #[error("record {record} has no fields")]
    EmptyRecord { record: usize },
}

fn check_value(key: &str, value: &str) -> Result<(), CodecError> {
    if value.contains(FIELD_DELIM) || key.contains(FIELD_DELIM) {
        return Err(CodecError::DelimiterInValue {
            key: key.to_string(),
        });
    }
    Ok(())
}

fn encode_comment(comment: &Comment, record: usize) -> Result<String, CodecError> {
    if [&comment.guid, &comment.user, &comment.time]
        .iter()
        .any(|part| part.contains('\t'))
    {
        return Err(CodecError::MalformedComment { record });
    }
    Ok(format!(
        "{}\t{}\t{}\t{}",
        comment.guid, comment.user, comment.time, comment.text
    ))
}

fn decode_comment(value: &str, record: usize) -> Result<Comment, CodecError> {
    let mut parts = value.splitn(4, '\t');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(guid), Some(user), Some(time), text) => Ok(Comment {
            guid: guid.to_string(),
            user: user.to_string(),
            time: time.to_string(),
            text: text.unwrap_or_default().to_string(),
        }),
        _ => Err(CodecError::MalformedComment { record }),
    }
}

/// Serialize records to the file format.
///
/// # Errors
///
/// [`CodecError::DelimiterInValue`] or [`CodecError::MalformedComment`] when
/// a value cannot be represented.
pub fn encode_records(records: &[Record]) -> Result<String, CodecError> {
    let mut out = format!("{FORMAT_VERSION}\n");
    for (index, record) in records.iter().enumerate() {
        let number = index + 1;
        let mut fields = 0;
        for (key, value) in record.fields() {
            check_value(key, value)?;
            out.push_str(key);
            out.push(':');
            out.push_str(value);
            out.push_str(FIELD_DELIM);
            fields += 1;
        }
        for comment in record.comments() {
            let value = encode_comment(comment, number)?;
            check_value(COMMENT_KEY, &value)?;
            out.push_str(COMMENT_KEY);
            out.push(':');
            out.push_str(&value);
            out.push_str(FIELD_DELIM);
            fields += 1;
        }
        if fields == 0 {
            return Err(CodecError::EmptyRecord { record: number });
        }
        out.push('\n');
    }
    Ok(out)
}

fn decode_record(body: &str, number: usize) -> Result<Record, CodecError> {
    let mut record = Record::new();
    for field in body.split(FIELD_DELIM) {
        let Some((key, value)) = field.split_once(':') else {
            return Err(CodecError::MalformedField {
                record: number,
                field: field.to_string(),
            });
        };
        if key == COMMENT_KEY {
            record.add_comment(decode_comment(value, number)?);
        } else {
            record.set_field(key, value);
        }
    }
    Ok(record)
}

/// Parse the file format into records.
///
/// # Errors
///
/// Any [`CodecError`] describing the first malformed part of the input.
pub fn decode_records(input: &str) -> Result<Vec<Record>, CodecError> {
    let Some((version, mut rest)) = input.split_once('\n') else {
        return Err(CodecError::MissingVersion);
    };
    let version = version.trim_end_matches('\r');
    if version.is_empty() {
        return Err(CodecError::MissingVersion);
    }
    if version.parse::<u32>().ok() != Some(FORMAT_VERSION) {
        return Err(CodecError::UnsupportedVersion {
            found: version.to_string(),
        });
    }

    let mut records = Vec::new();
    while !rest.is_empty() {
        let number = records.len() + 1;
        let Some((body, tail)) = rest.split_once(RECORD_DELIM) else {
            return Err(CodecError::Truncated {
                offset: input.len() - rest.len(),
            });
        };
        if body.is_empty() {
            return Err(CodecError::EmptyRecord { record: number });
        }
        records.push(decode_record(body, number)?);
        rest = tail;
    }
    Ok(records)
}
