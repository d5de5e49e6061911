//! Core data types for `rotsit`.
//!
//! This module defines the fundamental types used throughout the application:
//! - `Field` - The named fields a record may carry
//! - `Status` - Issue lifecycle states
//! - `Comment` - Issue comments
//! - `Record` - One issue, as an ordered list of stored fields

use crate::error::RotsitError;
use crate::query::FieldSource;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Record fields known to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Guid,
    Order,
    OpenedBy,
    OpenedOn,
    Message,
    Status,
    AssignedBy,
    AssignedTo,
    AssignedOn,
    ClosedBy,
    ClosedOn,
    ClosedMsg,
    DupBy,
    Duplicates,
    DupMsg,
}

impl Field {
    pub const ALL: [Self; 15] = [
        Self::Guid,
        Self::Order,
        Self::OpenedBy,
        Self::OpenedOn,
        Self::Message,
        Self::Status,
        Self::AssignedBy,
        Self::AssignedTo,
        Self::AssignedOn,
        Self::ClosedBy,
        Self::ClosedOn,
        Self::ClosedMsg,
        Self::DupBy,
        Self::Duplicates,
        Self::DupMsg,
    ];

    /// Name used in query expressions.
    #[must_use]
    pub const fn query_name(self) -> &'static str {
        match self {
            Self::Guid => "guid",
            Self::Order => "order",
            Self::OpenedBy => "opened_by",
            Self::OpenedOn => "opened_on",
            Self::Message => "message",
            Self::Status => "status",
            Self::AssignedBy => "assigned_by",
            Self::AssignedTo => "assigned_to",
            Self::AssignedOn => "assigned_on",
            Self::ClosedBy => "closed_by",
            Self::ClosedOn => "closed_on",
            Self::ClosedMsg => "closed_msg",
            Self::DupBy => "dup_by",
            Self::Duplicates => "duplicates",
            Self::DupMsg => "dup_msg",
        }
    }

    /// Key written to the database file.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Guid => "GUID",
            Self::Order => "ORDER",
            Self::OpenedBy => "OPENED-BY",
            Self::OpenedOn => "CREATED-ON",
            Self::Message => "ISSUE-DESCR",
            Self::Status => "STATUS",
            Self::AssignedBy => "ASSIGNED-BY",
            Self::AssignedTo => "ASSIGNED-TO",
            Self::AssignedOn => "ASSIGNED-ON",
            Self::ClosedBy => "CLOSED-BY",
            Self::ClosedOn => "CLOSED-ON",
            Self::ClosedMsg => "CLOSE-MSG",
            Self::DupBy => "DUPLICATED-BY",
            Self::Duplicates => "DUPLICATES",
            Self::DupMsg => "DUPLICATE-MSG",
        }
    }

    /// Case-insensitive lookup by query name.
    #[must_use]
    pub fn from_query_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.query_name().eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_name())
    }
}

/// Issue lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    Closed,
    Duplicate,
}

impl Status {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Duplicate => "duplicate",
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Duplicate)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = RotsitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "duplicate" => Ok(Self::Duplicate),
            other => Err(RotsitError::InvalidStatus {
                status: other.to_string(),
            }),
        }
    }
}

/// A comment on an issue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub guid: String,
    pub user: String,
    pub time: String,
    pub text: String,
}

/// One issue: stored fields in file order, followed by its comments.
///
/// Keys the tracker does not know are kept as-is so that saving never
/// drops data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
    comments: Vec<Comment>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored fields, in order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    #[must_use]
    pub fn get_field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the value of `key`, or append it when absent.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn remove_field(&mut self, key: &str) -> Option<String> {
        let index = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(index).1)
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.get_field(field.key())
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.set_field(field.key(), value);
    }

    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.remove_field(field.key())
    }

    #[must_use]
    pub fn guid(&self) -> &str {
        self.get(Field::Guid).unwrap_or_default()
    }

    #[must_use]
    pub fn message(&self) -> &str {
        self.get(Field::Message).unwrap_or_default()
    }

    /// Parsed status; records without one count as open.
    ///
    /// # Errors
    ///
    /// Returns [`RotsitError::InvalidStatus`] for an unrecognised value.
    pub fn status(&self) -> Result<Status, RotsitError> {
        self.get(Field::Status).map_or(Ok(Status::Open), str::parse::<Status>)
    }

    /// First line of the message, for one-line listings.
    #[must_use]
    pub fn summary(&self) -> &str {
        self.message().lines().next().unwrap_or_default()
    }
}

impl FieldSource for Record {
    fn field_value(&self, name: &str) -> Option<&str> {
        Field::from_query_name(name).and_then(|field| self.get(field))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        for (key, value) in &self.fields {
            match Field::from_key(key) {
                Some(field) => map.serialize_entry(field.query_name(), value)?,
                None => map.serialize_entry(key, value)?,
            }
        }
        map.serialize_entry("comments", &self.comments)?;
        map.end()
    }
}
