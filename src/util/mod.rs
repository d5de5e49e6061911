//! Shared utilities for `rotsit`.
//!
//! Common functionality used across modules:
//! - Loose date parsing (queries and stored timestamps)
//! - Record timestamp formatting
//! - GUID generation and prefix resolution (SHA256)

pub mod date;
pub mod id;
pub mod time;

pub use date::{DateError, parse_date};
pub use id::{MatchType, find_matching_ids, generate_guid, normalize_id, resolve_id};
pub use time::{RECORD_TIME_FORMAT, format_record_time, now_record_time};
