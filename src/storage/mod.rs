//! Issue persistence.
//!
//! Records live in one flat text file ([`codec`]) that [`RecordStore`]
//! loads whole, edits in memory and writes back atomically.

pub mod codec;
mod store;

pub use codec::{CodecError, decode_records, encode_records};
pub use store::RecordStore;
