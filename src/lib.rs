//! `rotsit`: a flat-file issue tracker with an expression query language.
//!
//! The library is split into:
//! - [`query`] - tokenizer, evaluator and record filtering
//! - [`model`] - records, fields and statuses
//! - [`storage`] - the flat-file codec and record store
//! - [`cli`] - the `rotsit` command line

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod model;
pub mod query;
pub mod storage;
pub mod util;

pub use error::{Result, RotsitError, StructuredError};
