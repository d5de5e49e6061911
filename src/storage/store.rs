//! Record store backed by a single flat file.

use super::codec::{decode_records, encode_records};
use crate::error::{Result, RotsitError};
use crate::model::Record;
use crate::util::id::{MatchType, resolve_id};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// All records of one database file, loaded into memory.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    records: Vec<Record>,
}

impl RecordStore {
    /// Load the database at `path`.
    ///
    /// # Errors
    ///
    /// `StoreNotFound` when the file does not exist, `Codec` when it cannot
    /// be decoded, `Io` for other read failures.
    pub fn open(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(RotsitError::StoreNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(err) => return Err(err.into()),
        };
        let records = decode_records(&text)?;
        debug!(path = %path.display(), records = records.len(), "opened issue database");
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    /// Create an empty database at `path`.
    ///
    /// # Errors
    ///
    /// `AlreadyInitialized` when the file exists and `force` is not set.
    pub fn init(path: &Path, force: bool) -> Result<Self> {
        if path.exists() && !force {
            return Err(RotsitError::AlreadyInitialized {
                path: path.to_path_buf(),
            });
        }
        let store = Self {
            path: path.to_path_buf(),
            records: Vec::new(),
        };
        store.save()?;
        info!(path = %path.display(), force, "initialized issue database");
        Ok(store)
    }

    /// Write all records back, replacing the file atomically.
    ///
    /// # Errors
    ///
    /// `Codec` when a record cannot be encoded, `Io` when writing fails.
    pub fn save(&self) -> Result<()> {
        let text = encode_records(&self.records)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        debug!(path = %self.path.display(), records = self.records.len(), "saved issue database");
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// GUIDs of all records, in file order.
    #[must_use]
    pub fn guids(&self) -> Vec<&str> {
        self.records.iter().map(Record::guid).collect()
    }

    /// Resolve a full GUID or unique prefix to the stored GUID.
    ///
    /// # Errors
    ///
    /// `IssueNotFound`, `AmbiguousId` or `Validation` for non-hex input.
    pub fn resolve(&self, id: &str) -> Result<String> {
        let (guid, match_type) = resolve_id(id, &self.guids())?;
        if match_type == MatchType::Prefix {
            debug!(input = id, guid = %guid, "resolved id prefix");
        }
        Ok(guid)
    }

    fn position(&self, id: &str) -> Result<usize> {
        let guid = self.resolve(id)?;
        self.records
            .iter()
            .position(|record| record.guid() == guid)
            .ok_or_else(|| RotsitError::IssueNotFound {
                id: guid,
                similar: Vec::new(),
            })
    }

    /// # Errors
    ///
    /// See [`RecordStore::resolve`].
    pub fn get(&self, id: &str) -> Result<&Record> {
        let index = self.position(id)?;
        Ok(&self.records[index])
    }

    /// # Errors
    ///
    /// See [`RecordStore::resolve`].
    pub fn get_mut(&mut self, id: &str) -> Result<&mut Record> {
        let index = self.position(id)?;
        Ok(&mut self.records[index])
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }
}
