//! Snapshot table of contents
//!
//! A [`Snapshot`] maps every absolute path of the captured tree to exactly one
//! [`Record`]: a directory with its sorted child paths, or a file whose content
//! is stored either compressed or raw. Snapshots are built once by
//! [`crate::builder::SnapshotBuilder`] and never mutated afterwards.

use crate::compression::CompressionMethod;
use crate::metadata::Metadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// How a file's bytes are stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Storage {
    /// A complete compressed stream that decodes to `uncompressed_size` bytes.
    /// Only chosen when strictly smaller than the original.
    Compressed {
        method: CompressionMethod,
        content: Arc<[u8]>,
    },
    /// The original bytes, unchanged
    Raw { content: Arc<[u8]> },
}

impl Storage {
    /// Bytes held by the snapshot for this file
    pub fn stored_len(&self) -> u64 {
        match self {
            Storage::Compressed { content, .. } | Storage::Raw { content } => content.len() as u64,
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self, Storage::Compressed { .. })
    }
}

/// A captured file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub name: String,
    pub modified: Option<DateTime<Utc>>,
    pub uncompressed_size: u64,
    pub storage: Storage,
}

impl FileRecord {
    pub fn metadata(&self) -> Metadata {
        Metadata::file(self.name.clone(), self.uncompressed_size, self.modified)
    }
}

/// A captured directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirRecord {
    pub path: String,
    pub name: String,
    pub modified: Option<DateTime<Utc>>,
    /// Absolute child paths, sorted by byte order
    pub entries: Vec<String>,
}

impl DirRecord {
    pub fn metadata(&self) -> Metadata {
        Metadata::directory(self.name.clone(), self.modified)
    }
}

/// A snapshot entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Record {
    File(Arc<FileRecord>),
    Dir(Arc<DirRecord>),
}

impl Record {
    pub fn path(&self) -> &str {
        match self {
            Record::File(f) => &f.path,
            Record::Dir(d) => &d.path,
        }
    }

    pub fn metadata(&self) -> Metadata {
        match self {
            Record::File(f) => f.metadata(),
            Record::Dir(d) => d.metadata(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Record::Dir(_))
    }
}

/// Counters describing a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotStats {
    pub directories: usize,
    pub raw_files: usize,
    pub compressed_files: usize,
    /// Sum of uncompressed file sizes
    pub total_bytes: u64,
    /// Sum of bytes actually held (compressed or raw)
    pub stored_bytes: u64,
}

/// Immutable table of contents for a captured tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    records: BTreeMap<String, Record>,
    has_compressed_file: bool,
    has_file: bool,
}

impl Snapshot {
    pub(crate) fn from_parts(
        records: BTreeMap<String, Record>,
        has_compressed_file: bool,
        has_file: bool,
    ) -> Self {
        Snapshot {
            records,
            has_compressed_file,
            has_file,
        }
    }

    /// Look up a record by its exact, already-cleaned path
    pub fn get(&self, path: &str) -> Option<&Record> {
        self.records.get(path)
    }

    /// At least one file is stored compressed
    pub fn has_compressed_file(&self) -> bool {
        self.has_compressed_file
    }

    /// At least one file is stored raw
    pub fn has_file(&self) -> bool {
        self.has_file
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in path order
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn files(&self) -> impl Iterator<Item = &Arc<FileRecord>> {
        self.records.values().filter_map(|r| match r {
            Record::File(f) => Some(f),
            Record::Dir(_) => None,
        })
    }

    pub fn dirs(&self) -> impl Iterator<Item = &Arc<DirRecord>> {
        self.records.values().filter_map(|r| match r {
            Record::Dir(d) => Some(d),
            Record::File(_) => None,
        })
    }

    pub fn stats(&self) -> SnapshotStats {
        let mut stats = SnapshotStats::default();
        for record in self.records.values() {
            match record {
                Record::Dir(_) => stats.directories += 1,
                Record::File(f) => {
                    if f.storage.is_compressed() {
                        stats.compressed_files += 1;
                    } else {
                        stats.raw_files += 1;
                    }
                    stats.total_bytes += f.uncompressed_size;
                    stats.stored_bytes += f.storage.stored_len();
                }
            }
        }
        stats
    }
}
