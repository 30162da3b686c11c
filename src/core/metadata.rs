//! File metadata structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Permission bits reported for embedded files
pub const FILE_MODE: u32 = 0o444;

/// Permission bits reported for embedded directories
pub const DIR_MODE: u32 = 0o755;

/// Directory bit, matching `S_IFDIR`
pub const MODE_DIR: u32 = 0o040000;

/// File type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    /// Regular file
    File,
    /// Directory
    Directory,
}

/// Metadata returned by `stat` and directory listings
///
/// `size` is the uncompressed size for files and 0 for directories.
/// `modified` is `None` when the source reported no modification time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Base name ("/" for the root)
    pub name: String,

    /// File type
    pub file_type: FileType,

    /// Size in bytes
    pub size: u64,

    /// Unix mode (permission bits plus [`MODE_DIR`] for directories)
    pub mode: u32,

    /// Last modification time (UTC)
    pub modified: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Create metadata for a regular file
    pub fn file(name: impl Into<String>, size: u64, modified: Option<DateTime<Utc>>) -> Self {
        Metadata {
            name: name.into(),
            file_type: FileType::File,
            size,
            mode: FILE_MODE,
            modified,
        }
    }

    /// Create metadata for a directory
    pub fn directory(name: impl Into<String>, modified: Option<DateTime<Utc>>) -> Self {
        Metadata {
            name: name.into(),
            file_type: FileType::Directory,
            size: 0,
            mode: DIR_MODE | MODE_DIR,
            modified,
        }
    }

    /// Check if this is a directory
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }

    /// Check if this is a regular file
    pub fn is_file(&self) -> bool {
        self.file_type == FileType::File
    }

    /// Permission bits without the type bit
    pub fn permissions(&self) -> u32 {
        self.mode & 0o777
    }
}

/// Normalize a source timestamp to UTC, treating the Unix epoch as unset.
///
/// Sources that cannot report a modification time usually hand back the epoch;
/// embedding it as a real date would be misleading.
pub fn normalize_mod_time(time: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    time.filter(|t| t.timestamp() != 0 || t.timestamp_subsec_nanos() != 0)
}
