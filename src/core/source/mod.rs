//! Source file system abstraction consumed by the snapshot builder
//!
//! The builder only needs three capabilities from whatever it snapshots:
//! stat a path, list a directory's children, and open a file as a seekable
//! byte stream. Paths are always absolute and `/`-rooted.
//!
//! Two implementations ship with the crate:
//! - [`HostDir`] - a real directory on the host file system
//! - [`MemorySource`] - an in-memory tree assembled in code
//!
//! [`Subtree`] re-roots any source at one of its directories.
//!
//! The embedded runtime ([`crate::vfs::EmbeddedFs`]) implements the trait as
//! well, so an embedded tree can be snapshotted again.

mod host;
mod memory;
mod subtree;

pub use host::HostDir;
pub use memory::MemorySource;
pub use subtree::Subtree;

use chrono::{DateTime, Utc};
use std::io::{self, Read, Seek};

/// Result of `stat` on a source path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMeta {
    /// True if the path is a directory
    pub is_dir: bool,

    /// Last modification time, if the source tracks one
    pub modified: Option<DateTime<Utc>>,

    /// Size in bytes (0 for directories)
    pub size: u64,
}

impl SourceMeta {
    pub fn file(size: u64, modified: Option<DateTime<Utc>>) -> Self {
        SourceMeta {
            is_dir: false,
            modified,
            size,
        }
    }

    pub fn dir(modified: Option<DateTime<Utc>>) -> Self {
        SourceMeta {
            is_dir: true,
            modified,
            size: 0,
        }
    }
}

/// A readable, seekable byte stream
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek + ?Sized> ReadSeek for T {}

/// Minimal read-only capability the snapshot builder needs from a tree
pub trait SourceFs {
    /// Stat an absolute path
    fn stat(&self, path: &str) -> io::Result<SourceMeta>;

    /// Names (not paths) of the immediate children of a directory, in any order
    fn list_children(&self, path: &str) -> io::Result<Vec<String>>;

    /// Open a file for reading; the stream must support seeking back to 0
    fn open_for_read(&self, path: &str) -> io::Result<Box<dyn ReadSeek + '_>>;
}

impl<S: SourceFs + ?Sized> SourceFs for &S {
    fn stat(&self, path: &str) -> io::Result<SourceMeta> {
        (**self).stat(path)
    }

    fn list_children(&self, path: &str) -> io::Result<Vec<String>> {
        (**self).list_children(path)
    }

    fn open_for_read(&self, path: &str) -> io::Result<Box<dyn ReadSeek + '_>> {
        (**self).open_for_read(path)
    }
}
