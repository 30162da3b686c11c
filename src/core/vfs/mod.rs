//! Embedded read-only file system
//!
//! [`EmbeddedFs`] serves a [`Snapshot`] the way a live file system would:
//! paths are cleaned before lookup, directories list their children in
//! stored order, and files are fully seekable whether their content is stored
//! raw or compressed.
//!
//! The snapshot is shared immutably behind an `Arc`; every [`Handle`] owns its
//! own cursors (and decoder, for compressed files) and is meant for a single
//! reader at a time.

mod compressed;
mod dir;
mod file;


pub use compressed::CompressedFile;
pub use dir::DirHandle;
pub use file::RawFile;

use crate::error::{EmbedError, Result};
use crate::metadata::Metadata;
use crate::path;
use crate::persist::{self, PersistOptions};
use crate::source::{ReadSeek, SourceFs, SourceMeta};
use crate::toc::{Record, Snapshot, Storage};
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;
use tracing::debug;

/// Read-only file system over a snapshot
///
/// # Examples
///
/// ```
/// use cartridge_embed::{EmbeddedFs, SnapshotBuilder};
/// use cartridge_embed::source::MemorySource;
/// use std::io::Read;
///
/// let source = MemorySource::new().with_file("/a/b.txt", b"hello".to_vec());
/// let fs = EmbeddedFs::new(SnapshotBuilder::new().build(&source)?);
///
/// let mut text = String::new();
/// fs.open("a/../a/b.txt")?.read_to_string(&mut text)?;
/// assert_eq!(text, "hello");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct EmbeddedFs {
    snapshot: Arc<Snapshot>,
}

impl EmbeddedFs {
    pub fn new(snapshot: Snapshot) -> Self {
        Self::from_shared(Arc::new(snapshot))
    }

    pub fn from_shared(snapshot: Arc<Snapshot>) -> Self {
        EmbeddedFs { snapshot }
    }

    /// Reconstruct from a persisted snapshot
    pub fn from_bytes(options: &PersistOptions, bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(persist::from_bytes(options, bytes)?))
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    fn lookup(&self, raw_path: &str) -> Result<(String, &Record)> {
        let cleaned = path::clean(raw_path);
        match self.snapshot.get(&cleaned) {
            Some(record) => Ok((cleaned, record)),
            None => Err(EmbedError::NotFound(cleaned)),
        }
    }

    /// Open `path` (cleaned against the root before lookup)
    pub fn open(&self, path: &str) -> Result<Handle> {
        let (cleaned, record) = self.lookup(path)?;
        debug!("Opening {}", cleaned);

        Ok(match record {
            Record::Dir(dir) => Handle::Dir(DirHandle::new(Arc::clone(dir), Arc::clone(&self.snapshot))),
            Record::File(file) => match file.storage {
                Storage::Compressed { .. } => Handle::Compressed(CompressedFile::open(Arc::clone(file))?),
                Storage::Raw { .. } => Handle::File(RawFile::open(Arc::clone(file))?),
            },
        })
    }

    pub fn exists(&self, path: &str) -> bool {
        self.lookup(path).is_ok()
    }

    pub fn metadata(&self, path: &str) -> Result<Metadata> {
        Ok(self.lookup(path)?.1.metadata())
    }

    /// Read a whole file into memory
    pub fn read(&self, path: &str) -> Result<Vec<u8>> {
        let mut handle = self.open(path)?;
        if handle.is_dir() {
            return Err(EmbedError::unsupported("read", handle.path()));
        }
        let mut out = Vec::new();
        handle.read_to_end(&mut out).map_err(unwrap_io)?;
        Ok(out)
    }

    /// All children of a directory
    pub fn read_dir(&self, path: &str) -> Result<Vec<Metadata>> {
        let mut handle = self.open(path)?;
        handle.read_children(0)
    }
}

/// Recover the crate error carried inside an `io::Error`, if any
fn unwrap_io(err: io::Error) -> EmbedError {
    let ours = err.get_ref().is_some_and(|inner| inner.is::<EmbedError>());
    if !ours {
        return EmbedError::Io(err);
    }
    let kind = err.kind();
    match err.into_inner().map(|inner| inner.downcast::<EmbedError>()) {
        Some(Ok(embed)) => *embed,
        Some(Err(other)) => EmbedError::Io(io::Error::new(kind, other)),
        None => EmbedError::Io(kind.into()),
    }
}

/// An open file or directory
#[derive(Debug)]
pub enum Handle {
    Dir(DirHandle),
    File(RawFile),
    Compressed(CompressedFile),
}

impl Handle {
    pub fn path(&self) -> &str {
        match self {
            Handle::Dir(d) => d.path(),
            Handle::File(f) => f.path(),
            Handle::Compressed(c) => c.path(),
        }
    }

    pub fn stat(&self) -> Metadata {
        match self {
            Handle::Dir(d) => d.stat(),
            Handle::File(f) => f.stat(),
            Handle::Compressed(c) => c.stat(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Handle::Dir(_))
    }

    /// True if the file's content is stored compressed
    pub fn is_compressed(&self) -> bool {
        matches!(self, Handle::Compressed(_))
    }

    /// Stored compressed stream, for compressed files only
    pub fn compressed_bytes(&self) -> Option<&[u8]> {
        match self {
            Handle::Compressed(c) => Some(c.compressed_bytes()),
            _ => None,
        }
    }

    /// See [`DirHandle::read_children`]. Fails with
    /// [`EmbedError::Unsupported`] on files.
    pub fn read_children(&mut self, count: usize) -> Result<Vec<Metadata>> {
        match self {
            Handle::Dir(d) => d.read_children(count),
            Handle::File(f) => Err(EmbedError::unsupported("read_children", f.path())),
            Handle::Compressed(c) => Err(EmbedError::unsupported("read_children", c.path())),
        }
    }

    /// Release resources held by the handle. Closing twice is a no-op.
    pub fn close(&mut self) {
        match self {
            Handle::Dir(d) => d.close(),
            Handle::File(f) => f.close(),
            Handle::Compressed(c) => c.close(),
        }
    }
}

impl Read for Handle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Handle::Dir(d) => Err(EmbedError::unsupported("read", d.path()).into()),
            Handle::File(f) => f.read(buf),
            Handle::Compressed(c) => c.read(buf),
        }
    }
}

impl Seek for Handle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Handle::Dir(d) => Ok(d.seek(pos)?),
            Handle::File(f) => f.seek(pos),
            Handle::Compressed(c) => c.seek(pos),
        }
    }
}

impl SourceFs for EmbeddedFs {
    fn stat(&self, path: &str) -> io::Result<SourceMeta> {
        let (_, record) = self.lookup(path)?;
        Ok(match record {
            Record::Dir(d) => SourceMeta::dir(d.modified),
            Record::File(f) => SourceMeta::file(f.uncompressed_size, f.modified),
        })
    }

    fn list_children(&self, path: &str) -> io::Result<Vec<String>> {
        match self.lookup(path)? {
            (_, Record::Dir(d)) => Ok(d.entries.iter().map(|p| path::base(p).to_string()).collect()),
            (cleaned, Record::File(_)) => Err(EmbedError::unsupported("list_children", &cleaned).into()),
        }
    }

    fn open_for_read(&self, path: &str) -> io::Result<Box<dyn ReadSeek + '_>> {
        let handle = self.open(path)?;
        if handle.is_dir() {
            return Err(EmbedError::unsupported("open_for_read", handle.path()).into());
        }
        Ok(Box::new(handle))
    }
}
