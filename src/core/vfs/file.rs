//! Buffer-backed reader for raw files

use super::compressed::seek_target;
use crate::error::{EmbedError, Result};
use crate::metadata::Metadata;
use crate::toc::{FileRecord, Storage};
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;
use tracing::warn;

/// An open raw file
#[derive(Debug)]
pub struct RawFile {
    record: Arc<FileRecord>,
    content: Arc<[u8]>,
    pos: u64,
    closed: bool,
}

impl RawFile {
    /// Open a reader over a raw record.
    ///
    /// Fails with [`EmbedError::Unsupported`] if the record is compressed, and
    /// with [`EmbedError::Corrupted`] if the content length disagrees with the
    /// recorded size.
    pub fn open(record: Arc<FileRecord>) -> Result<Self> {
        let content = match &record.storage {
            Storage::Raw { content } => Arc::clone(content),
            Storage::Compressed { .. } => {
                return Err(EmbedError::unsupported("open raw", &record.path));
            }
        };
        if content.len() as u64 != record.uncompressed_size {
            warn!(
                "Corrupted embedded content in {}: {} bytes stored, {} recorded",
                record.path,
                content.len(),
                record.uncompressed_size
            );
            return Err(EmbedError::Corrupted {
                path: record.path.clone(),
                reason: format!(
                    "{} bytes stored but {} recorded",
                    content.len(),
                    record.uncompressed_size
                ),
            });
        }
        Ok(RawFile {
            record,
            content,
            pos: 0,
            closed: false,
        })
    }

    pub fn path(&self) -> &str {
        &self.record.path
    }

    pub fn stat(&self) -> Metadata {
        self.record.metadata()
    }

    /// The full file content
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> io::Result<()> {
        if self.closed {
            return Err(EmbedError::Closed(self.record.path.clone()).into());
        }
        Ok(())
    }
}

impl Read for RawFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.ensure_open()?;
        let start = self.pos.min(self.len()) as usize;
        let remaining = &self.content[start..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n as u64;
        Ok(n)
    }
}

impl Seek for RawFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.ensure_open()?;
        self.pos = seek_target(pos, self.pos, self.len())?;
        Ok(self.pos)
    }
}
