//! Directory handles

use crate::error::{EmbedError, Result};
use crate::metadata::Metadata;
use crate::toc::{DirRecord, Snapshot};
use std::io::SeekFrom;
use std::sync::Arc;

/// An open directory with its own listing cursor
#[derive(Debug)]
pub struct DirHandle {
    record: Arc<DirRecord>,
    snapshot: Arc<Snapshot>,
    pos: usize,
    closed: bool,
}

impl DirHandle {
    pub(crate) fn new(record: Arc<DirRecord>, snapshot: Arc<Snapshot>) -> Self {
        DirHandle {
            record,
            snapshot,
            pos: 0,
            closed: false,
        }
    }

    pub fn path(&self) -> &str {
        &self.record.path
    }

    pub fn stat(&self) -> Metadata {
        self.record.metadata()
    }

    /// Absolute child paths in listing order
    pub fn entries(&self) -> &[String] {
        &self.record.entries
    }

    /// Read up to `count` children from the cursor, or all remaining ones when
    /// `count` is 0.
    ///
    /// With `count > 0` and nothing left, returns
    /// [`EmbedError::EndOfDirectory`]. With `count == 0` an exhausted cursor
    /// yields an empty list.
    pub fn read_children(&mut self, count: usize) -> Result<Vec<Metadata>> {
        if self.closed {
            return Err(EmbedError::Closed(self.record.path.clone()));
        }

        let remaining = self.record.entries.len() - self.pos;
        if remaining == 0 && count > 0 {
            return Err(EmbedError::EndOfDirectory(self.record.path.clone()));
        }

        let take = if count == 0 { remaining } else { count.min(remaining) };
        let slice = &self.record.entries[self.pos..self.pos + take];

        let children = slice
            .iter()
            .map(|child| {
                self.snapshot
                    .get(child)
                    .map(|record| record.metadata())
                    .ok_or_else(|| EmbedError::Corrupted {
                        path: self.record.path.clone(),
                        reason: format!("listed child {} is missing", child),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        self.pos += take;
        Ok(children)
    }

    /// Only `SeekFrom::Start(0)` is supported; it rewinds the listing cursor
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        if self.closed {
            return Err(EmbedError::Closed(self.record.path.clone()));
        }
        match pos {
            SeekFrom::Start(0) => {
                self.pos = 0;
                Ok(0)
            }
            _ => Err(EmbedError::unsupported("seek", &self.record.path)),
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
