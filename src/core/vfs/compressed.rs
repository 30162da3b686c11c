//! Random-access reader over compressed content
//!
//! The stored stream can only be decoded front to back. The handle keeps two
//! cursors: `decoder_pos`, the number of plaintext bytes the decoder has
//! produced, and `seek_pos`, where the caller wants to read next. `seek` only
//! moves `seek_pos`. `read` reconciles the two before decoding:
//!
//! - `decoder_pos > seek_pos`: the decoder is replaced by a fresh one over the
//!   same blob and `decoder_pos` drops to 0
//! - `decoder_pos < seek_pos`: plaintext is decoded and discarded until the
//!   cursors meet
//!
//! Any decode failure means the embedded blob was damaged after it was
//! validated at build time and is reported as [`EmbedError::Corrupted`].

use crate::compression::{self, CompressionMethod};
use crate::error::{EmbedError, Result};
use crate::metadata::Metadata;
use crate::toc::{FileRecord, Storage};
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;
use tracing::{trace, warn};

type Decoder = Box<dyn Read + Send>;

/// An open compressed file
pub struct CompressedFile {
    record: Arc<FileRecord>,
    method: CompressionMethod,
    content: Arc<[u8]>,
    /// `None` once closed
    decoder: Option<Decoder>,
    decoder_pos: u64,
    seek_pos: u64,
}

impl fmt::Debug for CompressedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressedFile")
            .field("path", &self.record.path)
            .field("method", &self.method)
            .field("decoder_pos", &self.decoder_pos)
            .field("seek_pos", &self.seek_pos)
            .field("closed", &self.decoder.is_none())
            .finish()
    }
}

impl CompressedFile {
    /// Open a reader over a compressed record.
    ///
    /// Fails with [`EmbedError::Unsupported`] if the record is stored raw.
    pub fn open(record: Arc<FileRecord>) -> Result<Self> {
        let (method, content) = match &record.storage {
            Storage::Compressed { method, content } => (*method, Arc::clone(content)),
            Storage::Raw { .. } => {
                return Err(EmbedError::unsupported("open compressed", &record.path));
            }
        };
        let decoder = new_decoder(&record.path, method, &content)?;

        Ok(CompressedFile {
            record,
            method,
            content,
            decoder: Some(decoder),
            decoder_pos: 0,
            seek_pos: 0,
        })
    }

    pub fn path(&self) -> &str {
        &self.record.path
    }

    pub fn stat(&self) -> Metadata {
        self.record.metadata()
    }

    /// The stored compressed stream, for serving content without decoding
    pub fn compressed_bytes(&self) -> &[u8] {
        &self.content
    }

    pub fn method(&self) -> CompressionMethod {
        self.method
    }

    /// Size of the decoded content
    pub fn len(&self) -> u64 {
        self.record.uncompressed_size
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current logical read position
    pub fn position(&self) -> u64 {
        self.seek_pos
    }

    /// Release the decoder. Closing twice is a no-op.
    pub fn close(&mut self) {
        self.decoder = None;
    }

    pub fn is_closed(&self) -> bool {
        self.decoder.is_none()
    }

    fn corrupted(&self, reason: impl Into<String>) -> EmbedError {
        let reason = reason.into();
        warn!("Corrupted embedded content in {}: {}", self.record.path, reason);
        EmbedError::Corrupted {
            path: self.record.path.clone(),
            reason,
        }
    }

    /// Bring `decoder_pos` to `seek_pos`. Returns false if the content ends
    /// before `seek_pos`.
    fn reconcile(&mut self) -> Result<bool> {
        if self.decoder.is_none() {
            return Err(EmbedError::Closed(self.record.path.clone()));
        }

        if self.decoder_pos > self.seek_pos {
            trace!(
                "{}: rewinding decoder from {} for read at {}",
                self.record.path,
                self.decoder_pos,
                self.seek_pos
            );
            self.decoder = Some(new_decoder(&self.record.path, self.method, &self.content)?);
            self.decoder_pos = 0;
        }

        if self.decoder_pos < self.seek_pos {
            let wanted = self.seek_pos - self.decoder_pos;
            trace!("{}: skipping {} decoded bytes", self.record.path, wanted);

            let skipped = match self.decoder.as_mut() {
                Some(decoder) => io::copy(&mut decoder.take(wanted), &mut io::sink()),
                None => return Err(EmbedError::Closed(self.record.path.clone())),
            };
            let skipped = skipped.map_err(|e| self.corrupted(e.to_string()))?;
            self.decoder_pos += skipped;

            if skipped < wanted {
                if self.decoder_pos < self.len() {
                    return Err(self.corrupted(format!(
                        "stream ended after {} of {} bytes",
                        self.decoder_pos,
                        self.len()
                    )));
                }
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn read_inner(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.decoder.is_some() && self.seek_pos >= self.len() {
            return Ok(0);
        }
        if !self.reconcile()? {
            return Ok(0);
        }

        // Never hand out plaintext beyond the recorded size
        let remaining = self.len() - self.decoder_pos;
        let want = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));

        let result = match self.decoder.as_mut() {
            Some(decoder) => decoder.read(&mut buf[..want]),
            None => return Err(EmbedError::Closed(self.record.path.clone())),
        };
        let n = result.map_err(|e| self.corrupted(e.to_string()))?;

        if n == 0 {
            return Err(self.corrupted(format!(
                "stream ended after {} of {} bytes",
                self.decoder_pos,
                self.len()
            )));
        }

        if self.decoder_pos + n as u64 == self.len() {
            self.ensure_exhausted()?;
        }

        self.decoder_pos += n as u64;
        self.seek_pos = self.decoder_pos;
        Ok(n)
    }

    /// The decoder has produced `len()` bytes; it must have nothing left
    fn ensure_exhausted(&mut self) -> Result<()> {
        let mut extra = [0u8; 1];
        let result = match self.decoder.as_mut() {
            Some(decoder) => decoder.read(&mut extra),
            None => return Err(EmbedError::Closed(self.record.path.clone())),
        };
        match result {
            Ok(0) => Ok(()),
            Ok(_) => Err(self.corrupted(format!(
                "stream continues past the recorded {} bytes",
                self.len()
            ))),
            Err(e) => Err(self.corrupted(e.to_string())),
        }
    }
}

fn new_decoder(path: &str, method: CompressionMethod, content: &Arc<[u8]>) -> Result<Decoder> {
    compression::decoder(method, Arc::clone(content)).map_err(|e| {
        warn!("Failed to open decoder for {}: {}", path, e);
        EmbedError::Corrupted {
            path: path.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Compute a seek target the way `std::io::Cursor` does
pub(crate) fn seek_target(pos: SeekFrom, current: u64, len: u64) -> io::Result<u64> {
    let (base, offset) = match pos {
        SeekFrom::Start(n) => return Ok(n),
        SeekFrom::Current(n) => (current, n),
        SeekFrom::End(n) => (len, n),
    };
    base.checked_add_signed(offset).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "invalid seek to a negative or overflowing position",
        )
    })
}

impl Read for CompressedFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_inner(buf)?)
    }
}

impl Seek for CompressedFile {
    /// Only moves the logical cursor; the decoder catches up on the next read
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        if self.decoder.is_none() {
            return Err(EmbedError::Closed(self.record.path.clone()).into());
        }
        self.seek_pos = seek_target(pos, self.seek_pos, self.len())?;
        Ok(self.seek_pos)
    }
}
