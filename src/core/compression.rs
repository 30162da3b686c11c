//! Stream compression for embedded file content
//!
//! Provides Zstd and LZ4 (frame format) compression for snapshot content.
//!
//! **Design**:
//! - Encoding is streaming: the source is pumped through the encoder in fixed
//!   chunks and the compressed byte count is tracked as output is produced.
//! - The sink stops buffering once the output reaches the caller's limit, so an
//!   incompressible file never costs a second full-size buffer.
//! - Decoding is strictly forward-only; random access is layered on top by
//!   [`crate::vfs::CompressedFile`].

use crate::error::{EmbedError, Result};
use serde::{Deserialize, Serialize};
use std::io::{self, Cursor, Read, Write};
use std::sync::Arc;

/// Chunk size used when pumping a source through an encoder
const COPY_CHUNK: usize = 32 * 1024;

/// Compression method for embedded content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMethod {
    /// LZ4 frame format (fast, moderate ratio)
    Lz4,
    /// Zstd stream (slower, better ratio)
    Zstd,
}

impl CompressionMethod {
    pub fn name(&self) -> &'static str {
        match self {
            CompressionMethod::Lz4 => "lz4",
            CompressionMethod::Zstd => "zstd",
        }
    }
}

/// Compression configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Compression method to use
    pub method: CompressionMethod,

    /// Encoder level (Zstd only, 1..=22)
    pub level: i32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        CompressionConfig {
            method: CompressionMethod::Zstd,
            level: 3,
        }
    }
}

impl CompressionConfig {
    /// Create config with Zstd compression at the default level
    pub fn zstd() -> Self {
        Self::default()
    }

    /// Create config with LZ4 frame compression
    pub fn lz4() -> Self {
        CompressionConfig {
            method: CompressionMethod::Lz4,
            level: 0,
        }
    }

    /// Set the encoder level
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.method == CompressionMethod::Zstd && !(1..=22).contains(&self.level) {
            return Err(EmbedError::Config(format!(
                "zstd level must be within 1..=22, got {}",
                self.level
            )));
        }
        Ok(())
    }
}

/// Write sink that counts every byte but buffers at most `limit` bytes
struct BoundedSink {
    buf: Vec<u8>,
    limit: u64,
    written: u64,
}

impl BoundedSink {
    fn new(limit: u64) -> Self {
        BoundedSink {
            buf: Vec::new(),
            limit,
            written: 0,
        }
    }
}

impl Write for BoundedSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.written += data.len() as u64;
        if self.written < self.limit {
            self.buf.extend_from_slice(data);
        } else if !self.buf.is_empty() {
            self.buf = Vec::new();
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Result of a streaming compression attempt
#[derive(Debug)]
pub struct Compressed {
    /// Total compressed bytes the encoder produced
    pub compressed_len: u64,

    /// The compressed blob, present only when `compressed_len < limit`
    pub content: Option<Vec<u8>>,
}

fn copy_into<R: Read + ?Sized, W: Write>(path: &str, reader: &mut R, encoder: &mut W) -> Result<()> {
    let mut chunk = vec![0u8; COPY_CHUNK];
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(EmbedError::source_read(path, e)),
        };
        encoder
            .write_all(&chunk[..n])
            .map_err(|e| EmbedError::Compression(format!("{}: {}", path, e)))?;
    }
}

/// Compress everything `reader` yields, keeping the output only if it stays
/// strictly below `limit` bytes.
///
/// `path` is used for error context. Read failures surface as
/// [`EmbedError::SourceRead`], encoder failures as [`EmbedError::Compression`].
pub fn compress_stream<R: Read + ?Sized>(
    path: &str,
    reader: &mut R,
    config: &CompressionConfig,
    limit: u64,
) -> Result<Compressed> {
    let sink = BoundedSink::new(limit);

    let sink = match config.method {
        CompressionMethod::Zstd => {
            let mut encoder = zstd::stream::write::Encoder::new(sink, config.level)
                .map_err(|e| EmbedError::Compression(format!("zstd init failed: {}", e)))?;
            copy_into(path, reader, &mut encoder)?;
            encoder
                .finish()
                .map_err(|e| EmbedError::Compression(format!("{}: {}", path, e)))?
        }
        CompressionMethod::Lz4 => {
            let mut encoder = lz4_flex::frame::FrameEncoder::new(sink);
            copy_into(path, reader, &mut encoder)?;
            encoder
                .finish()
                .map_err(|e| EmbedError::Compression(format!("{}: {}", path, e)))?
        }
    };

    let content = if sink.written < sink.limit {
        Some(sink.buf)
    } else {
        None
    };

    Ok(Compressed {
        compressed_len: sink.written,
        content,
    })
}

/// Open a fresh forward-only decoder positioned at the start of `content`
pub fn decoder(method: CompressionMethod, content: Arc<[u8]>) -> io::Result<Box<dyn Read + Send>> {
    let cursor = Cursor::new(content);
    match method {
        CompressionMethod::Zstd => Ok(Box::new(zstd::stream::read::Decoder::with_buffer(cursor)?)),
        CompressionMethod::Lz4 => Ok(Box::new(lz4_flex::frame::FrameDecoder::new(cursor))),
    }
}

/// Fully decode `content` and return the number of plaintext bytes produced
pub fn decoded_len(method: CompressionMethod, content: Arc<[u8]>) -> io::Result<u64> {
    let mut decoder = decoder(method, content)?;
    io::copy(&mut decoder, &mut io::sink())
}
