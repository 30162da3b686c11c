//! Per-file storage classification
//!
//! Every file is compressed once, at build time. The compressed stream is kept
//! only if it is strictly smaller than the declared size and decodes back to
//! exactly that many bytes; otherwise the source is rewound and its original
//! bytes are stored raw. Empty files are always raw.
//!
//! Either way the stream must yield exactly the size the source reported;
//! a mismatch fails the build with [`EmbedError::SourceRead`].

use crate::compression::{self, CompressionConfig};
use crate::error::{EmbedError, Result};
use crate::metadata::normalize_mod_time;
use crate::path;
use crate::source::{ReadSeek, SourceMeta};
use crate::toc::{FileRecord, Storage};
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;
use tracing::debug;

/// Classify one file into a [`FileRecord`]
pub fn classify(
    file_path: &str,
    meta: &SourceMeta,
    reader: &mut dyn ReadSeek,
    config: &CompressionConfig,
) -> Result<FileRecord> {
    let declared = meta.size;

    let storage = if declared == 0 {
        None
    } else {
        try_compress(file_path, declared, reader, config)?
    };

    let storage = match storage {
        Some(storage) => storage,
        None => Storage::Raw {
            content: read_raw(file_path, declared, reader)?,
        },
    };

    Ok(FileRecord {
        path: file_path.to_string(),
        name: path::base(file_path).to_string(),
        modified: normalize_mod_time(meta.modified),
        uncompressed_size: declared,
        storage,
    })
}

fn try_compress(
    file_path: &str,
    declared: u64,
    reader: &mut dyn ReadSeek,
    config: &CompressionConfig,
) -> Result<Option<Storage>> {
    let attempt = compression::compress_stream(file_path, reader, config, declared)?;

    let content: Arc<[u8]> = match attempt.content {
        Some(content) => content.into(),
        None => {
            debug!(
                "{}: {} compressed to {} bytes (not smaller than {}), storing raw",
                file_path,
                config.method.name(),
                attempt.compressed_len,
                declared
            );
            return Ok(None);
        }
    };

    let decoded = compression::decoded_len(config.method, Arc::clone(&content))
        .map_err(|e| EmbedError::Compression(format!("{}: verification failed: {}", file_path, e)))?;
    if decoded != declared {
        return Err(size_mismatch(file_path, declared, decoded));
    }

    debug!(
        "{}: {} compressed {} -> {} bytes",
        file_path,
        config.method.name(),
        declared,
        content.len()
    );

    Ok(Some(Storage::Compressed {
        method: config.method,
        content,
    }))
}

fn size_mismatch(file_path: &str, declared: u64, actual: u64) -> EmbedError {
    EmbedError::source_read(
        file_path,
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("declared {} bytes but read {}", declared, actual),
        ),
    )
}

/// Rewind and read the original bytes, at most one byte past `declared`
fn read_raw(file_path: &str, declared: u64, reader: &mut dyn ReadSeek) -> Result<Arc<[u8]>> {
    reader
        .seek(SeekFrom::Start(0))
        .map_err(|e| EmbedError::source_read(file_path, e))?;
    let mut content = Vec::new();
    reader
        .take(declared.saturating_add(1))
        .read_to_end(&mut content)
        .map_err(|e| EmbedError::source_read(file_path, e))?;
    if content.len() as u64 != declared {
        return Err(size_mismatch(file_path, declared, content.len() as u64));
    }
    Ok(content.into())
}
