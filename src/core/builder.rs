//! Snapshot construction
//!
//! Walks a [`SourceFs`], classifies every file and folds the results into a
//! [`Snapshot`] in a single sequential pass. The first error aborts the build;
//! no partial snapshot is ever returned.
//!
//! The configured root always becomes `/` in the snapshot.

use crate::classify::classify;
use crate::compression::CompressionConfig;
use crate::config::BuildConfig;
use crate::error::{EmbedError, Result};
use crate::metadata::normalize_mod_time;
use crate::path;
use crate::source::{SourceFs, Subtree};
use crate::toc::{DirRecord, Record, Snapshot};
use crate::walk::{walk, WalkEntry};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Accumulates walker output into snapshot records
#[derive(Default)]
struct TocBuilder {
    records: BTreeMap<String, Record>,
    has_compressed_file: bool,
    has_file: bool,
}

impl TocBuilder {
    fn add(&mut self, entry: WalkEntry<'_>, compression: &CompressionConfig) -> Result<()> {
        match entry {
            WalkEntry::File {
                path,
                meta,
                mut reader,
            } => {
                let record = classify(&path, &meta, reader.as_mut(), compression)?;
                if record.storage.is_compressed() {
                    self.has_compressed_file = true;
                } else {
                    self.has_file = true;
                }
                self.records.insert(path, Record::File(Arc::new(record)));
            }
            WalkEntry::Dir {
                path,
                meta,
                children,
            } => {
                debug!("Adding directory {} with {} entries", path, children.len());
                let dir = DirRecord {
                    name: path::base(&path).to_string(),
                    modified: normalize_mod_time(meta.modified),
                    entries: children,
                    path: path.clone(),
                };
                self.records.insert(path, Record::Dir(Arc::new(dir)));
            }
        }
        Ok(())
    }

    fn finish(self) -> Snapshot {
        Snapshot::from_parts(self.records, self.has_compressed_file, self.has_file)
    }
}

/// Builder for [`Snapshot`]s
///
/// # Examples
///
/// ```
/// use cartridge_embed::{CompressionConfig, SnapshotBuilder};
/// use cartridge_embed::source::MemorySource;
///
/// let source = MemorySource::new()
///     .with_file("/index.html", b"<p>hi</p>".repeat(100));
///
/// let snapshot = SnapshotBuilder::new()
///     .compression(CompressionConfig::lz4())
///     .build(&source)?;
///
/// assert!(snapshot.has_compressed_file());
/// # Ok::<(), cartridge_embed::EmbedError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    config: BuildConfig,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn with_config(config: BuildConfig) -> Self {
        SnapshotBuilder { config }
    }

    /// Set the compression used for each file attempt
    pub fn compression(mut self, compression: CompressionConfig) -> Self {
        self.config.compression = compression;
        self
    }

    /// Set the source directory captured as the snapshot's `/`
    pub fn root<S: Into<String>>(mut self, root: S) -> Self {
        self.config.root = root.into();
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Capture `source` into a snapshot
    pub fn build<S: SourceFs + ?Sized>(&self, source: &S) -> Result<Snapshot> {
        self.config.validate()?;
        info!(
            "Building snapshot from {} ({} compression)",
            self.config.root,
            self.config.compression.method.name()
        );

        let root = path::clean(&self.config.root);
        let root_meta = source
            .stat(&root)
            .map_err(|e| EmbedError::source_read(&root, e))?;
        if !root_meta.is_dir {
            return Err(EmbedError::Config(format!("root {} is not a directory", root)));
        }

        let tree = Subtree::new(source, &root);
        let mut toc = TocBuilder::default();
        let compression = &self.config.compression;
        walk(&tree, "/", &mut |entry| toc.add(entry, compression))?;

        let snapshot = toc.finish();
        let stats = snapshot.stats();
        info!(
            "Snapshot complete: {} directories, {} compressed files, {} raw files, {} -> {} bytes",
            stats.directories,
            stats.compressed_files,
            stats.raw_files,
            stats.total_bytes,
            stats.stored_bytes
        );
        Ok(snapshot)
    }
}
