//! # Cartridge Embed - Read-Only File Trees Compiled Into Your Program
//!
//! `cartridge-embed` captures a directory tree into an immutable [`Snapshot`] and
//! serves it back at runtime through a read-only file system with:
//!
//! - **Per-file compression** kept only when it actually saves space
//! - **Full random access** on compressed files through lazily reconciled cursors
//! - **Deterministic layout**: children sorted, paths cleaned, no host paths leaked
//! - **Persistence** to JSON or bincode for generating embeddable payloads
//!
//! ## Quick Start
//!
//! ```rust
//! use cartridge_embed::{EmbeddedFs, Result, SnapshotBuilder};
//! use cartridge_embed::source::MemorySource;
//! use std::io::{Read, Seek, SeekFrom};
//!
//! # fn main() -> Result<()> {
//! let source = MemorySource::new()
//!     .with_file("/index.html", b"<li>item</li>\n".repeat(200))
//!     .with_file("/img/logo.png", vec![0x89, b'P', b'N', b'G']);
//!
//! let fs = EmbeddedFs::new(SnapshotBuilder::new().build(&source)?);
//!
//! let mut page = fs.open("/index.html")?;
//! assert!(page.is_compressed());
//!
//! page.seek(SeekFrom::Start(14))?;
//! let mut buf = [0u8; 4];
//! page.read_exact(&mut buf)?;
//! assert_eq!(&buf, b"<li>");
//!
//! let root: Vec<_> = fs.read_dir("/")?.into_iter().map(|m| m.name).collect();
//! assert_eq!(root, vec!["img", "index.html"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Generating an Embeddable Payload
//!
//! ```rust,no_run
//! use cartridge_embed::{persist, BuildConfig, EmbeddedFs, PersistOptions, Result, SnapshotBuilder};
//! use cartridge_embed::source::HostDir;
//!
//! # fn main() -> Result<()> {
//! // build.rs
//! let config = BuildConfig::load("embed.toml")?;
//! let snapshot = SnapshotBuilder::with_config(config).build(&HostDir::new("public")?)?;
//! std::fs::write("assets.bin", persist::to_bytes(&snapshot, &PersistOptions::bincode())?)?;
//!
//! // application
//! let fs = EmbeddedFs::from_bytes(&PersistOptions::bincode(), &std::fs::read("assets.bin")?)?;
//! # let _ = fs;
//! # Ok(())
//! # }
//! ```

pub mod core;

// Re-export core modules internally so crate:: paths in core still work
#[allow(unused_imports)]
pub(crate) use crate::core::{builder, classify, compression, config, error, metadata, path, toc, walk};

// Modules users reach into directly
pub use crate::core::{persist, source, vfs};

pub use crate::core::{
    BuildConfig, CompressedFile, CompressionConfig, CompressionMethod, DirHandle, DirRecord,
    EmbedError, EmbeddedFs, FileRecord, FileType, Handle, HostDir, MemorySource, Metadata,
    PersistFormat, PersistOptions, RawFile, Record, Result, Snapshot, SnapshotBuilder,
    SnapshotStats, SourceFs, SourceMeta, Storage,
};
