//! Snapshot building and the embedded runtime
//!
//! ## Build side
//!
//! - [`source`] - the [`source::SourceFs`] capability plus host and in-memory trees
//! - [`walk`] - deterministic depth-first traversal of a source
//! - [`classify`] - per-file decision between compressed and raw storage
//! - [`compression`] - streaming Zstd/LZ4 encoders and decoders
//! - [`builder`] - [`builder::SnapshotBuilder`], folding a walk into a [`toc::Snapshot`]
//! - [`config`] - TOML build configuration
//! - [`persist`] - writing snapshots out and loading them back
//!
//! ## Runtime side
//!
//! - [`toc`] - the immutable path → record table
//! - [`vfs`] - [`vfs::EmbeddedFs`] and its seekable handles
//! - [`metadata`] - stat results exposed to callers
//! - [`path`] - POSIX path cleaning shared by both sides
//!
//! ```text
//! SourceFs ──walk──▶ classify ──▶ Snapshot ──persist──▶ bytes
//!                                    │
//!                                    ▼
//!                               EmbeddedFs ──open──▶ Handle (Dir | File | Compressed)
//! ```

pub mod builder;
pub mod classify;
pub mod compression;
pub mod config;
pub mod error;
pub mod metadata;
pub mod path;
pub mod persist;
pub mod source;
pub mod toc;
pub mod vfs;
pub mod walk;

// Re-export commonly used types
pub use builder::SnapshotBuilder;
pub use compression::{CompressionConfig, CompressionMethod};
pub use config::BuildConfig;
pub use error::{EmbedError, Result};
pub use metadata::{FileType, Metadata};
pub use persist::{PersistFormat, PersistOptions};
pub use source::{HostDir, MemorySource, SourceFs, SourceMeta};
pub use toc::{DirRecord, FileRecord, Record, Snapshot, SnapshotStats, Storage};
pub use vfs::{CompressedFile, DirHandle, EmbeddedFs, Handle, RawFile};
