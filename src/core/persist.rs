//! Snapshot persistence
//!
//! Writes a [`Snapshot`] to any `Write` and reads it back, as JSON (readable,
//! large) or bincode (compact). The encoding is an implementation detail of
//! this crate version and not a stable interchange format.

use crate::error::Result;
use crate::toc::Snapshot;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use tracing::debug;

/// Encoding used for a persisted snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistFormat {
    Json,
    Bincode,
}

/// Serializer configuration, constructed once and passed to each call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistOptions {
    pub format: PersistFormat,

    /// Pretty-print JSON output (ignored for bincode)
    pub pretty: bool,
}

impl Default for PersistOptions {
    fn default() -> Self {
        PersistOptions {
            format: PersistFormat::Bincode,
            pretty: false,
        }
    }
}

impl PersistOptions {
    pub fn json() -> Self {
        PersistOptions {
            format: PersistFormat::Json,
            pretty: false,
        }
    }

    pub fn bincode() -> Self {
        Self::default()
    }

    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }
}

/// Persist `snapshot` to `writer`
pub fn write_snapshot<W: Write>(snapshot: &Snapshot, options: &PersistOptions, mut writer: W) -> Result<()> {
    debug!("Persisting snapshot with {} records as {:?}", snapshot.len(), options.format);
    match (options.format, options.pretty) {
        (PersistFormat::Json, true) => serde_json::to_writer_pretty(&mut writer, snapshot)?,
        (PersistFormat::Json, false) => serde_json::to_writer(&mut writer, snapshot)?,
        (PersistFormat::Bincode, _) => bincode::serialize_into(&mut writer, snapshot)?,
    }
    writer.flush()?;
    Ok(())
}

/// Read a snapshot previously written with the same options
pub fn read_snapshot<R: Read>(options: &PersistOptions, reader: R) -> Result<Snapshot> {
    let snapshot: Snapshot = match options.format {
        PersistFormat::Json => serde_json::from_reader(reader)?,
        PersistFormat::Bincode => bincode::deserialize_from(reader)?,
    };
    debug!("Loaded snapshot with {} records", snapshot.len());
    Ok(snapshot)
}

/// Persist `snapshot` into a byte vector
pub fn to_bytes(snapshot: &Snapshot, options: &PersistOptions) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_snapshot(snapshot, options, &mut out)?;
    Ok(out)
}

/// Read a snapshot from a byte slice, e.g. one embedded with `include_bytes!`
pub fn from_bytes(options: &PersistOptions, bytes: &[u8]) -> Result<Snapshot> {
    read_snapshot(options, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SnapshotBuilder;
    use crate::error::EmbedError;
    use crate::source::MemorySource;

    fn sample() -> Snapshot {
        let source = MemorySource::new()
            .with_file("/index.html", b"<li>item</li>".repeat(100))
            .with_file("/img/logo.png", vec![9, 8, 7]);
        SnapshotBuilder::new().build(&source).unwrap()
    }

    #[test]
    fn test_bincode_roundtrip() {
        let snapshot = sample();
        let bytes = to_bytes(&snapshot, &PersistOptions::bincode()).unwrap();
        assert_eq!(from_bytes(&PersistOptions::bincode(), &bytes).unwrap(), snapshot);
    }

    #[test]
    fn test_json_roundtrip() {
        let snapshot = sample();
        let options = PersistOptions::json().pretty();
        let bytes = to_bytes(&snapshot, &options).unwrap();
        assert!(std::str::from_utf8(&bytes).unwrap().contains("/img/logo.png"));
        assert_eq!(from_bytes(&options, &bytes).unwrap(), snapshot);
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = from_bytes(&PersistOptions::json(), b"{not json").unwrap_err();
        assert!(matches!(err, EmbedError::Json(_)));
    }
}
