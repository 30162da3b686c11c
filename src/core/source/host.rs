//! Host directory source

use super::{ReadSeek, SourceFs, SourceMeta};
use crate::path;
use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// A directory on the host file system, exposed with itself as `/`
///
/// Symlinks are followed. Entry names that are not valid UTF-8 are reported
/// as `InvalidData` errors, which abort the snapshot.
#[derive(Debug, Clone)]
pub struct HostDir {
    root: PathBuf,
}

impl HostDir {
    /// Create a source rooted at `root`, which must be an existing directory
    pub fn new<P: AsRef<Path>>(root: P) -> io::Result<Self> {
        let root = root.as_ref();
        if !fs::metadata(root)?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            ));
        }
        Ok(HostDir {
            root: root.to_path_buf(),
        })
    }

    /// Host root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn to_host(&self, inner: &str) -> PathBuf {
        let cleaned = path::clean(inner);
        let relative = cleaned.trim_start_matches('/');
        if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }
}

impl SourceFs for HostDir {
    fn stat(&self, path: &str) -> io::Result<SourceMeta> {
        let meta = fs::metadata(self.to_host(path))?;
        let modified = meta.modified().ok().map(DateTime::<Utc>::from);
        if meta.is_dir() {
            Ok(SourceMeta::dir(modified))
        } else {
            Ok(SourceMeta::file(meta.len(), modified))
        }
    }

    fn list_children(&self, path: &str) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.to_host(path))? {
            let entry = entry?;
            let name = entry.file_name().into_string().map_err(|raw| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("non UTF-8 file name {:?} in {}", raw, path),
                )
            })?;
            names.push(name);
        }
        Ok(names)
    }

    fn open_for_read(&self, path: &str) -> io::Result<Box<dyn ReadSeek + '_>> {
        Ok(Box::new(File::open(self.to_host(path))?))
    }
}
