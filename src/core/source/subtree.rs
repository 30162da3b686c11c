//! Re-rooted view of another source

use super::{ReadSeek, SourceFs, SourceMeta};
use crate::path;
use std::io;

/// Exposes the directory `root` of an inner source as `/`
///
/// Paths are cleaned before they are joined onto `root`, so `..` can never
/// climb above it.
#[derive(Debug)]
pub struct Subtree<'a, S: ?Sized> {
    inner: &'a S,
    root: String,
}

impl<'a, S: SourceFs + ?Sized> Subtree<'a, S> {
    pub fn new(inner: &'a S, root: &str) -> Self {
        Subtree {
            inner,
            root: path::clean(root),
        }
    }

    /// Cleaned root inside the inner source
    pub fn root(&self) -> &str {
        &self.root
    }

    fn to_inner(&self, path: &str) -> String {
        path::join(&self.root, &path::clean(path))
    }
}

impl<S: SourceFs + ?Sized> SourceFs for Subtree<'_, S> {
    fn stat(&self, path: &str) -> io::Result<SourceMeta> {
        self.inner.stat(&self.to_inner(path))
    }

    fn list_children(&self, path: &str) -> io::Result<Vec<String>> {
        self.inner.list_children(&self.to_inner(path))
    }

    fn open_for_read(&self, path: &str) -> io::Result<Box<dyn ReadSeek + '_>> {
        self.inner.open_for_read(&self.to_inner(path))
    }
}
