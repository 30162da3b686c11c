//! Depth-first traversal of a source tree
//!
//! Directories are visited before their children. Each directory's children
//! are listed once, joined into absolute paths and sorted by byte order before
//! descending, so the visitation order is deterministic for a given tree. The
//! sorted listing is handed to the visitor along with the directory so callers
//! never need to re-derive it.
//!
//! Any stat, open or listing failure aborts the walk.

use crate::error::{EmbedError, Result};
use crate::path;
use crate::source::{ReadSeek, SourceFs, SourceMeta};
use tracing::trace;

/// One visited path
pub enum WalkEntry<'s> {
    Dir {
        path: String,
        meta: SourceMeta,
        /// Absolute child paths, sorted ascending
        children: Vec<String>,
    },
    File {
        path: String,
        meta: SourceMeta,
        reader: Box<dyn ReadSeek + 's>,
    },
}

impl WalkEntry<'_> {
    pub fn path(&self) -> &str {
        match self {
            WalkEntry::Dir { path, .. } | WalkEntry::File { path, .. } => path,
        }
    }
}

/// Walk `source` from `root`, calling `visit` for every directory and file.
///
/// The first error, from the source or from `visit`, stops the walk and is
/// returned unchanged.
pub fn walk<'s, S, F>(source: &'s S, root: &str, visit: &mut F) -> Result<()>
where
    S: SourceFs + ?Sized,
    F: FnMut(WalkEntry<'s>) -> Result<()>,
{
    let root = path::clean(root);
    let meta = source
        .stat(&root)
        .map_err(|e| EmbedError::source_read(&root, e))?;
    walk_path(source, root, meta, visit)
}

fn walk_path<'s, S, F>(source: &'s S, path: String, meta: SourceMeta, visit: &mut F) -> Result<()>
where
    S: SourceFs + ?Sized,
    F: FnMut(WalkEntry<'s>) -> Result<()>,
{
    if !meta.is_dir {
        let reader = source
            .open_for_read(&path)
            .map_err(|e| EmbedError::source_read(&path, e))?;
        return visit(WalkEntry::File { path, meta, reader });
    }

    let children = sorted_children(source, &path)?;
    trace!("Walking {} ({} children)", path, children.len());

    visit(WalkEntry::Dir {
        path,
        meta,
        children: children.clone(),
    })?;

    for child in children {
        let child_meta = source
            .stat(&child)
            .map_err(|e| EmbedError::source_read(&child, e))?;
        walk_path(source, child, child_meta, visit)?;
    }

    Ok(())
}

/// List a directory and return its children as sorted absolute paths
pub fn sorted_children<S: SourceFs + ?Sized>(source: &S, dir: &str) -> Result<Vec<String>> {
    let names = source
        .list_children(dir)
        .map_err(|e| EmbedError::source_walk(dir, e))?;
    let mut paths: Vec<String> = names.iter().map(|name| path::join(dir, name)).collect();
    paths.sort();
    paths.dedup();
    Ok(paths)
}
