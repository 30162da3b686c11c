//! In-memory source tree

use super::{ReadSeek, SourceFs, SourceMeta};
use crate::path;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::io::{self, Cursor};

#[derive(Debug, Clone)]
enum Node {
    Dir {
        modified: Option<DateTime<Utc>>,
    },
    File {
        data: Vec<u8>,
        modified: Option<DateTime<Utc>>,
    },
}

/// In-memory tree of directories and files
///
/// Parent directories are created implicitly, replacing any file that sat at
/// a parent path. Adding a path that already exists replaces it; a file
/// replacing a directory drops everything beneath it.
///
/// ```
/// use cartridge_embed::source::{MemorySource, SourceFs};
///
/// let source = MemorySource::new()
///     .with_file("/index.html", b"<html></html>".to_vec())
///     .with_file("/img/logo.png", vec![0u8; 16]);
///
/// assert!(source.stat("/img").unwrap().is_dir);
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    nodes: BTreeMap<String, Node>,
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySource {
    /// Create a source holding only the root directory
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(String::from("/"), Node::Dir { modified: None });
        MemorySource { nodes }
    }

    /// Add a directory (and any missing parents)
    pub fn add_dir(&mut self, dir: &str, modified: Option<DateTime<Utc>>) -> &mut Self {
        let dir = path::clean(dir);
        self.ensure_parents(&dir);
        self.nodes.insert(dir, Node::Dir { modified });
        self
    }

    /// Add a file (and any missing parent directories)
    pub fn add_file(
        &mut self,
        file: &str,
        data: Vec<u8>,
        modified: Option<DateTime<Utc>>,
    ) -> &mut Self {
        let file = path::clean(file);
        self.ensure_parents(&file);
        if file != "/" {
            let prefix = format!("{}/", file);
            self.nodes.retain(|p, _| !p.starts_with(&prefix));
        }
        self.nodes.insert(file, Node::File { data, modified });
        self
    }

    /// Builder-style [`add_file`](Self::add_file) without a modification time
    pub fn with_file(mut self, file: &str, data: Vec<u8>) -> Self {
        self.add_file(file, data, None);
        self
    }

    /// Builder-style [`add_dir`](Self::add_dir) without a modification time
    pub fn with_dir(mut self, dir: &str) -> Self {
        self.add_dir(dir, None);
        self
    }

    fn ensure_parents(&mut self, cleaned: &str) {
        let mut idx = 0;
        while let Some(pos) = cleaned[idx + 1..].find('/') {
            idx += pos + 1;
            let parent = self
                .nodes
                .entry(cleaned[..idx].to_string())
                .or_insert(Node::Dir { modified: None });
            if let Node::File { .. } = parent {
                *parent = Node::Dir { modified: None };
            }
        }
    }

    fn node(&self, p: &str) -> io::Result<&Node> {
        let cleaned = path::clean(p);
        self.nodes.get(&cleaned).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} does not exist", cleaned))
        })
    }
}

impl SourceFs for MemorySource {
    fn stat(&self, path: &str) -> io::Result<SourceMeta> {
        Ok(match self.node(path)? {
            Node::Dir { modified } => SourceMeta::dir(*modified),
            Node::File { data, modified } => SourceMeta::file(data.len() as u64, *modified),
        })
    }

    fn list_children(&self, dir: &str) -> io::Result<Vec<String>> {
        if let Node::File { .. } = self.node(dir)? {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", dir),
            ));
        }
        let dir = path::clean(dir);
        let prefix = if dir == "/" {
            dir.clone()
        } else {
            format!("{}/", dir)
        };

        let names = self
            .nodes
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .map(|(key, _)| &key[prefix.len()..])
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(str::to_string)
            .collect();
        Ok(names)
    }

    fn open_for_read(&self, path: &str) -> io::Result<Box<dyn ReadSeek + '_>> {
        match self.node(path)? {
            Node::File { data, .. } => Ok(Box::new(Cursor::new(data.as_slice()))),
            Node::Dir { .. } => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is a directory", path),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implicit_parents() {
        let source = MemorySource::new().with_file("/a/b/c.txt", b"c".to_vec());
        assert!(source.stat("/a").unwrap().is_dir);
        assert!(source.stat("/a/b").unwrap().is_dir);
        assert_eq!(source.stat("/a/b/c.txt").unwrap().size, 1);
    }

    #[test]
    fn test_list_children_only_immediate() {
        let source = MemorySource::new()
            .with_file("/a/x.txt", vec![])
            .with_file("/a/sub/y.txt", vec![])
            .with_file("/ab.txt", vec![]);

        let mut root = source.list_children("/").unwrap();
        root.sort();
        assert_eq!(root, vec!["a", "ab.txt"]);

        let mut a = source.list_children("/a").unwrap();
        a.sort();
        assert_eq!(a, vec!["sub", "x.txt"]);
    }

    #[test]
    fn test_file_under_existing_file_turns_parent_into_dir() {
        let mut source = MemorySource::new();
        source.add_file("/a", b"was a file".to_vec(), None);
        source.add_file("/a/b", b"child".to_vec(), None);

        assert!(source.stat("/a").unwrap().is_dir);
        assert_eq!(source.list_children("/a").unwrap(), vec!["b"]);

        let snapshot = crate::builder::SnapshotBuilder::new().build(&source).unwrap();
        assert!(snapshot.get("/a/b").is_some());
    }

    #[test]
    fn test_file_replacing_dir_drops_descendants() {
        let mut source = MemorySource::new();
        source.add_file("/a/b/c.txt", b"c".to_vec(), None);
        source.add_file("/ab", Vec::new(), None);
        source.add_file("/a", b"now a file".to_vec(), None);

        assert!(!source.stat("/a").unwrap().is_dir);
        assert!(source.stat("/a/b").is_err());
        assert!(source.stat("/a/b/c.txt").is_err());
        assert!(source.stat("/ab").is_ok());
    }

    #[test]
    fn test_errors() {
        let source = MemorySource::new().with_file("/f", vec![1]);
        assert_eq!(
            source.stat("/missing").unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
        assert!(source.list_children("/f").is_err());
        assert!(source.open_for_read("/").is_err());
    }
}
