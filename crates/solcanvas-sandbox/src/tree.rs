//! Nested file trees mounted into a sandbox in one call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A file or a directory of further entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileNode {
    File { contents: String },
    Directory(FileTree),
}

/// A directory listing keyed by entry name.
///
/// Entries are kept sorted, so mounting and flattening are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileTree {
    entries: BTreeMap<String, FileNode>,
}

impl FileTree {
    pub fn new() -> Self {
        FileTree::default()
    }

    /// Adds a file at a `/`-separated path, creating directories on the way.
    ///
    /// A file at an intermediate path segment is replaced by a directory.
    pub fn with_file(mut self, path: &str, contents: impl Into<String>) -> Self {
        self.insert(path, contents.into());
        self
    }

    pub fn insert(&mut self, path: &str, contents: String) {
        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some(file_name) = segments.pop() else {
            return;
        };
        let mut dir = self;
        for segment in segments {
            let entry = dir
                .entries
                .entry(segment.to_string())
                .or_insert_with(|| FileNode::Directory(FileTree::new()));
            if let FileNode::File { .. } = entry {
                *entry = FileNode::Directory(FileTree::new());
            }
            dir = match entry {
                FileNode::Directory(tree) => tree,
                FileNode::File { .. } => return,
            };
        }
        dir.entries
            .insert(file_name.to_string(), FileNode::File { contents });
    }

    /// Every file as `(relative path, contents)`, depth first in name order.
    pub fn files(&self) -> Vec<(String, &str)> {
        let mut out = Vec::new();
        self.collect("", &mut out);
        out
    }

    fn collect<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a str)>) {
        for (name, node) in &self.entries {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", prefix, name)
            };
            match node {
                FileNode::File { contents } => out.push((path, contents.as_str())),
                FileNode::Directory(tree) => tree.collect(&path, out),
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FileNode> {
        self.entries.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
