//! Folder/file hierarchy synthesized from a flat set of `/`-delimited paths.
//!
//! Children are stored in construction order; the folders-first, by-name
//! ordering exists only at traversal time so rebuilding from any
//! permutation of the same input displays identically.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::cmp::Ordering;
use thiserror::Error;

new_key_type! { pub struct NodeId; }

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathTreeError {
    /// The same path is needed both as a file and as a folder, e.g. `a` and
    /// `a/b` in one input.
    #[error("`{path}` is both a file and a folder")]
    StructuralConflict { path: String },
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    name: String,
    path: String,
    children: Vec<NodeId>,
    by_name: FxHashMap<String, NodeId>,
}

impl Node {
    fn new_file(name: String, path: String) -> Self {
        Self {
            kind: NodeKind::File,
            name,
            path,
            children: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    fn new_folder(name: String, path: String) -> Self {
        Self {
            kind: NodeKind::Folder,
            ..Self::new_file(name, path)
        }
    }
}

/// Splits on `/` and drops empty segments. Returns `None` when nothing is
/// left.
pub fn normalize_path(path: &str) -> Option<String> {
    let joined = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    (!joined.is_empty()).then_some(joined)
}

pub struct PathTree {
    arena: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl PathTree {
    pub fn new() -> Self {
        let mut arena = SlotMap::with_key();
        let root = arena.insert(Node::new_folder(String::new(), String::new()));
        Self { arena, root }
    }

    pub fn build<I, S>(paths: I) -> Result<Self, PathTreeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::new();
        for path in paths {
            tree.insert_file(path.as_ref())?;
        }
        Ok(tree)
    }

    /// Inserts a file, synthesizing any missing ancestor folders. Re-inserting
    /// an existing file is a no-op.
    fn insert_file(&mut self, path: &str) -> Result<Option<NodeId>, PathTreeError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((file_name, folders)) = segments.split_last() else {
            tracing::debug!(path, "skipping path without segments");
            return Ok(None);
        };

        let mut current = self.root;
        let mut current_path = String::new();
        for segment in folders {
            push_segment(&mut current_path, segment);
            current = self.ensure_child(current, segment, &current_path, NodeKind::Folder)?;
        }

        push_segment(&mut current_path, file_name);
        let id = self.ensure_child(current, file_name, &current_path, NodeKind::File)?;
        Ok(Some(id))
    }

    fn ensure_child(
        &mut self,
        parent: NodeId,
        name: &str,
        path: &str,
        kind: NodeKind,
    ) -> Result<NodeId, PathTreeError> {
        if let Some(&existing) = self.arena[parent].by_name.get(name) {
            if self.arena[existing].kind != kind {
                return Err(PathTreeError::StructuralConflict {
                    path: path.to_string(),
                });
            }
            return Ok(existing);
        }

        let node = match kind {
            NodeKind::File => Node::new_file(name.to_string(), path.to_string()),
            NodeKind::Folder => Node::new_folder(name.to_string(), path.to_string()),
        };
        let id = self.arena.insert(node);
        let parent_node = &mut self.arena[parent];
        parent_node.children.push(id);
        parent_node.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.arena.get(id).map(|n| n.kind)
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.arena.get(id).map(|n| n.name.as_str())
    }

    pub fn path(&self, id: NodeId) -> Option<&str> {
        self.arena.get(id).map(|n| n.path.as_str())
    }

    pub fn is_folder(&self, id: NodeId) -> bool {
        self.kind(id) == Some(NodeKind::Folder)
    }

    /// Children in construction order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.arena
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Children in display order: folders before files, then by name.
    pub fn sorted_children(&self, id: NodeId) -> Vec<NodeId> {
        let mut children = self.children(id).to_vec();
        children.sort_by(|&a, &b| self.display_order(a, b));
        children
    }

    fn display_order(&self, a: NodeId, b: NodeId) -> Ordering {
        let (a, b) = (&self.arena[a], &self.arena[b]);
        match (a.kind, b.kind) {
            (NodeKind::Folder, NodeKind::File) => Ordering::Less,
            (NodeKind::File, NodeKind::Folder) => Ordering::Greater,
            _ => a.name.cmp(&b.name),
        }
    }

    pub fn find(&self, path: &str) -> Option<NodeId> {
        let mut current = self.root;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = *self.arena.get(current)?.by_name.get(segment)?;
        }
        Some(current)
    }

    /// Every file leaf's path, in display order.
    pub fn file_paths(&self) -> Vec<String> {
        let mut result = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = &self.arena[id];
            if node.kind == NodeKind::File {
                result.push(node.path.clone());
                continue;
            }
            for child in self.sorted_children(id).into_iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }
}

impl Default for PathTree {
    fn default() -> Self {
        Self::new()
    }
}

fn push_segment(path: &mut String, segment: &str) {
    if !path.is_empty() {
        path.push('/');
    }
    path.push_str(segment);
}

/// Which folders the user has opened or closed. Folders never touched fall
/// back to "top level open, everything deeper closed".
#[derive(Debug, Clone, Default)]
pub struct FolderExpansion {
    overrides: FxHashMap<String, bool>,
}

impl FolderExpansion {
    pub fn is_expanded(&self, path: &str, depth: u16) -> bool {
        self.overrides.get(path).copied().unwrap_or(depth < 1)
    }

    pub fn toggle(&mut self, path: &str, depth: u16) {
        let next = !self.is_expanded(path, depth);
        self.overrides.insert(path.to_string(), next);
    }

    pub fn clear(&mut self) {
        self.overrides.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTreeRow {
    pub id: NodeId,
    pub depth: u16,
    pub name: String,
    pub path: String,
    pub is_folder: bool,
    pub is_expanded: bool,
}

impl PathTree {
    pub fn flatten_for_view(&self, expansion: &FolderExpansion) -> Vec<PathTreeRow> {
        let mut result = Vec::new();
        let mut stack: Vec<(NodeId, u16)> = self
            .sorted_children(self.root)
            .into_iter()
            .rev()
            .map(|id| (id, 0))
            .collect();

        while let Some((id, depth)) = stack.pop() {
            let node = &self.arena[id];
            let is_folder = node.kind == NodeKind::Folder;
            let is_expanded = is_folder && expansion.is_expanded(&node.path, depth);
            result.push(PathTreeRow {
                id,
                depth,
                name: node.name.clone(),
                path: node.path.clone(),
                is_folder,
                is_expanded,
            });

            if is_expanded {
                for child in self.sorted_children(id).into_iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }

        result
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/path_tree.rs"]
mod tests;
