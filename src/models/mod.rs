//! Data models: path hierarchy and buffer storage

pub mod buffer_cache;
pub mod path_tree;

pub use buffer_cache::{Buffer, BufferCache};
pub use path_tree::{
    normalize_path, FolderExpansion, NodeId, NodeKind, PathTree, PathTreeError, PathTreeRow,
};
