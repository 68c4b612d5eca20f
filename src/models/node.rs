//! Storage node model.

use serde::{Deserialize, Serialize};

/// Kind of a storage node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

impl NodeKind {
    pub fn is_folder(&self) -> bool {
        matches!(self, NodeKind::Folder)
    }

    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::File => write!(f, "file"),
            NodeKind::Folder => write!(f, "folder"),
        }
    }
}

/// A deleted node kept in the trash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrashEntry {
    /// Trash entry ID.
    pub id: String,
    /// Normalized storage path the node was deleted from.
    pub original_path: String,
    /// Node kind.
    pub kind: NodeKind,
    /// Deletion time, unix seconds.
    pub deleted_at: i64,
}
