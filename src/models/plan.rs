//! Plan data model.
//!
//! A plan is a declarative list of file system actions that is turned into a
//! run-queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Plan file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
    /// Plan version.
    pub version: String,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Run the queue gracefully (continue after failures).
    #[serde(default)]
    pub gracefully: bool,
    /// Actions in execution order.
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

/// A single declared action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ActionSpec {
    FolderCreate {
        path: String,
        #[serde(default)]
        gracefully: bool,
    },
    FolderRemove {
        path: String,
        #[serde(default)]
        gracefully: bool,
        #[serde(default)]
        recursive: bool,
    },
    FileRemove {
        path: String,
        #[serde(default)]
        gracefully: bool,
    },
    NodeRemove {
        path: String,
        #[serde(default)]
        gracefully: bool,
        #[serde(default)]
        recursive: bool,
    },
    FileRename {
        #[serde(default)]
        from: String,
        #[serde(default)]
        to: String,
        #[serde(default)]
        gracefully: bool,
        #[serde(default)]
        mkdir: bool,
    },
    FolderRename {
        #[serde(default)]
        from: String,
        #[serde(default)]
        to: String,
        #[serde(default)]
        gracefully: bool,
        #[serde(default)]
        mkdir: bool,
    },
}

impl ActionSpec {
    /// Operation tag as written in plan files.
    pub fn op_name(&self) -> &'static str {
        match self {
            ActionSpec::FolderCreate { .. } => "folder_create",
            ActionSpec::FolderRemove { .. } => "folder_remove",
            ActionSpec::FileRemove { .. } => "file_remove",
            ActionSpec::NodeRemove { .. } => "node_remove",
            ActionSpec::FileRename { .. } => "file_rename",
            ActionSpec::FolderRename { .. } => "folder_rename",
        }
    }
}
