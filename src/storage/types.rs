//! Core file tree data contracts.
//! Keep this module purely about types/serde and light helpers.

use serde::{Deserialize, Serialize};

/// Reserved id of the record anchoring the tree.
pub const ROOT_ID: &str = "root";

/// Deepest level a record may sit at; top-level records are at depth 1.
/// Serialized trees nest two JSON levels per folder, so this keeps every tree
/// decodable under serde_json's default recursion limit of 128.
pub const MAX_DEPTH: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Folder,
}

impl FileKind {
    pub fn is_folder(&self) -> bool { matches!(self, FileKind::Folder) }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::File => "file",
            FileKind::Folder => "folder",
        }
    }
}

/// A stored file or folder entry. Never carries children; see `TreeNode` for that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    #[serde(alias = "type")]
    pub kind: FileKind,
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl FileRecord {
    pub fn is_root(&self) -> bool { self.id == ROOT_ID }
}

/// Input for `FileStore::create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFile {
    pub name: String,
    #[serde(alias = "type")]
    pub kind: FileKind,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl NewFile {
    pub fn file(name: impl Into<String>, parent_id: Option<&str>, content: Option<&str>) -> Self {
        Self {
            name: name.into(),
            kind: FileKind::File,
            parent_id: parent_id.map(|s| s.to_string()),
            content: content.map(|s| s.to_string()),
        }
    }

    pub fn folder(name: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self { name: name.into(), kind: FileKind::Folder, parent_id: parent_id.map(|s| s.to_string()), content: None }
    }
}

/// Partial update for `FileStore::update`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl FilePatch {
    pub fn is_empty(&self) -> bool { self.name.is_none() && self.content.is_none() }
}

/// Presentation node produced by `assemble_tree`.
/// `children` is `Some` for folders (possibly empty) and `None` for files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(flatten)]
    pub record: FileRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub fn id(&self) -> &str { &self.record.id }

    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}
