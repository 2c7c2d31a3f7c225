use serde::{Deserialize, Serialize};

/// File metadata.
///
/// `path` is an on-demand field and is only populated when requested via
/// the `fields` query parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent: String,
    #[serde(default)]
    pub last_modified: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, rename = "mime_type")]
    pub mime: String,
    #[serde(default)]
    pub etag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<ParentPath>,
    #[serde(default)]
    pub content_state: String,
}

/// Folder metadata.
///
/// `path` and `children` are on-demand fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent: String,
    #[serde(default)]
    pub is_shared: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<ParentPath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Children>,
}

/// Ancestors of a file or folder, root first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParentPath {
    #[serde(default)]
    pub folders: Vec<Folder>,
}

/// Direct children of a folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Children {
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub files: Vec<File>,
}
