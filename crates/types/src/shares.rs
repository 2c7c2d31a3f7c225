use serde::{Deserialize, Serialize};

/// A permission a member may hold on a shared folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    Write,
    Manage,
}

/// A shared folder ("share") and its membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedFolder {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default, rename = "is_external")]
    pub external: bool,
    #[serde(default)]
    pub members: Vec<SFMember>,
    #[serde(default)]
    pub groups: Vec<SFGroupMember>,
    #[serde(default)]
    pub pending: Vec<SFPendingMember>,
    /// Effective permissions of the calling user.
    #[serde(default, rename = "caller_effective_permissions")]
    pub caller_permissions: Vec<Permission>,
}

/// A user who is a member of a shared folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SFMember {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// A group that is a member of a shared folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SFGroupMember {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// A user invited to a shared folder who has not accepted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SFPendingMember {
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(default, rename = "invited_by", skip_serializing_if = "String::is_empty")]
    pub inviter: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub note: String,
}
