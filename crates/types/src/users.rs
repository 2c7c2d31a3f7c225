use serde::{Deserialize, Serialize};

use crate::shares::{Permission, SharedFolder};

/// An appliance user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub shares: Vec<SharedFolder>,
    #[serde(default)]
    pub invitations: Vec<Invitation>,
}

/// A page of users, as returned by `GET users`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub has_more: bool,
    #[serde(default, rename = "data")]
    pub users: Vec<User>,
}

/// An invitation for a user to join a shared folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    #[serde(rename = "share_id", alias = "shared_id")]
    pub share_id: String,
    #[serde(default, rename = "share_name", alias = "shared_name")]
    pub share_name: String,
    #[serde(default, rename = "invited_by")]
    pub inviter: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// A person invited to sign up on the appliance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitee {
    pub email_to: String,
    #[serde(default)]
    pub email_from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signup_code: Option<String>,
}
