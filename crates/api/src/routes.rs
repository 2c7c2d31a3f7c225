//! Resource paths under the API prefix.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Url;

use crate::error::Error;

/// Characters escaped inside one path segment. Everything except the RFC 3986
/// unreserved set, so `/`, `:` and `@` inside identifiers never alter the
/// path structure.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Every resource path the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Users,
    User(&'a str),
    UserPassword(&'a str),
    UserTwoFactor(&'a str),
    UserInvitations(&'a str),
    UserInvitation { email: &'a str, sid: &'a str },
    UserShares(&'a str),
    UserDevices(&'a str),

    Invitees,
    Invitee(&'a str),

    Groups,
    Group(&'a str),
    GroupMembers(&'a str),
    GroupMember { gid: &'a str, email: &'a str },

    Files,
    File(&'a str),
    FilePath(&'a str),
    FileContent(&'a str),

    Folders,
    Folder(&'a str),
    FolderPath(&'a str),
    FolderChildren(&'a str),
    FolderShared(&'a str),

    Shares,
    Share(&'a str),
    ShareMembers(&'a str),
    ShareMember { sid: &'a str, email: &'a str },
    SharePending(&'a str),
    SharePendingMember { sid: &'a str, email: &'a str },
    ShareGroups(&'a str),
    ShareGroup { sid: &'a str, gid: &'a str },

    Device(&'a str),
    DeviceStatus(&'a str),
}

impl<'a> Route<'a> {
    /// Unescaped path segments relative to the API prefix.
    pub fn segments(&self) -> Vec<&'a str> {
        match *self {
            Route::Users => vec!["users"],
            Route::User(email) => vec!["users", email],
            Route::UserPassword(email) => vec!["users", email, "password"],
            Route::UserTwoFactor(email) => vec!["users", email, "two_factor"],
            Route::UserInvitations(email) => vec!["users", email, "invitations"],
            Route::UserInvitation { email, sid } => vec!["users", email, "invitations", sid],
            Route::UserShares(email) => vec!["users", email, "shares"],
            Route::UserDevices(email) => vec!["users", email, "devices"],

            Route::Invitees => vec!["invitees"],
            Route::Invitee(email) => vec!["invitees", email],

            Route::Groups => vec!["groups"],
            Route::Group(gid) => vec!["groups", gid],
            Route::GroupMembers(gid) => vec!["groups", gid, "members"],
            Route::GroupMember { gid, email } => vec!["groups", gid, "members", email],

            Route::Files => vec!["files"],
            Route::File(id) => vec!["files", id],
            Route::FilePath(id) => vec!["files", id, "path"],
            Route::FileContent(id) => vec!["files", id, "content"],

            Route::Folders => vec!["folders"],
            Route::Folder(id) => vec!["folders", id],
            Route::FolderPath(id) => vec!["folders", id, "path"],
            Route::FolderChildren(id) => vec!["folders", id, "children"],
            Route::FolderShared(id) => vec!["folders", id, "is_shared"],

            Route::Shares => vec!["shares"],
            Route::Share(sid) => vec!["shares", sid],
            Route::ShareMembers(sid) => vec!["shares", sid, "members"],
            Route::ShareMember { sid, email } => vec!["shares", sid, "members", email],
            Route::SharePending(sid) => vec!["shares", sid, "pending"],
            Route::SharePendingMember { sid, email } => vec!["shares", sid, "pending", email],
            Route::ShareGroups(sid) => vec!["shares", sid, "groups"],
            Route::ShareGroup { sid, gid } => vec!["shares", sid, "groups", gid],

            Route::Device(id) => vec!["devices", id],
            Route::DeviceStatus(id) => vec!["devices", id, "status"],
        }
    }

    /// Relative path with each segment percent-encoded.
    pub fn path(&self) -> Result<String, Error> {
        let segments = self.segments();
        if let Some(empty) = segments.iter().position(|s| s.is_empty()) {
            return Err(Error::InvalidRequest(format!(
                "empty path segment {empty} in route {self:?}"
            )));
        }
        Ok(segments
            .iter()
            .map(|s| utf8_percent_encode(s, SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/"))
    }

    /// Joins the route onto `base`, which must end with `/`.
    pub fn url(&self, base: &Url) -> Result<Url, Error> {
        base.join(&self.path()?)
            .map_err(|e| Error::InvalidRequest(format!("cannot build URL for {self:?}: {e}")))
    }
}
