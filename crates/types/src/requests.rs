//! Request bodies sent to the appliance.
//!
//! Every mutating call serialises one of these instead of formatting JSON
//! by hand.

use serde::Serialize;

use crate::shares::Permission;

#[derive(Debug, Clone, Serialize)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserNames<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewInvitee<'a> {
    pub email_to: &'a str,
    pub email_from: &'a str,
}

/// Body for anything identified only by a name (groups, shares, devices).
#[derive(Debug, Clone, Serialize)]
pub struct Named<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewGroupMember<'a> {
    pub email: &'a str,
}

/// Body for creating or moving a file or folder.
#[derive(Debug, Clone, Serialize)]
pub struct Placement<'a> {
    pub parent: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSFMember<'a> {
    pub email: &'a str,
    pub permissions: &'a [Permission],
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSFGroup<'a> {
    pub id: &'a str,
    pub permissions: &'a [Permission],
}

#[derive(Debug, Clone, Serialize)]
pub struct PermissionList<'a> {
    pub permissions: &'a [Permission],
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPendingMember<'a> {
    pub email: &'a str,
    pub permissions: &'a [Permission],
    #[serde(skip_serializing_if = "str::is_empty")]
    pub note: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_name_is_properly_quoted() {
        let json = serde_json::to_string(&Named { name: "Eng \"core\"" }).unwrap();
        assert_eq!(json, r#"{"name":"Eng \"core\""}"#);
    }

    #[test]
    fn pending_member_skips_empty_note() {
        let body = NewPendingMember {
            email: "x@y.z",
            permissions: &[Permission::Write],
            note: "",
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"email":"x@y.z","permissions":["WRITE"]}"#);
    }
}
