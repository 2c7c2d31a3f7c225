//! Shared folders and their members, pending invitations and groups.
//!
//! Read calls accept `If-None-Match` tags so callers can poll cheaply; a
//! `304` surfaces as an error with [`Error::is_not_modified`] set.

use aerofs_types::requests::{Named, NewPendingMember, NewSFGroup, NewSFMember, PermissionList};
use aerofs_types::{Permission, SFGroupMember, SFMember, SFPendingMember, SharedFolder};
use reqwest::Method;
use reqwest::header::HeaderMap;

use crate::client::{Client, Preconditions, Tagged, json_body};
use crate::error::Error;
use crate::routes::Route;

impl Client {
    /// Shared folders `email` belongs to.
    pub async fn list_shared_folders(
        &self,
        email: &str,
        if_none_match: &[String],
    ) -> Result<Tagged<Vec<SharedFolder>>, Error> {
        let headers = Preconditions::if_none_match(if_none_match).headers()?;
        self.call_json(Method::GET, Route::UserShares(email), &[], headers, None)
            .await
    }

    pub async fn get_shared_folder(
        &self,
        sid: &str,
        if_none_match: &[String],
    ) -> Result<Tagged<SharedFolder>, Error> {
        let headers = Preconditions::if_none_match(if_none_match).headers()?;
        self.call_json(Method::GET, Route::Share(sid), &[], headers, None)
            .await
    }

    pub async fn create_shared_folder(&self, name: &str) -> Result<Tagged<SharedFolder>, Error> {
        let body = json_body(&Named { name })?;
        self.call_json(Method::POST, Route::Shares, &[], HeaderMap::new(), Some(body))
            .await
    }

    // Members.

    pub async fn list_sf_members(
        &self,
        sid: &str,
        if_none_match: &[String],
    ) -> Result<Tagged<Vec<SFMember>>, Error> {
        let headers = Preconditions::if_none_match(if_none_match).headers()?;
        self.call_json(Method::GET, Route::ShareMembers(sid), &[], headers, None)
            .await
    }

    pub async fn get_sf_member(
        &self,
        sid: &str,
        email: &str,
        if_none_match: &[String],
    ) -> Result<Tagged<SFMember>, Error> {
        let headers = Preconditions::if_none_match(if_none_match).headers()?;
        let route = Route::ShareMember { sid, email };
        self.call_json(Method::GET, route, &[], headers, None)
            .await
    }

    pub async fn add_sf_member(
        &self,
        sid: &str,
        email: &str,
        permissions: &[Permission],
    ) -> Result<Tagged<SFMember>, Error> {
        let body = json_body(&NewSFMember { email, permissions })?;
        self.call_json(Method::POST, Route::ShareMembers(sid), &[], HeaderMap::new(), Some(body))
            .await
    }

    pub async fn set_sf_member_permissions(
        &self,
        sid: &str,
        email: &str,
        permissions: &[Permission],
        etags: &[String],
    ) -> Result<Tagged<SFMember>, Error> {
        let body = json_body(&PermissionList { permissions })?;
        let headers = Preconditions::if_match(etags).headers()?;
        let route = Route::ShareMember { sid, email };
        self.call_json(Method::PUT, route, &[], headers, Some(body))
            .await
    }

    pub async fn remove_sf_member(&self, sid: &str, email: &str, etags: &[String]) -> Result<(), Error> {
        let headers = Preconditions::if_match(etags).headers()?;
        let route = Route::ShareMember { sid, email };
        self.call(Method::DELETE, route, &[], headers, None).await?;
        Ok(())
    }

    // Pending members (invited, not yet joined).

    pub async fn list_pending_members(
        &self,
        sid: &str,
        if_none_match: &[String],
    ) -> Result<Tagged<Vec<SFPendingMember>>, Error> {
        let headers = Preconditions::if_none_match(if_none_match).headers()?;
        self.call_json(Method::GET, Route::SharePending(sid), &[], headers, None)
            .await
    }

    pub async fn get_pending_member(&self, sid: &str, email: &str) -> Result<Tagged<SFPendingMember>, Error> {
        let route = Route::SharePendingMember { sid, email };
        self.call_json(Method::GET, route, &[], HeaderMap::new(), None)
            .await
    }

    /// Invites `email` to the shared folder. An empty `note` is omitted.
    pub async fn invite_to_shared_folder(
        &self,
        sid: &str,
        email: &str,
        permissions: &[Permission],
        note: &str,
    ) -> Result<Tagged<SFPendingMember>, Error> {
        let body = json_body(&NewPendingMember {
            email,
            permissions,
            note,
        })?;
        self.call_json(Method::POST, Route::SharePending(sid), &[], HeaderMap::new(), Some(body))
            .await
    }

    pub async fn remove_pending_member(&self, sid: &str, email: &str) -> Result<(), Error> {
        let route = Route::SharePendingMember { sid, email };
        self.call(Method::DELETE, route, &[], HeaderMap::new(), None)
            .await?;
        Ok(())
    }

    // Groups.

    pub async fn list_sf_groups(&self, sid: &str) -> Result<Tagged<Vec<SFGroupMember>>, Error> {
        self.call_json(Method::GET, Route::ShareGroups(sid), &[], HeaderMap::new(), None)
            .await
    }

    pub async fn get_sf_group(&self, sid: &str, gid: &str) -> Result<Tagged<SFGroupMember>, Error> {
        let route = Route::ShareGroup { sid, gid };
        self.call_json(Method::GET, route, &[], HeaderMap::new(), None)
            .await
    }

    /// Adds group `gid` to the shared folder with `permissions`.
    pub async fn add_sf_group(
        &self,
        sid: &str,
        gid: &str,
        permissions: &[Permission],
    ) -> Result<Tagged<SFGroupMember>, Error> {
        let body = json_body(&NewSFGroup { id: gid, permissions })?;
        self.call_json(Method::POST, Route::ShareGroups(sid), &[], HeaderMap::new(), Some(body))
            .await
    }

    pub async fn set_sf_group_permissions(
        &self,
        sid: &str,
        gid: &str,
        permissions: &[Permission],
    ) -> Result<Tagged<SFGroupMember>, Error> {
        let body = json_body(&PermissionList { permissions })?;
        let route = Route::ShareGroup { sid, gid };
        self.call_json(Method::PUT, route, &[], HeaderMap::new(), Some(body))
            .await
    }

    pub async fn remove_sf_group(&self, sid: &str, gid: &str) -> Result<(), Error> {
        let route = Route::ShareGroup { sid, gid };
        self.call(Method::DELETE, route, &[], HeaderMap::new(), None)
            .await?;
        Ok(())
    }
}
