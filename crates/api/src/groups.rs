//! Groups and group membership.

use aerofs_types::requests::{Named, NewGroupMember};
use aerofs_types::{Group, GroupList, GroupMember};
use reqwest::Method;
use reqwest::header::HeaderMap;

use crate::client::{Client, Tagged, json_body};
use crate::error::Error;
use crate::routes::Route;

impl Client {
    /// Lists up to `results` groups starting at `offset`.
    pub async fn list_groups(&self, offset: u32, results: u32) -> Result<Tagged<GroupList>, Error> {
        let query = [("offset", offset.to_string()), ("results", results.to_string())];
        self.call_json(Method::GET, Route::Groups, &query, HeaderMap::new(), None)
            .await
    }

    pub async fn create_group(&self, name: &str) -> Result<Tagged<Group>, Error> {
        let body = json_body(&Named { name })?;
        self.call_json(Method::POST, Route::Groups, &[], HeaderMap::new(), Some(body))
            .await
    }

    pub async fn get_group(&self, gid: &str) -> Result<Tagged<Group>, Error> {
        self.call_json(Method::GET, Route::Group(gid), &[], HeaderMap::new(), None)
            .await
    }

    pub async fn delete_group(&self, gid: &str) -> Result<(), Error> {
        self.call(Method::DELETE, Route::Group(gid), &[], HeaderMap::new(), None)
            .await?;
        Ok(())
    }

    pub async fn list_group_members(&self, gid: &str) -> Result<Tagged<Vec<GroupMember>>, Error> {
        self.call_json(Method::GET, Route::GroupMembers(gid), &[], HeaderMap::new(), None)
            .await
    }

    pub async fn add_group_member(&self, gid: &str, email: &str) -> Result<Tagged<GroupMember>, Error> {
        let body = json_body(&NewGroupMember { email })?;
        self.call_json(Method::POST, Route::GroupMembers(gid), &[], HeaderMap::new(), Some(body))
            .await
    }

    pub async fn get_group_member(&self, gid: &str, email: &str) -> Result<Tagged<GroupMember>, Error> {
        let route = Route::GroupMember { gid, email };
        self.call_json(Method::GET, route, &[], HeaderMap::new(), None)
            .await
    }

    pub async fn remove_group_member(&self, gid: &str, email: &str) -> Result<(), Error> {
        let route = Route::GroupMember { gid, email };
        self.call(Method::DELETE, route, &[], HeaderMap::new(), None)
            .await?;
        Ok(())
    }
}
