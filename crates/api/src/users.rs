//! Users, their shared-folder invitations, and invitees.

use aerofs_types::requests::{NewInvitee, NewUser, UserNames};
use aerofs_types::{Invitation, Invitee, SharedFolder, User, UserList};
use reqwest::Method;
use reqwest::header::HeaderMap;

use crate::client::{Client, Tagged, Unpacked, json_body};
use crate::error::Error;
use crate::routes::Route;

impl Client {
    /// Lists users, at most `limit` per page, paging with the `after` /
    /// `before` cursors.
    pub async fn list_users(
        &self,
        limit: u32,
        after: Option<&str>,
        before: Option<&str>,
    ) -> Result<Tagged<UserList>, Error> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(after) = after {
            query.push(("after", after.to_string()));
        }
        if let Some(before) = before {
            query.push(("before", before.to_string()));
        }
        self.call_json(Method::GET, Route::Users, &query, HeaderMap::new(), None)
            .await
    }

    pub async fn get_user(&self, email: &str) -> Result<Tagged<User>, Error> {
        self.call_json(Method::GET, Route::User(email), &[], HeaderMap::new(), None)
            .await
    }

    pub async fn create_user(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Tagged<User>, Error> {
        let body = json_body(&NewUser {
            email,
            first_name,
            last_name,
        })?;
        self.call_json(Method::POST, Route::Users, &[], HeaderMap::new(), Some(body))
            .await
    }

    pub async fn update_user(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Tagged<User>, Error> {
        let body = json_body(&UserNames {
            first_name,
            last_name,
        })?;
        self.call_json(Method::PUT, Route::User(email), &[], HeaderMap::new(), Some(body))
            .await
    }

    pub async fn delete_user(&self, email: &str) -> Result<(), Error> {
        self.call(Method::DELETE, Route::User(email), &[], HeaderMap::new(), None)
            .await?;
        Ok(())
    }

    /// Sets a new password. The body is the password as a JSON string.
    pub async fn change_password(&self, email: &str, password: &str) -> Result<(), Error> {
        let body = json_body(password)?;
        self.call(Method::PUT, Route::UserPassword(email), &[], HeaderMap::new(), Some(body))
            .await?;
        Ok(())
    }

    pub async fn disable_password(&self, email: &str) -> Result<(), Error> {
        self.call(Method::DELETE, Route::UserPassword(email), &[], HeaderMap::new(), None)
            .await?;
        Ok(())
    }

    /// Queries the user's two-factor setting. The raw response is returned
    /// as-is.
    pub async fn check_two_factor(&self, email: &str) -> Result<Unpacked, Error> {
        self.call(Method::GET, Route::UserTwoFactor(email), &[], HeaderMap::new(), None)
            .await
    }

    pub async fn disable_two_factor(&self, email: &str) -> Result<(), Error> {
        self.call(Method::DELETE, Route::UserTwoFactor(email), &[], HeaderMap::new(), None)
            .await?;
        Ok(())
    }

    // Shared-folder invitations addressed to a user.

    pub async fn list_invitations(&self, email: &str) -> Result<Tagged<Vec<Invitation>>, Error> {
        self.call_json(Method::GET, Route::UserInvitations(email), &[], HeaderMap::new(), None)
            .await
    }

    pub async fn get_invitation(&self, email: &str, sid: &str) -> Result<Tagged<Invitation>, Error> {
        let route = Route::UserInvitation { email, sid };
        self.call_json(Method::GET, route, &[], HeaderMap::new(), None)
            .await
    }

    /// Accepts an invitation. `external` joins the folder as an external
    /// (non-synced) share.
    pub async fn accept_invitation(
        &self,
        email: &str,
        sid: &str,
        external: bool,
    ) -> Result<Tagged<SharedFolder>, Error> {
        let route = Route::UserInvitation { email, sid };
        let query = [("external", u8::from(external).to_string())];
        self.call_json(Method::POST, route, &query, HeaderMap::new(), None)
            .await
    }

    pub async fn ignore_invitation(&self, email: &str, sid: &str) -> Result<(), Error> {
        let route = Route::UserInvitation { email, sid };
        self.call(Method::DELETE, route, &[], HeaderMap::new(), None)
            .await?;
        Ok(())
    }

    // Invitees: people invited to sign up.

    pub async fn get_invitee(&self, email: &str) -> Result<Tagged<Invitee>, Error> {
        self.call_json(Method::GET, Route::Invitee(email), &[], HeaderMap::new(), None)
            .await
    }

    pub async fn create_invitee(
        &self,
        email_to: &str,
        email_from: &str,
    ) -> Result<Tagged<Invitee>, Error> {
        let body = json_body(&NewInvitee {
            email_to,
            email_from,
        })?;
        self.call_json(Method::POST, Route::Invitees, &[], HeaderMap::new(), Some(body))
            .await
    }

    pub async fn delete_invitee(&self, email: &str) -> Result<(), Error> {
        self.call(Method::DELETE, Route::Invitee(email), &[], HeaderMap::new(), None)
            .await?;
        Ok(())
    }
}
