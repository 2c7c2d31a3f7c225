//! OAuth authorization-code flow against the appliance.
//!
//! The third-party app sends the user to [`AuthClient::authorization_url`],
//! receives a code on its redirect URI, and trades it for a bearer token
//! with [`AuthClient::exchange_code`].

use std::path::Path;

use aerofs_types::AccessToken;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::unpack;
use crate::error::Error;

/// App registration, as written to `appconfig.json` by the appliance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Appliance hostname, e.g. `share.example.com`.
    pub hostname: String,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let data = std::fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}

pub struct AuthClient {
    http: reqwest::Client,
    app: AppConfig,
    base_url: Url,
    redirect_uri: String,
    state: String,
    scopes: Vec<String>,
}

impl AuthClient {
    pub fn new(app: AppConfig, redirect_uri: &str, state: &str, scopes: &[&str]) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("https://{}/", app.hostname))
            .map_err(|e| Error::InvalidRequest(format!("invalid hostname {:?}: {e}", app.hostname)))?;
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            app,
            base_url,
            redirect_uri: redirect_uri.to_string(),
            state: state.to_string(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Points the client at another server root, e.g. a local test server.
    pub fn with_base_url(mut self, url: &str) -> Result<Self, Error> {
        self.base_url =
            Url::parse(url).map_err(|e| Error::InvalidRequest(format!("invalid base URL {url:?}: {e}")))?;
        Ok(self)
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    /// Where to send the user to grant access.
    pub fn authorization_url(&self) -> Result<Url, Error> {
        let mut url = self.endpoint("authorize")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.app.client_id)
                .append_pair("redirect_uri", &self.redirect_uri)
                .append_pair("scope", &self.scopes.join(","));
            if !self.state.is_empty() {
                query.append_pair("state", &self.state);
            }
        }
        Ok(url)
    }

    /// Trades an authorization `code` for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<AccessToken, Error> {
        let url = self.endpoint("auth/token")?;
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.app.client_id.as_str()),
            ("client_secret", self.app.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];

        let response = self.http.post(url).form(&form).send().await?;
        let token: AccessToken = unpack(response).await?.json()?;
        info!(scopes = %token.scope, "access token granted");
        Ok(token)
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path)
            .map_err(|e| Error::InvalidRequest(format!("cannot build URL for {path}: {e}")))
    }
}
