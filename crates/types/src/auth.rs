use serde::{Deserialize, Serialize};

/// Token response of the appliance's OAuth `auth/token` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds; 0 means the appliance did not say.
    #[serde(default)]
    pub expires_in: i64,
    /// Comma-separated list of granted scopes.
    #[serde(default)]
    pub scope: String,
}

impl AccessToken {
    /// Returns the granted scopes, split on commas.
    pub fn scopes(&self) -> Vec<String> {
        self.scope
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}
