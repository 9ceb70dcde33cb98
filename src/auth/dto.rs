use serde::{Deserialize, Serialize};

/// Body of both `/signup` and `/login`. Fields are optional so that a
/// missing field surfaces as a validation error rather than a JSON rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Credentials that passed validation: both fields present and non-empty.
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl CredentialsRequest {
    pub fn into_credentials(self) -> Option<Credentials> {
        let username = self.username.filter(|u| !u.is_empty())?;
        let password = self.password.filter(|p| !p.is_empty())?;
        Some(Credentials { username, password })
    }
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
