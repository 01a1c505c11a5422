use std::fmt;

use http::header::{HeaderValue, CACHE_CONTROL};
use serde_derive::Deserialize;
use tracing::{error, info};

use crate::config::JobConfiguration;
use crate::error::PurgeError;
use crate::http::{FormPost, HttpSender};

/// A short-lived credential for the purge task endpoint. Spent by the first request that uses it.
pub struct BearerToken(String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// Exchanges the service account credentials for a bearer token using the password grant.
pub async fn acquire_token(
    http: &dyn HttpSender,
    config: &JobConfiguration,
) -> Result<BearerToken, PurgeError> {
    let mut request = FormPost::new(config.token_url().clone())
        .field("grant_type", "password")
        .field("username", config.username())
        .field("password", config.password())
        .field("client_id", config.client_id())
        .field("client_secret", config.client_secret());
    request
        .headers
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    let response = http.post_form(request).await?;

    if !response.status.is_success() {
        error!(
            status = response.status.as_u16(),
            body = %response.body,
            "Contact purge command failed with error: {}",
            response.body
        );
        return Err(PurgeError::TokenRejected {
            status: response.status,
            body: response.body,
        });
    }

    let token_response: TokenResponse =
        serde_json::from_str(&response.body).map_err(|source| PurgeError::MalformedResponse {
            endpoint: "token",
            source,
        })?;

    let access_token = token_response
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or(PurgeError::MissingAccessToken)?;

    info!(
        username = config.username(),
        "Contact purge command successfully obtained API token for user {}.",
        config.username()
    );

    Ok(BearerToken(access_token))
}
