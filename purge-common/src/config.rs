use std::fmt;

use url::Url;

use crate::context::CutoffDays;
use crate::error::ConfigurationError;

/// The OAuth2 client registered with the identity server for password grants.
pub const CLIENT_ID: &str = "SitecorePassword";
pub const TOKEN_PATH: &str = "/connect/token";
pub const TASK_PATH: &str = "/sitecore/api/datatools/purge/tasks/contacts";
pub const DEFAULT_CUTOFF_DAYS: u32 = 180;

/// Raw values as they come out of a settings store. Nothing is validated yet.
#[derive(Clone, Default)]
pub struct JobSettings {
    pub identity_server_authority: String,
    /// Prefix for the task endpoint. Falls back to `server_url` when absent or empty.
    pub host_prefix: Option<String>,
    pub server_url: String,
    pub username: String,
    pub password: String,
    pub client_secret: String,
    pub default_cutoff_days: u32,
}

/// Validated, immutable configuration for a [`crate::job::PurgeContactsJob`].
#[derive(Clone)]
pub struct JobConfiguration {
    token_url: Url,
    task_url: Url,
    username: String,
    password: String,
    client_secret: String,
    default_cutoff_days: CutoffDays,
}

impl JobConfiguration {
    pub fn from_settings(settings: JobSettings) -> Result<Self, ConfigurationError> {
        let authority = required(
            "IdentityServer.Authority",
            &settings.identity_server_authority,
        )?;
        let username = required("PurgeCommand.Username", &settings.username)?;
        let password = required("PurgeCommand.Password", &settings.password)?;
        let client_secret = required("PurgeCommand.ClientSecret", &settings.client_secret)?;

        let host_prefix = settings
            .host_prefix
            .as_deref()
            .map(str::trim)
            .filter(|prefix| !prefix.is_empty())
            .unwrap_or(settings.server_url.trim());

        let token_url = endpoint("IdentityServer.Authority", authority.trim(), TOKEN_PATH)?;
        let task_url = endpoint("PurgeCommand.HostPrefix", host_prefix, TASK_PATH)?;

        let default_cutoff_days = CutoffDays::new(settings.default_cutoff_days).ok_or(
            ConfigurationError::InvalidDefaultCutoff(settings.default_cutoff_days),
        )?;

        Ok(Self {
            token_url,
            task_url,
            username: username.to_owned(),
            password: password.to_owned(),
            client_secret: client_secret.to_owned(),
            default_cutoff_days,
        })
    }

    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    pub fn task_url(&self) -> &Url {
        &self.task_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn client_id(&self) -> &'static str {
        CLIENT_ID
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn default_cutoff_days(&self) -> CutoffDays {
        self.default_cutoff_days
    }
}

impl fmt::Debug for JobConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobConfiguration")
            .field("token_url", &self.token_url.as_str())
            .field("task_url", &self.task_url.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("client_id", &CLIENT_ID)
            .field("client_secret", &"<redacted>")
            .field("default_cutoff_days", &self.default_cutoff_days)
            .finish()
    }
}

/// Rejects blank values. The value itself is kept byte for byte.
fn required<'a>(name: &'static str, value: &'a str) -> Result<&'a str, ConfigurationError> {
    if value.trim().is_empty() {
        return Err(ConfigurationError::MissingValue(name));
    }
    Ok(value)
}

fn endpoint(name: &'static str, base: &str, path: &str) -> Result<Url, ConfigurationError> {
    let value = format!("{}{path}", base.trim_end_matches('/'));
    Url::parse(&value).map_err(|error| ConfigurationError::InvalidUrl {
        name,
        value,
        reason: error.to_string(),
    })
}
