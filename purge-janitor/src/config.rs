use std::time::Duration;

use envconfig::Envconfig;

use purge_common::config::JobSettings;
use purge_common::context::{CommandItem, NameValueList, ScheduleItem};

#[derive(Envconfig)]
pub struct Config {
    #[envconfig(from = "BIND_HOST", default = "0.0.0.0")]
    pub host: String,

    #[envconfig(from = "BIND_PORT", default = "8000")]
    pub port: u16,

    #[envconfig(from = "IDENTITY_SERVER_AUTHORITY")]
    pub identity_server_authority: String,

    #[envconfig(from = "PURGE_HOST_PREFIX")]
    pub host_prefix: Option<String>,

    #[envconfig(from = "SERVER_URL", default = "http://localhost")]
    pub server_url: String,

    #[envconfig(from = "PURGE_USERNAME")]
    pub username: String,

    #[envconfig(from = "PURGE_PASSWORD")]
    pub password: String,

    #[envconfig(from = "PURGE_CLIENT_SECRET")]
    pub client_secret: String,

    #[envconfig(from = "PURGE_DEFAULT_CUTOFF_DAYS", default = "180")]
    pub default_cutoff_days: u32,

    #[envconfig(from = "PURGE_PARAMETERS", default = "")]
    pub parameters: String,

    #[envconfig(from = "PURGE_COMMAND_NAME", default = "Purge Contacts")]
    pub command_name: String,

    #[envconfig(from = "PURGE_SCHEDULE_NAME", default = "Purge Contacts Schedule")]
    pub schedule_name: String,

    #[envconfig(from = "PURGE_INTERVAL_SECS", default = "86400")]
    pub purge_interval_secs: u64,

    #[envconfig(from = "HTTP_TIMEOUT_SECS")]
    pub http_timeout_secs: Option<u64>,
}

impl Config {
    pub fn bind(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn job_settings(&self) -> JobSettings {
        JobSettings {
            identity_server_authority: self.identity_server_authority.clone(),
            host_prefix: self.host_prefix.clone(),
            server_url: self.server_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            client_secret: self.client_secret.clone(),
            default_cutoff_days: self.default_cutoff_days,
        }
    }

    pub fn command(&self) -> CommandItem {
        CommandItem::new(
            self.command_name.as_str(),
            NameValueList::parse(&self.parameters),
        )
    }

    pub fn schedule(&self) -> ScheduleItem {
        ScheduleItem::new(self.schedule_name.as_str())
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }
}
