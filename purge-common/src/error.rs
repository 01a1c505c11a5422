use http::StatusCode;
use thiserror::Error;

/// A required setting was absent or unusable. Raised while building a
/// [`crate::config::JobConfiguration`], before any request leaves the process.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("configuration value for {0} must be provided")]
    MissingValue(&'static str),
    #[error("{name} does not resolve to a valid URL '{value}': {reason}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("default cutoff days must be greater than zero, got {0}")]
    InvalidDefaultCutoff(u32),
}

/// The `CutoffDays` command parameter could not be used.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParameterError {
    #[error("{name} is not a valid number: '{value}'")]
    NotANumber { name: &'static str, value: String },
    #[error("{name} must be greater than zero, got {value}")]
    NotPositive { name: &'static str, value: i32 },
}

/// A request could not be sent or its response body could not be read.
#[derive(Error, Debug)]
#[error("request to {url} failed: {source}")]
pub struct TransportError {
    pub url: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl TransportError {
    pub fn new(
        url: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            url: url.into(),
            source: source.into(),
        }
    }
}

/// Which stage a failed purge run stopped at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    Parameter,
    Authentication,
    Registration,
    Unexpected,
    Panic,
}

impl FailureKind {
    /// Label used for the `outcome` metric.
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Parameter => "parameter",
            FailureKind::Authentication => "authentication",
            FailureKind::Registration => "registration",
            FailureKind::Unexpected => "unexpected",
            FailureKind::Panic => "panic",
        }
    }
}

/// Everything that can end a purge run early.
#[derive(Error, Debug)]
pub enum PurgeError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error("token endpoint returned status {status}: {body}")]
    TokenRejected { status: StatusCode, body: String },
    #[error("response does not contain a valid access token")]
    MissingAccessToken,
    #[error("purge task endpoint returned status {status}: {body}")]
    TaskRejected { status: StatusCode, body: String },
    #[error("response does not contain a valid task ID")]
    MissingTaskId,
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("failed to parse {endpoint} response body: {source}")]
    MalformedResponse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl PurgeError {
    /// Whether the component that raised this error has already logged it.
    /// Remote rejections are logged with their response body where they happen.
    pub fn is_reported(&self) -> bool {
        matches!(
            self,
            PurgeError::TokenRejected { .. } | PurgeError::TaskRejected { .. }
        )
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            PurgeError::Parameter(_) => FailureKind::Parameter,
            PurgeError::TokenRejected { .. } | PurgeError::MissingAccessToken => {
                FailureKind::Authentication
            }
            PurgeError::TaskRejected { .. } | PurgeError::MissingTaskId => {
                FailureKind::Registration
            }
            PurgeError::Transport(_) | PurgeError::MalformedResponse { .. } => {
                FailureKind::Unexpected
            }
        }
    }
}
