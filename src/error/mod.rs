//! Lucid Error Types
//!
//! Error hierarchy for the authorization handshake, resource calls and pagination.

use std::time::Duration;
use thiserror::Error;

/// Fallback code when the provider error body carries no `error` field.
pub const UNKNOWN_ERROR_CODE: &str = "unknown_error";

/// Fallback description when the provider error body carries no `error_description` field.
pub const UNKNOWN_ERROR_DESCRIPTION: &str = "Unknown error occurred";

/// Root error type for the Lucid integration.
#[derive(Error, Debug)]
pub enum LucidError {
    #[error("OAuth error: {0}")]
    OAuth(#[from] OAuthError),

    #[error("Insufficient scope: requires one of [{}]", required.join(", "))]
    InsufficientScope {
        required: Vec<String>,
        granted: Vec<String>,
    },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Deadline of {deadline:?} exceeded")]
    DeadlineExceeded { deadline: Duration },

    #[error("I/O error: {message}")]
    Io { message: String },
}

impl LucidError {
    /// Machine-readable error code. OAuth errors return the provider code verbatim.
    pub fn error_code(&self) -> &str {
        match self {
            Self::OAuth(e) => &e.code,
            Self::InsufficientScope { .. } => "invalid_scopes",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Api { .. } => "api_error",
            Self::Parse { .. } => "parsing_error",
            Self::Network(_) => "network_error",
            Self::Configuration(_) => "configuration_error",
            Self::DeadlineExceeded { .. } => "deadline_exceeded",
            Self::Io { .. } => "io_error",
        }
    }

    /// Check if error requires the user to authorize again.
    pub fn needs_reauth(&self) -> bool {
        match self {
            Self::OAuth(e) => matches!(
                e.code.as_str(),
                "invalid_grant" | "invalid_token" | "invalid_client"
            ),
            Self::Unauthorized { .. } => true,
            _ => false,
        }
    }

    /// Build an OAuth error from a code and description.
    pub fn oauth(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::OAuth(OAuthError::new(code, description))
    }

    /// Build an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Build a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

/// Authorization, token or introspection failure with a provider-defined code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {description}")]
pub struct OAuthError {
    /// Provider-defined machine-readable code (e.g. `invalid_grant`).
    pub code: String,
    /// Human-readable description.
    pub description: String,
}

impl OAuthError {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },
}

/// Network/transport error.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Failed to read response body: {message}")]
    BodyRead { message: String },
}

/// Result type for Lucid operations.
pub type LucidResult<T> = Result<T, LucidError>;

/// OAuth2 error body returned by the token endpoint.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct OAuthErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Map a non-success token endpoint response to an [`OAuthError`].
///
/// Missing fields fall back to [`UNKNOWN_ERROR_CODE`] and [`UNKNOWN_ERROR_DESCRIPTION`].
/// A body that is not JSON at all is a `parsing_error`.
pub fn oauth_error_from_body(body: &str) -> OAuthError {
    match serde_json::from_str::<OAuthErrorResponse>(body) {
        Ok(response) => OAuthError::new(
            response
                .error
                .unwrap_or_else(|| UNKNOWN_ERROR_CODE.to_string()),
            response
                .error_description
                .unwrap_or_else(|| UNKNOWN_ERROR_DESCRIPTION.to_string()),
        ),
        Err(e) => OAuthError::new(
            "parsing_error",
            format!("Error occurred while parsing the response: {}", e),
        ),
    }
}

/// Map a transport failure on the token endpoint to an [`OAuthError`].
pub fn oauth_error_from_transport(error: LucidError) -> LucidError {
    match error {
        LucidError::Network(e) => LucidError::oauth(
            "network_error",
            format!("Error occurred while making the request: {}", e),
        ),
        other => other,
    }
}
