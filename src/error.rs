//! Error types for research-rs.
//!
//! Library code returns [`AgentError`] from the backend adapters and the
//! method selector; CLI code wraps everything in [`Error`].

use thiserror::Error;

/// Result alias used by CLI and export code.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Backend, configuration, or routing failure.
    #[error("{0}")]
    Agent(#[from] AgentError),

    /// CLI command failure.
    #[error("{0}")]
    Command(#[from] CommandError),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the research backends and the method selector.
#[derive(Error, Debug)]
pub enum AgentError {
    /// No API key was configured.
    #[error("OpenAI API key required: set OPENAI_API_KEY or pass an explicit key")]
    ApiKeyMissing,

    /// The vendor rejected the credential.
    #[error("API key rejected (HTTP {status}): {message}")]
    Unauthorized {
        /// HTTP status returned by the vendor.
        status: u16,
        /// Vendor error message.
        message: String,
    },

    /// The organization is not verified for a requested capability
    /// (reasoning summaries).
    #[error("organization not verified for requested capability: {message}")]
    CapabilityNotVerified {
        /// Vendor error message.
        message: String,
    },

    /// Any other failed API request.
    #[error("API request failed: {message}")]
    ApiRequest {
        /// Error description.
        message: String,
        /// HTTP status code, when the request reached the server.
        status: Option<u16>,
    },

    /// The response body could not be decoded.
    #[error("failed to parse API response: {message}")]
    ResponseParse {
        /// Decoder message.
        message: String,
    },

    /// The response contained no usable output.
    #[error("API response contained no output")]
    EmptyResponse,

    /// The agent run kept handing off past the turn limit.
    #[error("agent run exceeded {max_turns} turns")]
    MaxTurnsExceeded {
        /// Configured turn limit.
        max_turns: usize,
    },

    /// A hand-off named an agent that is not in the roster.
    #[error("unknown hand-off target: {name}")]
    UnknownAgent {
        /// Requested agent name.
        name: String,
    },

    /// Unknown provider name in configuration.
    #[error("unsupported provider: {name}")]
    UnsupportedProvider {
        /// Provider name.
        name: String,
    },

    /// The selector had nothing to fall back to.
    #[error("no research methods available")]
    NoBackendAvailable,

    /// A forced method has no configured backend.
    #[error("{method} backend not available")]
    BackendUnavailable {
        /// Requested method identifier.
        method: String,
    },

    /// Empty or oversized query, or another invocation-level problem.
    #[error("{message}")]
    InvalidQuery {
        /// Error description.
        message: String,
    },
}

impl AgentError {
    /// Classifies a non-success HTTP response from the vendor.
    ///
    /// A message containing `"must be verified"` maps to
    /// [`AgentError::CapabilityNotVerified`] regardless of status; otherwise
    /// 401/403 map to [`AgentError::Unauthorized`] and everything else is an
    /// [`AgentError::ApiRequest`].
    #[must_use]
    pub fn from_api_failure(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains("must be verified") {
            return Self::CapabilityNotVerified { message };
        }
        if status == 401 || status == 403 {
            return Self::Unauthorized { status, message };
        }
        Self::ApiRequest {
            message: format!("HTTP {status}: {message}"),
            status: Some(status),
        }
    }

    /// Returns `true` for failures that abort the invocation instead of
    /// becoming a textual result.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ApiKeyMissing
                | Self::Unauthorized { .. }
                | Self::NoBackendAvailable
                | Self::BackendUnavailable { .. }
                | Self::InvalidQuery { .. }
                | Self::UnsupportedProvider { .. }
        )
    }
}

/// CLI command errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// A flag value could not be interpreted.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The command could not complete.
    #[error("{0}")]
    ExecutionFailed(String),

    /// Output rendering failed.
    #[error("output format error: {0}")]
    OutputFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_unauthorized() {
        let err = AgentError::from_api_failure(401, "Incorrect API key provided");
        assert!(matches!(err, AgentError::Unauthorized { status: 401, .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_classify_verification() {
        let err = AgentError::from_api_failure(
            400,
            "Your organization must be verified to generate reasoning summaries.",
        );
        assert!(matches!(err, AgentError::CapabilityNotVerified { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_classify_verification_on_forbidden() {
        let err = AgentError::from_api_failure(403, "organization must be verified");
        assert!(matches!(err, AgentError::CapabilityNotVerified { .. }));
    }

    #[test]
    fn test_classify_other() {
        let err = AgentError::from_api_failure(500, "server error");
        assert!(matches!(
            err,
            AgentError::ApiRequest {
                status: Some(500),
                ..
            }
        ));
        assert!(err.to_string().contains("server error"));
    }

    #[test]
    fn test_error_wraps_agent_error() {
        let err: Error = AgentError::NoBackendAvailable.into();
        assert_eq!(err.to_string(), "no research methods available");
    }
}
