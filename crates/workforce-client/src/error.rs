//! # Client Error Types
//!
//! Error types for data-source calls, configuration and the list controller.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Response            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Http           │  │  Status (non-2xx)       │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  Conflict (409)         │ │
//! │  │  ConfigLoad/Save│  │  Unavailable    │  │  Rejected (success:false│ │
//! │  └─────────────────┘  └─────────────────┘  │  Decode                 │ │
//! │                                            └─────────────────────────┘ │
//! │  ┌─────────────────┐                                                   │
//! │  │     Core        │  CoreError from workforce-core (validation,       │
//! │  │                 │  missing identifier)                              │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors never reach the rendering layer: the controller turns them into a
//! snapshot error string (fetches) or a notification (mutations) using
//! [`ClientError::user_message`].

use thiserror::Error;
use workforce_core::{CoreError, ValidationError};

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Request could not be sent or the connection dropped.
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Request timed out")]
    Timeout,

    /// Backend temporarily unreachable.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    // =========================================================================
    // Response Errors
    // =========================================================================
    /// HTTP 409: the record clashes with an existing one.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Any other non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The envelope said `success: false`.
    #[error("Request rejected: {message}")]
    Rejected { message: String },

    /// Body did not match any accepted envelope shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    // =========================================================================
    // Core Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Core(CoreError::Validation(err))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::from_status(status.as_u16(), err.to_string())
        } else {
            ClientError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Maps a non-success HTTP status to an error, singling out 409.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            409 => ClientError::Conflict { message },
            503 => ClientError::Unavailable(message),
            _ => ClientError::Status { status, message },
        }
    }

    /// True for HTTP 409.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ClientError::Conflict { .. })
    }

    /// Returns true if a manual retry may succeed.
    ///
    /// The controller never retries on its own; this only decides whether
    /// the UI offers a retry affordance.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http(_) | ClientError::Timeout | ClientError::Unavailable(_) => true,
            ClientError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }

    /// Human-readable text for a toast or an error banner.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Conflict { message } if !message.trim().is_empty() => {
                format!("Conflict: {}", message)
            }
            ClientError::Conflict { .. } => {
                "Conflict: a record with the same details already exists".to_string()
            }
            ClientError::Rejected { message } => message.clone(),
            ClientError::Status { status, message } if message.trim().is_empty() => {
                format!("Request failed with status {}", status)
            }
            ClientError::Status { message, .. } => message.clone(),
            ClientError::Timeout => "The server took too long to respond".to_string(),
            ClientError::Http(_) | ClientError::Unavailable(_) => {
                "Unable to reach the server".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(ClientError::from_status(409, "Code already used").is_conflict());
        assert!(matches!(
            ClientError::from_status(503, "down"),
            ClientError::Unavailable(_)
        ));
        assert!(matches!(
            ClientError::from_status(404, "missing"),
            ClientError::Status { status: 404, .. }
        ));
    }

    #[test]
    fn test_retryable_errors() {
        assert!(ClientError::Timeout.is_retryable());
        assert!(ClientError::from_status(500, "boom").is_retryable());
        assert!(!ClientError::from_status(422, "bad").is_retryable());
        assert!(!ClientError::from_status(409, "dup").is_retryable());
        assert!(!ClientError::InvalidConfig("x".into()).is_retryable());
    }

    #[test]
    fn test_user_messages() {
        let conflict = ClientError::Conflict {
            message: String::new(),
        };
        assert!(conflict.user_message().starts_with("Conflict"));

        let status = ClientError::Status {
            status: 500,
            message: String::new(),
        };
        assert_eq!(status.user_message(), "Request failed with status 500");

        let rejected = ClientError::Rejected {
            message: "Region is in use".into(),
        };
        assert_eq!(rejected.user_message(), "Region is in use");
    }

    #[test]
    fn test_config_errors() {
        assert!(ClientError::InvalidUrl("x".into()).is_config_error());
        assert!(!ClientError::Timeout.is_config_error());
    }
}
