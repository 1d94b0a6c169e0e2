//! Domain error types

use serde_json::Value;
use thiserror::Error;

/// Errors surfaced to callers of the identity client.
///
/// Every failure of the underlying OAuth2 machinery is translated into one
/// of these kinds before it reaches a caller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IdentityError {
    /// The provider configuration is incomplete or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An authenticated operation was attempted without an access token.
    #[error("No access token set.")]
    NotAuthenticated,

    /// The provider API answered with an error code (message-only form).
    #[error("{message}")]
    Provider {
        /// Human readable message from the provider.
        message: String,
    },

    /// The provider API answered with an error code, keeping the full
    /// response body for diagnostics.
    #[error("{message}")]
    IdentityProvider {
        /// Human readable message from the provider.
        message: String,
        /// Numeric code attached to the failure.
        code: i64,
        /// The parsed response body as received.
        body: Value,
    },

    /// The authorization grant could not be exchanged for a token.
    #[error("{message}")]
    TokenExchange {
        /// User facing description of the failure.
        message: String,
    },

    /// A serialized access token could not be rehydrated.
    #[error("{0}")]
    InvalidAccessToken(String),

    /// The profile response lacks the field used as owner identifier.
    #[error("resource owner response has no usable \"{field}\" field")]
    MissingOwnerId {
        /// Name of the identifier field.
        field: String,
    },

    /// The request could not be completed below the provider layer.
    #[error("transport error: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
    },
}

impl IdentityError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a token exchange error.
    #[must_use]
    pub fn token_exchange(message: impl Into<String>) -> Self {
        Self::TokenExchange {
            message: message.into(),
        }
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Returns the raw provider response body, if this error carries one.
    #[must_use]
    pub const fn response_body(&self) -> Option<&Value> {
        match self {
            Self::IdentityProvider { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Result type alias for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_provider_errors_display_message_only() {
        let minimal = IdentityError::Provider {
            message: "Invalid scope".to_string(),
        };
        assert_eq!(minimal.to_string(), "Invalid scope");

        let rich = IdentityError::IdentityProvider {
            message: "Invalid scope".to_string(),
            code: 0,
            body: json!({"error_code": "InvalidScope", "message": "Invalid scope"}),
        };
        assert_eq!(rich.to_string(), "Invalid scope");
    }

    #[test]
    fn test_response_body_only_on_rich_error() {
        let body = json!({"error_code": 7});
        let rich = IdentityError::IdentityProvider {
            message: "x".to_string(),
            code: 0,
            body: body.clone(),
        };
        assert_eq!(rich.response_body(), Some(&body));
        assert!(IdentityError::NotAuthenticated.response_body().is_none());
    }

    #[test]
    fn test_not_authenticated_message() {
        assert_eq!(
            IdentityError::NotAuthenticated.to_string(),
            "No access token set."
        );
    }
}
