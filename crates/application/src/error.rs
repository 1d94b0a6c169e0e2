//! Application error types

use fln_identity_domain::IdentityError;
use thiserror::Error;

/// Failures reported by a [`GenericOAuth2Client`](crate::ports::GenericOAuth2Client).
///
/// These are matched by kind at the adapter boundary and never reach callers
/// of [`IdentityClient`](crate::IdentityClient).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OAuth2ClientError {
    /// The grant name is not one the client knows.
    #[error("invalid grant: {0}")]
    InvalidGrant(String),

    /// A parameter required by the grant was not passed.
    #[error("{0}")]
    MissingParameter(String),

    /// An option or returned value is invalid.
    #[error("{0}")]
    InvalidArgument(String),

    /// The provider strategy rejected the response body.
    #[error(transparent)]
    Rejected(IdentityError),

    /// The HTTP exchange failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be parsed.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl OAuth2ClientError {
    /// Translation used outside token exchange: provider rejections pass
    /// through, everything else is a transport failure.
    #[must_use]
    pub fn into_identity_error(self) -> IdentityError {
        match self {
            Self::Rejected(error) => error,
            Self::Transport(message) | Self::InvalidResponse(message) => {
                IdentityError::transport(message)
            }
            other => IdentityError::transport(other.to_string()),
        }
    }
}

/// Result type alias for generic client operations.
pub type OAuth2ClientResult<T> = Result<T, OAuth2ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rejected_passes_through() {
        let inner = IdentityError::Provider {
            message: "Invalid token".to_string(),
        };
        let err = OAuth2ClientError::Rejected(inner.clone());
        assert_eq!(err.to_string(), "Invalid token");
        assert_eq!(err.into_identity_error(), inner);
    }

    #[test]
    fn test_other_kinds_become_transport() {
        assert_eq!(
            OAuth2ClientError::InvalidResponse("not json".to_string()).into_identity_error(),
            IdentityError::transport("not json")
        );
        assert_eq!(
            OAuth2ClientError::InvalidArgument("bad".to_string()).into_identity_error(),
            IdentityError::transport("bad")
        );
    }
}
