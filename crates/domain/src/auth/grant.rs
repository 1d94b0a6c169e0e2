//! Authorization grant kinds

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Grant types understood by the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grant {
    /// Exchange of an authorization code.
    AuthorizationCode,
    /// Exchange of a refresh token.
    RefreshToken,
    /// Resource owner password credentials.
    Password,
    /// Client credentials.
    ClientCredentials,
}

impl Grant {
    /// The `grant_type` form value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::RefreshToken => "refresh_token",
            Self::Password => "password",
            Self::ClientCredentials => "client_credentials",
        }
    }

    /// Token request parameters that must be supplied for this grant.
    #[must_use]
    pub const fn required_parameters(self) -> &'static [&'static str] {
        match self {
            Self::AuthorizationCode => &["code"],
            Self::RefreshToken => &["refresh_token"],
            Self::Password => &["username", "password"],
            Self::ClientCredentials => &[],
        }
    }
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "authorization_code" => Ok(Self::AuthorizationCode),
            "refresh_token" => Ok(Self::RefreshToken),
            "password" => Ok(Self::Password),
            "client_credentials" => Ok(Self::ClientCredentials),
            other => Err(format!("Grant \"{other}\" is not supported")),
        }
    }
}
