//! Access token value object

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{IdentityError, IdentityResult};

/// `expires` values above this are absolute timestamps, below it offsets.
const EXPIRATION_TIMESTAMP_THRESHOLD: i64 = 1_359_676_800;

const RESERVED_KEYS: [&str; 5] = [
    "access_token",
    "resource_owner_id",
    "refresh_token",
    "expires_in",
    "expires",
];

/// Bearer token obtained from the token endpoint.
///
/// Serializes to, and rehydrates from, the flat mapping returned by
/// [`AccessToken::to_mapping`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct AccessToken {
    access_token: String,
    refresh_token: Option<String>,
    expires: Option<DateTime<Utc>>,
    resource_owner_id: Option<String>,
    values: Map<String, Value>,
}

impl AccessToken {
    /// Creates a token that never reports expiry.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires: None,
            resource_owner_id: None,
            values: Map::new(),
        }
    }

    /// Rehydrates a token from a token-endpoint response or a serialized token.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidAccessToken`] when `access_token` is
    /// missing or an expiry field is not an integer.
    pub fn from_mapping(mapping: Map<String, Value>) -> IdentityResult<Self> {
        Self::from_mapping_at(mapping, Utc::now())
    }

    /// Same as [`AccessToken::from_mapping`] with an explicit current time.
    ///
    /// # Errors
    ///
    /// See [`AccessToken::from_mapping`].
    pub fn from_mapping_at(
        mut mapping: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> IdentityResult<Self> {
        let access_token = match mapping.get("access_token") {
            Some(Value::String(token)) if !token.is_empty() => token.clone(),
            _ => {
                return Err(IdentityError::InvalidAccessToken(
                    "Required option not passed: \"access_token\"".to_string(),
                ));
            }
        };

        let expires = if let Some(expires_in) = mapping.get("expires_in") {
            let seconds = integer_value(expires_in).ok_or_else(|| {
                IdentityError::InvalidAccessToken("expires_in value must be an integer".to_string())
            })?;
            Some(offset_from(now, seconds).ok_or_else(|| {
                IdentityError::InvalidAccessToken("expires_in value out of range".to_string())
            })?)
        } else if let Some(expires) = mapping.get("expires").filter(|v| !is_unset(v)) {
            let value = integer_value(expires).ok_or_else(|| {
                IdentityError::InvalidAccessToken("expires value must be an integer".to_string())
            })?;
            let instant = if value > EXPIRATION_TIMESTAMP_THRESHOLD {
                Utc.timestamp_opt(value, 0).single()
            } else {
                offset_from(now, value)
            };
            Some(instant.ok_or_else(|| {
                IdentityError::InvalidAccessToken("expires value out of range".to_string())
            })?)
        } else {
            None
        };

        let refresh_token = mapping
            .get("refresh_token")
            .and_then(Value::as_str)
            .map(String::from);
        let resource_owner_id = mapping.get("resource_owner_id").and_then(scalar_string);

        for key in RESERVED_KEYS {
            mapping.remove(key);
        }

        Ok(Self {
            access_token,
            refresh_token,
            expires,
            resource_owner_id,
            values: mapping,
        })
    }

    /// Serializes the token into a flat mapping.
    #[must_use]
    pub fn to_mapping(&self) -> Map<String, Value> {
        let mut mapping = self.values.clone();
        mapping.insert(
            "access_token".to_string(),
            Value::String(self.access_token.clone()),
        );
        if let Some(refresh_token) = &self.refresh_token {
            mapping.insert(
                "refresh_token".to_string(),
                Value::String(refresh_token.clone()),
            );
        }
        if let Some(expires) = self.expires {
            mapping.insert("expires".to_string(), Value::from(expires.timestamp()));
        }
        if let Some(owner) = &self.resource_owner_id {
            mapping.insert("resource_owner_id".to_string(), Value::String(owner.clone()));
        }
        mapping
    }

    /// The raw bearer value.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.access_token
    }

    /// Refresh token, if the provider issued one.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Expiry instant, if known.
    #[must_use]
    pub const fn expires(&self) -> Option<DateTime<Utc>> {
        self.expires
    }

    /// Owner id reported by the token endpoint, if any.
    #[must_use]
    pub fn resource_owner_id(&self) -> Option<&str> {
        self.resource_owner_id.as_deref()
    }

    /// Any additional fields returned with the token.
    #[must_use]
    pub const fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Whether the token has expired. Unknown expiry counts as not expired.
    #[must_use]
    pub fn has_expired(&self) -> bool {
        self.expires.is_some_and(|expires| Utc::now() >= expires)
    }

    /// First characters of the token, safe for logs.
    #[must_use]
    pub fn preview(&self) -> String {
        if self.access_token.chars().count() > 12 {
            let head: String = self.access_token.chars().take(8).collect();
            format!("{head}...")
        } else {
            "***".to_string()
        }
    }
}

impl TryFrom<Map<String, Value>> for AccessToken {
    type Error = IdentityError;

    fn try_from(mapping: Map<String, Value>) -> Result<Self, Self::Error> {
        Self::from_mapping(mapping)
    }
}

impl From<AccessToken> for Map<String, Value> {
    fn from(token: AccessToken) -> Self {
        token.to_mapping()
    }
}

/// `now` shifted by `seconds`, or `None` when the result is not representable.
fn offset_from(now: DateTime<Utc>, seconds: i64) -> Option<DateTime<Utc>> {
    chrono::Duration::try_seconds(seconds).and_then(|delta| now.checked_add_signed(delta))
}

/// An absent `expires`: null, zero or empty.
fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Number(number) => number.as_i64() == Some(0),
        Value::String(text) => matches!(text.trim(), "" | "0"),
        _ => false,
    }
}

fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
