//! Resource owner value object

use serde_json::{Map, Value};

use crate::error::{IdentityError, IdentityResult};

/// Profile of the authenticated user as returned by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceOwner {
    id: String,
    fields: Map<String, Value>,
}

impl ResourceOwner {
    /// Wraps a profile response, taking the identifier from `id_field`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::MissingOwnerId`] when the body is not an
    /// object or the field is absent, empty, or not a string or number.
    pub fn from_response(body: &Value, id_field: &str) -> IdentityResult<Self> {
        let missing = || IdentityError::MissingOwnerId {
            field: id_field.to_string(),
        };

        let fields = body.as_object().ok_or_else(missing)?;
        let id = match fields.get(id_field) {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => return Err(missing()),
        };

        Ok(Self {
            id,
            fields: fields.clone(),
        })
    }

    /// The owner identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Looks up a raw profile field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// All raw profile fields.
    #[must_use]
    pub const fn to_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}
