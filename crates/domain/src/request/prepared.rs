//! Prepared request and authorization parameter types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::HttpMethod;

/// Header name to value mapping.
pub type Headers = BTreeMap<String, String>;

/// Query parameters of an authorization URL, ordered by name.
pub type AuthorizationParams = BTreeMap<String, String>;

/// Extra parameters sent to the token endpoint alongside the grant.
pub type TokenOptions = BTreeMap<String, String>;

/// Caller supplied additions to an authenticated request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Headers applied after the provider's authorization headers.
    #[serde(default)]
    pub headers: Headers,
    /// Raw request body.
    #[serde(default)]
    pub body: Option<String>,
}

impl RequestOptions {
    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A request ready to be handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL.
    pub url: String,
    /// Headers to send.
    pub headers: Headers,
    /// Optional body.
    pub body: Option<String>,
}

impl PreparedRequest {
    /// Builds a request from provider headers and caller options.
    #[must_use]
    pub fn new(
        method: HttpMethod,
        url: impl Into<String>,
        headers: Headers,
        options: RequestOptions,
    ) -> Self {
        let mut merged = headers;
        merged.retain(|name, _| {
            !options
                .headers
                .keys()
                .any(|caller| caller.eq_ignore_ascii_case(name))
        });
        merged.extend(options.headers);
        Self {
            method,
            url: url.into(),
            headers: merged,
            body: options.body,
        }
    }

    /// Looks up a header, ignoring ASCII case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
