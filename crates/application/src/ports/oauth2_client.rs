//! Generic OAuth2 client port

use std::future::Future;

use fln_identity_domain::{
    AccessToken, AuthorizationParams, HttpMethod, PreparedRequest, RequestOptions, TokenOptions,
};
use serde_json::Value;
use url::Url;

use super::ProviderStrategy;
use crate::error::OAuth2ClientResult;

/// Caller choices for one authorization URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationOptions {
    /// Explicit `state`; a random one is generated when absent.
    pub state: Option<String>,
    /// Scopes to request instead of the provider defaults.
    pub scopes: Option<Vec<String>>,
    /// Additional query parameters. These win over provider parameters.
    pub params: AuthorizationParams,
}

impl AuthorizationOptions {
    /// Sets the state.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Sets the scopes.
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = Some(scopes);
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// An authorization URL and the state it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    /// URL to redirect the user to.
    pub url: Url,
    /// `state` value embedded in the URL.
    pub state: String,
}

impl AuthorizationRequest {
    /// Whether the `state` echoed back on the callback is ours.
    #[must_use]
    pub fn matches_state(&self, returned: &str) -> bool {
        !returned.is_empty() && returned == self.state
    }

    /// Raw value of a query parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

/// Port for the generic authorization-code machinery.
///
/// Implementations hold a [`ProviderStrategy`] and consult it at each
/// extension point instead of being specialised by inheritance.
pub trait GenericOAuth2Client: Send + Sync {
    /// Provider strategy injected into this client.
    type Strategy: ProviderStrategy;

    /// The injected strategy.
    fn strategy(&self) -> &Self::Strategy;

    /// Builds the authorization URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the provider's base URL cannot be parsed.
    fn authorization_url(
        &self,
        options: AuthorizationOptions,
    ) -> OAuth2ClientResult<AuthorizationRequest>;

    /// Exchanges a grant at the token endpoint.
    ///
    /// # Errors
    ///
    /// Returns the failure kind: unknown grant, missing parameter, invalid
    /// token data, rejection by the strategy, or transport failure.
    fn exchange_token(
        &self,
        grant: &str,
        options: TokenOptions,
    ) -> impl Future<Output = OAuth2ClientResult<AccessToken>> + Send;

    /// Sends a prepared request and returns the validated, parsed body.
    ///
    /// # Errors
    ///
    /// Returns a transport, parse, or rejection failure.
    fn fetch_response(
        &self,
        request: &PreparedRequest,
    ) -> impl Future<Output = OAuth2ClientResult<Value>> + Send;

    /// Builds a request carrying the strategy's authorization headers.
    fn create_request(
        &self,
        method: HttpMethod,
        url: &str,
        token: Option<&AccessToken>,
        options: RequestOptions,
    ) -> PreparedRequest {
        let headers = self.strategy().authorization_headers(token);
        PreparedRequest::new(method, url, headers, options)
    }
}
