//! Provider strategy port

use fln_identity_domain::{
    AccessToken, AuthorizationParams, Headers, IdentityError, IdentityResult, ResourceOwner,
    TokenOptions,
};
use serde_json::Value;

use crate::error::OAuth2ClientError;

/// Provider-specific fill-ins consulted by a generic OAuth2 client.
///
/// A [`GenericOAuth2Client`](super::GenericOAuth2Client) owns one strategy
/// and calls back into it while building the authorization URL, exchanging
/// a grant, and fetching the resource owner.
pub trait ProviderStrategy: Send + Sync {
    /// Authorization endpoint, without query string.
    fn base_authorization_url(&self) -> String;

    /// Token endpoint for the given token request parameters.
    fn base_access_token_url(&self, params: &TokenOptions) -> String;

    /// Profile endpoint for the given token.
    fn resource_owner_details_url(&self, token: &AccessToken) -> String;

    /// Scopes requested when the caller passes none.
    fn default_scopes(&self) -> &[String];

    /// Separator used when joining scopes into the `scope` parameter.
    fn scope_separator(&self) -> &str {
        ","
    }

    /// Adds provider parameters to the generic authorization parameters.
    fn build_authorization_parameters(&self, params: AuthorizationParams) -> AuthorizationParams {
        params
    }

    /// Headers authenticating a request made with `token`.
    fn authorization_headers(&self, _token: Option<&AccessToken>) -> Headers {
        Headers::new()
    }

    /// Inspects a parsed response body.
    ///
    /// # Errors
    ///
    /// Returns the provider error described by the body.
    fn validate_response(&self, status: u16, body: &Value) -> IdentityResult<()>;

    /// Wraps a profile response.
    ///
    /// # Errors
    ///
    /// Returns an error when the body does not describe an owner.
    fn create_resource_owner(&self, body: &Value, token: &AccessToken)
    -> IdentityResult<ResourceOwner>;

    /// Translates a failed token exchange for the caller.
    fn exchange_error(&self, error: OAuth2ClientError) -> IdentityError {
        match error {
            OAuth2ClientError::Rejected(error) => error,
            other => IdentityError::token_exchange(other.to_string()),
        }
    }
}
