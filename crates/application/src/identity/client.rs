//! Caller facing identity client.

use fln_identity_domain::{
    AccessToken, HttpMethod, IdentityError, IdentityResult, PreparedRequest, RequestOptions,
    ResourceOwner, TokenOptions,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::OAuth2ClientError;
use crate::ports::{
    AuthorizationOptions, AuthorizationRequest, GenericOAuth2Client, ProviderStrategy,
};

/// Runs the authorization-code flow through a [`GenericOAuth2Client`] and
/// keeps the current access token.
///
/// The token is only replaced through `&mut self`; share the client across
/// tasks behind a lock if it has to be updated concurrently.
#[derive(Debug)]
pub struct IdentityClient<C> {
    client: C,
    access_token: Option<AccessToken>,
}

impl<C: GenericOAuth2Client> IdentityClient<C> {
    /// Creates a client with no access token.
    pub const fn new(client: C) -> Self {
        Self {
            client,
            access_token: None,
        }
    }

    /// The provider strategy in use.
    pub fn provider(&self) -> &C::Strategy {
        self.client.strategy()
    }

    /// The underlying generic client.
    pub const fn inner(&self) -> &C {
        &self.client
    }

    /// Builds the URL the user is redirected to.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Configuration`] when the authorization URL
    /// cannot be built.
    pub fn authorization_url(
        &self,
        options: AuthorizationOptions,
    ) -> IdentityResult<AuthorizationRequest> {
        self.client
            .authorization_url(options)
            .map_err(|e| IdentityError::configuration(e.to_string()))
    }

    /// Exchanges a grant for an access token and keeps it as current token.
    ///
    /// # Errors
    ///
    /// Returns the error chosen by the provider's
    /// [`ProviderStrategy::exchange_error`].
    pub async fn exchange_token(
        &mut self,
        grant: &str,
        options: TokenOptions,
    ) -> IdentityResult<AccessToken> {
        debug!(grant, "exchanging grant for access token");
        match self.client.exchange_token(grant, options).await {
            Ok(token) => {
                debug!(token = %token.preview(), "access token obtained");
                self.access_token = Some(token.clone());
                Ok(token)
            }
            Err(error) => Err(self.client.strategy().exchange_error(error)),
        }
    }

    /// Exchanges an authorization code.
    ///
    /// # Errors
    ///
    /// See [`IdentityClient::exchange_token`].
    pub async fn exchange_authorization_code(&mut self, code: &str) -> IdentityResult<AccessToken> {
        let options = TokenOptions::from([("code".to_string(), code.to_string())]);
        self.exchange_token("authorization_code", options).await
    }

    /// Restores a token from a previously serialized mapping.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidAccessToken`]; the current token is
    /// left untouched in that case.
    pub fn set_access_token(&mut self, mapping: Map<String, Value>) -> IdentityResult<()> {
        self.access_token = Some(AccessToken::from_mapping(mapping)?);
        Ok(())
    }

    /// Replaces the current token.
    pub fn replace_access_token(&mut self, token: Option<AccessToken>) -> Option<AccessToken> {
        std::mem::replace(&mut self.access_token, token)
    }

    /// The current token, if any.
    pub const fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    /// Builds a request authenticated with the current token.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NotAuthenticated`] when no token is set.
    pub fn authenticated_request(
        &self,
        method: HttpMethod,
        url: &str,
        options: RequestOptions,
    ) -> IdentityResult<PreparedRequest> {
        let token = self
            .access_token
            .as_ref()
            .ok_or(IdentityError::NotAuthenticated)?;
        Ok(self.client.create_request(method, url, Some(token), options))
    }

    /// Fetches the profile of the token's owner.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NotAuthenticated`] without a token, the
    /// provider error when the response carries one, or
    /// [`IdentityError::MissingOwnerId`] when the profile lacks the id field.
    pub async fn fetch_resource_owner(&self) -> IdentityResult<ResourceOwner> {
        let token = self
            .access_token
            .as_ref()
            .ok_or(IdentityError::NotAuthenticated)?;
        let strategy = self.client.strategy();
        let url = strategy.resource_owner_details_url(token);
        let request = self.authenticated_request(HttpMethod::Get, &url, RequestOptions::default())?;

        let body = self
            .client
            .fetch_response(&request)
            .await
            .map_err(OAuth2ClientError::into_identity_error)?;
        strategy.create_resource_owner(&body, token)
    }
}
