//! Freelancer Identity Infrastructure - HTTP adapters
//!
//! This crate provides the reqwest implementation of the
//! `GenericOAuth2Client` port defined in the application layer.

pub mod adapters;

pub use adapters::ReqwestOAuth2Client;

use fln_identity_application::{FreelancerIdentity, IdentityClient, OAuth2ClientError};
use fln_identity_domain::{ClientCredentials, IdentityResult, ProviderOptions};

/// Client type returned by [`connect`].
pub type FreelancerIdentityClient = IdentityClient<ReqwestOAuth2Client<FreelancerIdentity>>;

/// Builds an identity client talking to the configured provider over HTTP.
///
/// # Errors
///
/// Returns a configuration error for invalid options, or a transport error
/// when the HTTP client cannot be created.
pub fn connect(
    options: &ProviderOptions,
    credentials: ClientCredentials,
) -> IdentityResult<FreelancerIdentityClient> {
    let provider = FreelancerIdentity::new(options)?;
    let client = ReqwestOAuth2Client::new(provider, credentials)
        .map_err(OAuth2ClientError::into_identity_error)?;
    Ok(IdentityClient::new(client))
}
