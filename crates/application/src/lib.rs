//! Freelancer Identity Application - provider adapter and client facade
//!
//! This crate defines the ports a generic OAuth2 client must implement,
//! the Freelancer Identity strategy plugged into it, and the
//! [`IdentityClient`] facade that callers use.

pub mod error;
pub mod identity;
pub mod ports;

pub use error::{OAuth2ClientError, OAuth2ClientResult};
pub use identity::{FreelancerIdentity, IdentityClient, LEGACY_TOKEN_HEADER};
pub use ports::{AuthorizationOptions, AuthorizationRequest, GenericOAuth2Client, ProviderStrategy};
