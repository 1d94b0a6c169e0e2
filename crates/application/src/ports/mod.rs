//! Port definitions (interfaces)
//!
//! Ports define the boundary between the provider adapter and the generic
//! OAuth2 machinery. Adapters in the infrastructure layer implement them.

mod oauth2_client;
mod provider_strategy;

pub use oauth2_client::{AuthorizationOptions, AuthorizationRequest, GenericOAuth2Client};
pub use provider_strategy::ProviderStrategy;
