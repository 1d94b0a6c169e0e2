//! Freelancer Identity Domain - Core types
//!
//! This crate defines the domain model for the Freelancer Identity OAuth2
//! client. All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod config;
pub mod error;
pub mod request;

pub use auth::{AccessToken, Grant, ResourceOwner};
pub use config::{ClientCredentials, ProviderConfig, ProviderOptions, ProviderVariant};
pub use error::{IdentityError, IdentityResult};
pub use request::{
    AuthorizationParams, Headers, HttpMethod, PreparedRequest, RequestOptions, TokenOptions,
};
