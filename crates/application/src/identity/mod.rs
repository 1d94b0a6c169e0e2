//! Freelancer Identity adapter and the client facade built on it.

mod client;
mod provider;

pub use client::IdentityClient;
pub use provider::{FreelancerIdentity, LEGACY_TOKEN_HEADER};
