//! Authentication domain types

mod grant;
mod owner;
mod token;

pub use grant::Grant;
pub use owner::ResourceOwner;
pub use token::AccessToken;
