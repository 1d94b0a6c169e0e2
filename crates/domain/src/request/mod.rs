//! Request types

mod method;
mod prepared;

pub use method::HttpMethod;
pub use prepared::{AuthorizationParams, Headers, PreparedRequest, RequestOptions, TokenOptions};
