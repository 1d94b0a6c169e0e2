//! Adapters implementing application ports

mod reqwest_oauth2_client;

pub use reqwest_oauth2_client::ReqwestOAuth2Client;
