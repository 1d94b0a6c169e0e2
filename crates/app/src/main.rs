//! Freelancer Identity command line client.
//!
//! Walks through the authorization-code flow: print the authorization URL,
//! exchange the returned code, then fetch the owner's profile with the
//! stored token.

mod cli;
mod settings;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use fln_identity_application::AuthorizationOptions;
use fln_identity_infrastructure::{FreelancerIdentityClient, connect};
use serde_json::{Map, Value};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Command, Opt};
use settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();
    let settings = Settings::load(opt.config.as_deref())?;

    // Initialize tracing; RUST_LOG wins over the configured filter
    let default_filter = settings.log_filter.clone().unwrap_or_else(|| "info".to_string());
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (credentials, options) = settings.into_parts()?;
    let mut client = connect(&options, credentials)?;

    match opt.command {
        Command::AuthorizeUrl { state } => {
            let mut request_options = AuthorizationOptions::default();
            if let Some(state) = state {
                request_options = request_options.with_state(state);
            }
            let request = client.authorization_url(request_options)?;
            info!(state = %request.state, "authorization URL built");
            println!("{}", request.url);
        }
        Command::Exchange { code, token_out } => {
            let token = client.exchange_authorization_code(&code).await?;
            let json = serde_json::to_string_pretty(&token)?;
            match token_out {
                Some(path) => {
                    tokio::fs::write(&path, json)
                        .await
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!(path = %path.display(), token = %token.preview(), "access token saved");
                }
                None => println!("{json}"),
            }
        }
        Command::Me { token_file } => {
            load_token(&mut client, &token_file).await?;
            let owner = client.fetch_resource_owner().await?;
            info!(id = owner.id(), "resource owner fetched");
            println!("{}", serde_json::to_string_pretty(owner.to_map())?);
        }
    }

    Ok(())
}

async fn load_token(client: &mut FreelancerIdentityClient, path: &Path) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mapping: Map<String, Value> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a token file", path.display()))?;
    client.set_access_token(mapping)?;
    Ok(())
}
