//! Command line settings.
//!
//! Settings are read from an optional TOML file (`fln-identity.toml` in the
//! working directory, or the file given with `--config`) and then from
//! environment variables prefixed `FLN_IDENTITY_`, which take precedence.
//! List values in the environment are comma separated.

use std::path::Path;

use config::{Config, Environment, File};
use fln_identity_domain::{ClientCredentials, ProviderOptions, ProviderVariant};
use serde::Deserialize;

/// File looked up when no `--config` path is given.
const DEFAULT_FILE: &str = "fln-identity";

const ENV_PREFIX: &str = "FLN_IDENTITY";

const LIST_KEYS: [&str; 3] = ["scopes", "prompt", "advanced_scopes"];

/// Error type for settings loading.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The file or environment could not be read or deserialized.
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    /// No client id was configured.
    #[error("client_id is not set (use the config file or FLN_IDENTITY_CLIENT_ID)")]
    MissingClientId,
}

/// Flat settings for the command line client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub variant: ProviderVariant,
    pub test: bool,
    pub base_uri: Option<String>,
    pub api_base_uri: Option<String>,
    pub scopes: Option<Vec<String>>,
    pub prompt: Option<Vec<String>>,
    pub advanced_scopes: Option<Vec<String>>,
    pub legacy_header: Option<bool>,
    pub detailed_errors: Option<bool>,
    /// `tracing` filter directive, used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl Settings {
    /// Loads settings from the file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_with(path, None)
    }

    /// Loads settings, reading environment variables from `env` instead of
    /// the process environment when given.
    fn load_with(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, SettingsError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_FILE).required(false),
        };

        let mut environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .try_parsing(true)
            .list_separator(",")
            .source(env);
        for key in LIST_KEYS {
            environment = environment.with_list_parse_key(key);
        }

        let settings = Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Splits the settings into client credentials and provider options.
    pub fn into_parts(self) -> Result<(ClientCredentials, ProviderOptions), SettingsError> {
        let client_id = self
            .client_id
            .filter(|id| !id.is_empty())
            .ok_or(SettingsError::MissingClientId)?;
        let credentials = ClientCredentials::new(
            client_id,
            self.client_secret.unwrap_or_default(),
            self.redirect_uri,
        );
        let options = ProviderOptions {
            variant: self.variant,
            test: self.test,
            base_uri: self.base_uri,
            api_base_uri: self.api_base_uri,
            scopes: self.scopes,
            prompt: self.prompt,
            advanced_scopes: self.advanced_scopes,
            legacy_header: self.legacy_header,
            detailed_errors: self.detailed_errors,
        };
        Ok((credentials, options))
    }
}
