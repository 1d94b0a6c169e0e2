//! Provider configuration types
//!
//! A [`ProviderConfig`] is resolved once from [`ProviderOptions`] and never
//! changes afterwards. The consuming `with_*` builders return a new value
//! that only affects calls made with it.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{IdentityError, IdentityResult};

/// Production accounts host.
pub const PRODUCTION_AUTH_URI: &str = "https://accounts.freelancer.com";
/// Production API host.
pub const PRODUCTION_API_URI: &str = "https://api.freelancer.com/api";
/// Development accounts host, selected with `test = true`.
pub const DEVELOPMENT_AUTH_URI: &str = "http://accounts.syd1.fln-dev.net";
/// Development API host, selected with `test = true`.
pub const DEVELOPMENT_API_URI: &str = "http://api.syd1.fln-dev.net/api";

/// Separator for scope, prompt and advanced scope lists.
pub const SCOPE_SEPARATOR: &str = " ";
/// Profile field used as resource owner identifier.
pub const OWNER_ID_FIELD: &str = "email";
/// Response field signalling a provider error.
pub const ERROR_CODE_FIELD: &str = "error_code";
/// Response field carrying the provider error message.
pub const ERROR_MESSAGE_FIELD: &str = "message";

/// Which flavour of the adapter to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProviderVariant {
    /// Fixed Freelancer hosts, switchable to development with `test`.
    #[default]
    Freelancer,
    /// Caller supplied `base_uri`.
    Custom,
}

/// Options recognised when constructing the adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderOptions {
    /// Adapter flavour.
    pub variant: ProviderVariant,
    /// Use the development hosts (`Freelancer` variant only).
    pub test: bool,
    /// Accounts base URI (required for the `Custom` variant).
    pub base_uri: Option<String>,
    /// API base URI (`Custom` variant only).
    pub api_base_uri: Option<String>,
    /// Replaces the default scopes.
    pub scopes: Option<Vec<String>>,
    /// Replaces the default prompt steps.
    pub prompt: Option<Vec<String>>,
    /// Replaces the default (empty) advanced scopes.
    pub advanced_scopes: Option<Vec<String>>,
    /// Overrides whether the legacy `Freelancer-OAuth-V1` header is sent.
    pub legacy_header: Option<bool>,
    /// Overrides whether provider errors keep the raw response body.
    pub detailed_errors: Option<bool>,
}

impl ProviderOptions {
    /// Options for the `Custom` variant pointing at `base_uri`.
    #[must_use]
    pub fn custom(base_uri: impl Into<String>) -> Self {
        Self {
            variant: ProviderVariant::Custom,
            base_uri: Some(base_uri.into()),
            ..Self::default()
        }
    }

    /// Options for the `Freelancer` variant.
    #[must_use]
    pub fn freelancer(test: bool) -> Self {
        Self {
            test,
            ..Self::default()
        }
    }
}

/// Generic OAuth2 client options passed through to the token endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredentials {
    /// Registered client id.
    pub client_id: String,
    /// Registered client secret.
    #[serde(default)]
    pub client_secret: String,
    /// Redirect URI registered for the client.
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

impl ClientCredentials {
    /// Creates credentials.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: Option<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri,
        }
    }
}

/// Resolved, immutable provider configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    variant: ProviderVariant,
    base_auth_uri: String,
    base_api_uri: Option<String>,
    scopes: Vec<String>,
    prompt_steps: Vec<String>,
    advanced_scopes: Vec<String>,
    legacy_header: bool,
    detailed_errors: bool,
}

impl ProviderConfig {
    /// Resolves a configuration from construction options.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Configuration`] when the `Custom` variant has
    /// no base URI, or when the resolved base URI is empty or not a URL.
    pub fn from_options(options: &ProviderOptions) -> IdentityResult<Self> {
        let (base_auth_uri, base_api_uri) = match options.variant {
            ProviderVariant::Freelancer if options.test => (
                DEVELOPMENT_AUTH_URI.to_string(),
                Some(DEVELOPMENT_API_URI.to_string()),
            ),
            ProviderVariant::Freelancer => (
                PRODUCTION_AUTH_URI.to_string(),
                Some(PRODUCTION_API_URI.to_string()),
            ),
            ProviderVariant::Custom => {
                let base = options
                    .base_uri
                    .clone()
                    .ok_or_else(|| IdentityError::configuration("base URI required"))?;
                (base, options.api_base_uri.clone())
            }
        };

        let base_auth_uri = normalize_base_uri(&base_auth_uri)?;
        let base_api_uri = base_api_uri
            .filter(|uri| !uri.is_empty())
            .map(|uri| normalize_base_uri(&uri))
            .transpose()?;

        let freelancer = options.variant == ProviderVariant::Freelancer;

        Ok(Self {
            variant: options.variant,
            base_auth_uri,
            base_api_uri,
            scopes: options.scopes.clone().unwrap_or_else(default_scopes),
            prompt_steps: options.prompt.clone().unwrap_or_else(default_prompt_steps),
            advanced_scopes: options.advanced_scopes.clone().unwrap_or_default(),
            legacy_header: options.legacy_header.unwrap_or(freelancer),
            detailed_errors: options.detailed_errors.unwrap_or(!freelancer),
        })
    }

    /// Returns a copy with different default scopes.
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Returns a copy with different prompt steps.
    #[must_use]
    pub fn with_prompt_steps(mut self, prompt_steps: Vec<String>) -> Self {
        self.prompt_steps = prompt_steps;
        self
    }

    /// Returns a copy with different advanced scopes.
    #[must_use]
    pub fn with_advanced_scopes(mut self, advanced_scopes: Vec<String>) -> Self {
        self.advanced_scopes = advanced_scopes;
        self
    }

    /// Returns a copy that talks to a different accounts host, keeping the
    /// variant's behaviour.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Configuration`] when `uri` is empty or not a URL.
    pub fn with_base_auth_uri(mut self, uri: &str) -> IdentityResult<Self> {
        self.base_auth_uri = normalize_base_uri(uri)?;
        Ok(self)
    }

    /// Adapter flavour this configuration was resolved for.
    #[must_use]
    pub const fn variant(&self) -> ProviderVariant {
        self.variant
    }

    /// Accounts base URI, without trailing slash.
    #[must_use]
    pub fn base_auth_uri(&self) -> &str {
        &self.base_auth_uri
    }

    /// API base URI, if known.
    #[must_use]
    pub fn base_api_uri(&self) -> Option<&str> {
        self.base_api_uri.as_deref()
    }

    /// Scopes requested when the caller does not pass any.
    #[must_use]
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Consent steps forced through the `prompt` parameter.
    #[must_use]
    pub fn prompt_steps(&self) -> &[String] {
        &self.prompt_steps
    }

    /// Elevated scopes sent through the `advanced_scopes` parameter.
    #[must_use]
    pub fn advanced_scopes(&self) -> &[String] {
        &self.advanced_scopes
    }

    /// Whether the `Freelancer-OAuth-V1` header accompanies the bearer token.
    #[must_use]
    pub const fn legacy_header(&self) -> bool {
        self.legacy_header
    }

    /// Whether provider errors keep the raw response body.
    #[must_use]
    pub const fn detailed_errors(&self) -> bool {
        self.detailed_errors
    }

    /// Separator for every list serialized into a query parameter.
    #[must_use]
    pub const fn scope_separator(&self) -> &'static str {
        SCOPE_SEPARATOR
    }

    /// Profile field holding the owner identifier.
    #[must_use]
    pub const fn owner_id_field(&self) -> &'static str {
        OWNER_ID_FIELD
    }

    /// Response field signalling a provider error.
    #[must_use]
    pub const fn error_code_field(&self) -> &'static str {
        ERROR_CODE_FIELD
    }

    /// Response field carrying the provider error message.
    #[must_use]
    pub const fn error_message_field(&self) -> &'static str {
        ERROR_MESSAGE_FIELD
    }
}

fn default_scopes() -> Vec<String> {
    vec!["basic".to_string(), "advanced".to_string()]
}

fn default_prompt_steps() -> Vec<String> {
    vec!["select_account".to_string(), "consent".to_string()]
}

fn normalize_base_uri(uri: &str) -> IdentityResult<String> {
    let trimmed = uri.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(IdentityError::configuration("base URI required"));
    }
    Url::parse(trimmed)
        .map_err(|e| IdentityError::configuration(format!("invalid base URI {trimmed}: {e}")))?;
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_freelancer_production_hosts() {
        let config = ProviderConfig::from_options(&ProviderOptions::default()).unwrap();
        assert_eq!(config.base_auth_uri(), "https://accounts.freelancer.com");
        assert_eq!(config.base_api_uri(), Some("https://api.freelancer.com/api"));
        assert!(config.legacy_header());
        assert!(!config.detailed_errors());
    }

    #[test]
    fn test_freelancer_development_hosts() {
        let config = ProviderConfig::from_options(&ProviderOptions::freelancer(true)).unwrap();
        assert_eq!(config.base_auth_uri(), "http://accounts.syd1.fln-dev.net");
        assert_eq!(config.base_api_uri(), Some("http://api.syd1.fln-dev.net/api"));
    }

    #[test]
    fn test_custom_requires_base_uri() {
        let options = ProviderOptions {
            variant: ProviderVariant::Custom,
            ..ProviderOptions::default()
        };
        let err = ProviderConfig::from_options(&options).unwrap_err();
        assert_eq!(err, IdentityError::configuration("base URI required"));
    }

    #[test]
    fn test_custom_rejects_empty_and_invalid_base_uri() {
        let err = ProviderConfig::from_options(&ProviderOptions::custom("")).unwrap_err();
        assert!(matches!(err, IdentityError::Configuration(_)));

        let err = ProviderConfig::from_options(&ProviderOptions::custom("not a url")).unwrap_err();
        assert!(matches!(err, IdentityError::Configuration(_)));
    }

    #[test]
    fn test_custom_defaults() {
        let config =
            ProviderConfig::from_options(&ProviderOptions::custom("https://idp.example/")).unwrap();
        assert_eq!(config.base_auth_uri(), "https://idp.example");
        assert_eq!(config.base_api_uri(), None);
        assert_eq!(config.scopes(), ["basic", "advanced"]);
        assert_eq!(config.prompt_steps(), ["select_account", "consent"]);
        assert!(config.advanced_scopes().is_empty());
        assert!(!config.legacy_header());
        assert!(config.detailed_errors());
    }

    #[test]
    fn test_option_overrides() {
        let options = ProviderOptions {
            scopes: Some(vec!["basic".to_string()]),
            prompt: Some(vec![]),
            advanced_scopes: Some(vec!["fln:project_manage".to_string()]),
            legacy_header: Some(false),
            detailed_errors: Some(true),
            ..ProviderOptions::default()
        };
        let config = ProviderConfig::from_options(&options).unwrap();
        assert_eq!(config.scopes(), ["basic"]);
        assert!(config.prompt_steps().is_empty());
        assert_eq!(config.advanced_scopes(), ["fln:project_manage"]);
        assert!(!config.legacy_header());
        assert!(config.detailed_errors());
    }

    #[test]
    fn test_builders_return_new_values() {
        let original = ProviderConfig::from_options(&ProviderOptions::default()).unwrap();
        let changed = original
            .clone()
            .with_prompt_steps(vec!["consent".to_string()])
            .with_advanced_scopes(vec!["fln:user_information".to_string()]);
        assert_eq!(original.prompt_steps(), ["select_account", "consent"]);
        assert_eq!(changed.prompt_steps(), ["consent"]);
        assert_eq!(changed.advanced_scopes(), ["fln:user_information"]);
    }

    #[test]
    fn test_with_base_auth_uri_keeps_variant() {
        let config = ProviderConfig::from_options(&ProviderOptions::default())
            .unwrap()
            .with_base_auth_uri("http://127.0.0.1:8080/")
            .unwrap();
        assert_eq!(config.base_auth_uri(), "http://127.0.0.1:8080");
        assert_eq!(config.variant(), ProviderVariant::Freelancer);
        assert!(config.legacy_header());

        let err = ProviderConfig::from_options(&ProviderOptions::default())
            .unwrap()
            .with_base_auth_uri("")
            .unwrap_err();
        assert!(matches!(err, IdentityError::Configuration(_)));
    }

    #[test]
    fn test_options_deserialize_snake_case_variant() {
        let options: ProviderOptions =
            serde_json::from_str(r#"{"variant": "custom", "base_uri": "http://x"}"#).unwrap();
        assert_eq!(options, ProviderOptions::custom("http://x"));
    }
}
