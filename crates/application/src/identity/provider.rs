//! Freelancer Identity provider strategy.
//!
//! By default the user selects an account and then consents to the
//! requested scopes. Listing a step in `prompt` forces it; `select_account`
//! may be dropped, and `consent` is skipped by the provider for
//! white-listed clients or when every scope was granted before.
//!
//! `advanced_scopes` is needed to call the Freelancer API on the user's
//! behalf and must match the scopes selected when the app was registered.

use fln_identity_domain::{
    AccessToken, AuthorizationParams, Headers, IdentityError, IdentityResult, ProviderConfig,
    ProviderOptions, ProviderVariant, ResourceOwner, TokenOptions,
};
use serde_json::Value;
use tracing::warn;

use crate::error::OAuth2ClientError;
use crate::ports::ProviderStrategy;

/// Header carrying the raw token for endpoints that predate bearer auth.
pub const LEGACY_TOKEN_HEADER: &str = "Freelancer-OAuth-V1";

const AUTHORIZE_PATH: &str = "/oauth/authorise";
const TOKEN_PATH: &str = "/oauth/token";
const ME_PATH: &str = "/oauth/me";

/// Provider adapter for Freelancer Identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreelancerIdentity {
    config: ProviderConfig,
}

impl FreelancerIdentity {
    /// Builds the adapter from construction options.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Configuration`] when the base URI cannot be
    /// resolved.
    pub fn new(options: &ProviderOptions) -> IdentityResult<Self> {
        Ok(Self {
            config: ProviderConfig::from_options(options)?,
        })
    }

    /// Wraps an already resolved configuration.
    #[must_use]
    pub const fn from_config(config: ProviderConfig) -> Self {
        Self { config }
    }

    /// The resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_auth_uri())
    }

    fn join(&self, values: &[String]) -> String {
        values.join(self.config.scope_separator())
    }

    fn narrow_exchange_error(error: OAuth2ClientError) -> IdentityError {
        match error {
            OAuth2ClientError::InvalidGrant(_) => {
                IdentityError::token_exchange("Invalid grant type.")
            }
            OAuth2ClientError::MissingParameter(message)
            | OAuth2ClientError::InvalidArgument(message) => {
                IdentityError::token_exchange(message)
            }
            other => {
                warn!(error = %other, "token exchange failed");
                IdentityError::token_exchange("Unknown error occurred.")
            }
        }
    }
}

impl ProviderStrategy for FreelancerIdentity {
    fn base_authorization_url(&self) -> String {
        self.endpoint(AUTHORIZE_PATH)
    }

    fn base_access_token_url(&self, _params: &TokenOptions) -> String {
        self.endpoint(TOKEN_PATH)
    }

    fn resource_owner_details_url(&self, _token: &AccessToken) -> String {
        self.endpoint(ME_PATH)
    }

    fn default_scopes(&self) -> &[String] {
        self.config.scopes()
    }

    fn scope_separator(&self) -> &str {
        self.config.scope_separator()
    }

    fn build_authorization_parameters(
        &self,
        mut params: AuthorizationParams,
    ) -> AuthorizationParams {
        params
            .entry("prompt".to_string())
            .or_insert_with(|| self.join(self.config.prompt_steps()));
        params
            .entry("advanced_scopes".to_string())
            .or_insert_with(|| self.join(self.config.advanced_scopes()));
        params
    }

    fn authorization_headers(&self, token: Option<&AccessToken>) -> Headers {
        let mut headers = Headers::new();
        if let Some(token) = token {
            headers.insert(
                "Authorization".to_string(),
                format!("Bearer {}", token.token()),
            );
            if self.config.legacy_header() {
                headers.insert(LEGACY_TOKEN_HEADER.to_string(), token.token().to_string());
            }
        }
        headers
    }

    fn validate_response(&self, status: u16, body: &Value) -> IdentityResult<()> {
        let Some(code) = body
            .get(self.config.error_code_field())
            .filter(|code| !is_empty(code))
        else {
            return Ok(());
        };

        let message = match body.get(self.config.error_message_field()) {
            Some(Value::String(message)) => message.clone(),
            _ => text_of(code),
        };
        warn!(status, error_code = %text_of(code), %message, "provider rejected request");

        if self.config.detailed_errors() {
            Err(IdentityError::IdentityProvider {
                message,
                code: 0,
                body: body.clone(),
            })
        } else {
            Err(IdentityError::Provider { message })
        }
    }

    fn create_resource_owner(
        &self,
        body: &Value,
        _token: &AccessToken,
    ) -> IdentityResult<ResourceOwner> {
        ResourceOwner::from_response(body, self.config.owner_id_field())
    }

    fn exchange_error(&self, error: OAuth2ClientError) -> IdentityError {
        match self.config.variant() {
            ProviderVariant::Freelancer => Self::narrow_exchange_error(error),
            ProviderVariant::Custom => match error {
                OAuth2ClientError::Rejected(error) => error,
                other => IdentityError::token_exchange(other.to_string()),
            },
        }
    }
}

/// Values that do not signal an error when found in the error code field.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty() || text == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn freelancer() -> FreelancerIdentity {
        FreelancerIdentity::new(&ProviderOptions::default()).unwrap()
    }

    fn custom() -> FreelancerIdentity {
        FreelancerIdentity::new(&ProviderOptions::custom("https://idp.example")).unwrap()
    }

    fn with_lists(prompt: &[&str], advanced: &[&str]) -> FreelancerIdentity {
        let options = ProviderOptions {
            prompt: Some(prompt.iter().map(ToString::to_string).collect()),
            advanced_scopes: Some(advanced.iter().map(ToString::to_string).collect()),
            ..ProviderOptions::default()
        };
        FreelancerIdentity::new(&options).unwrap()
    }

    #[test]
    fn test_endpoints() {
        let provider = FreelancerIdentity::new(&ProviderOptions::custom("http://x")).unwrap();
        assert_eq!(provider.base_authorization_url(), "http://x/oauth/authorise");
        assert_eq!(
            provider.base_access_token_url(&TokenOptions::new()),
            "http://x/oauth/token"
        );
        assert_eq!(
            provider.resource_owner_details_url(&AccessToken::new("t")),
            "http://x/oauth/me"
        );
    }

    #[test]
    fn test_custom_defaults_scenario() {
        let provider = custom();
        assert_eq!(provider.default_scopes(), ["basic", "advanced"]);
        assert_eq!(
            provider.base_access_token_url(&TokenOptions::new()),
            "https://idp.example/oauth/token"
        );
        assert_eq!(provider.scope_separator(), " ");
    }

    #[test]
    fn test_test_flag_selects_development_host() {
        let provider = FreelancerIdentity::new(&ProviderOptions::freelancer(true)).unwrap();
        assert_eq!(
            provider.config().base_auth_uri(),
            "http://accounts.syd1.fln-dev.net"
        );
        assert_eq!(
            freelancer().config().base_auth_uri(),
            "https://accounts.freelancer.com"
        );
    }

    #[test]
    fn test_custom_without_base_uri_fails() {
        let options = ProviderOptions {
            variant: ProviderVariant::Custom,
            ..ProviderOptions::default()
        };
        assert!(matches!(
            FreelancerIdentity::new(&options),
            Err(IdentityError::Configuration(_))
        ));
    }

    #[test]
    fn test_default_authorization_parameters() {
        let params = freelancer().build_authorization_parameters(AuthorizationParams::new());
        assert_eq!(params.get("prompt").map(String::as_str), Some("select_account consent"));
        assert_eq!(params.get("advanced_scopes").map(String::as_str), Some(""));
    }

    #[test]
    fn test_lists_join_with_single_space() {
        let cases: [(&[&str], &str); 4] = [
            (&[], ""),
            (&["consent"], "consent"),
            (&["select_account", "consent"], "select_account consent"),
            (&["a", "b", "c"], "a b c"),
        ];
        for (values, expected) in cases {
            let params = with_lists(values, values)
                .build_authorization_parameters(AuthorizationParams::new());
            assert_eq!(params["prompt"], expected);
            assert_eq!(params["advanced_scopes"], expected);
        }
    }

    #[test]
    fn test_generic_parameters_win() {
        let generic = AuthorizationParams::from([
            ("prompt".to_string(), "none".to_string()),
            ("state".to_string(), "s".to_string()),
        ]);
        let params = freelancer().build_authorization_parameters(generic);
        assert_eq!(params["prompt"], "none");
        assert_eq!(params["state"], "s");
        assert_eq!(params["advanced_scopes"], "");
    }

    #[test]
    fn test_no_token_no_headers() {
        assert!(freelancer().authorization_headers(None).is_empty());
        assert!(custom().authorization_headers(None).is_empty());
    }

    #[test]
    fn test_freelancer_sends_legacy_header() {
        let headers = freelancer().authorization_headers(Some(&AccessToken::new("tok")));
        assert_eq!(
            headers,
            Headers::from([
                ("Authorization".to_string(), "Bearer tok".to_string()),
                ("Freelancer-OAuth-V1".to_string(), "tok".to_string()),
            ])
        );
    }

    #[test]
    fn test_custom_sends_bearer_only() {
        let headers = custom().authorization_headers(Some(&AccessToken::new("tok")));
        assert_eq!(
            headers,
            Headers::from([("Authorization".to_string(), "Bearer tok".to_string())])
        );
    }

    #[test]
    fn test_validate_response_minimal_error() {
        let body = json!({"error_code": "InvalidScope", "message": "Scope not allowed"});
        let err = freelancer().validate_response(400, &body).unwrap_err();
        assert_eq!(
            err,
            IdentityError::Provider {
                message: "Scope not allowed".to_string()
            }
        );
    }

    #[test]
    fn test_validate_response_detailed_error() {
        let body = json!({"error_code": 105, "message": "Token expired"});
        let err = custom().validate_response(401, &body).unwrap_err();
        assert_eq!(err.to_string(), "Token expired");
        assert_eq!(
            err,
            IdentityError::IdentityProvider {
                message: "Token expired".to_string(),
                code: 0,
                body,
            }
        );
    }

    #[test]
    fn test_validate_response_ignores_empty_codes() {
        let provider = custom();
        for code in [json!(null), json!(""), json!("0"), json!(0), json!(false), json!([])] {
            let body = json!({"error_code": code, "message": "ignored"});
            assert!(provider.validate_response(200, &body).is_ok());
        }
        assert!(provider.validate_response(500, &json!({"email": "a@b.com"})).is_ok());
        assert!(provider.validate_response(200, &json!("plain")).is_ok());
    }

    #[test]
    fn test_validate_response_message_falls_back_to_code() {
        let err = freelancer()
            .validate_response(400, &json!({"error_code": "Oops"}))
            .unwrap_err();
        assert_eq!(err.to_string(), "Oops");
    }

    #[test]
    fn test_create_resource_owner() {
        let body = json!({"email": "a@b.com", "username": "ab"});
        let owner = freelancer()
            .create_resource_owner(&body, &AccessToken::new("t"))
            .unwrap();
        assert_eq!(owner.id(), "a@b.com");

        let err = freelancer()
            .create_resource_owner(&json!({"username": "ab"}), &AccessToken::new("t"))
            .unwrap_err();
        assert!(matches!(err, IdentityError::MissingOwnerId { .. }));
    }

    #[test]
    fn test_freelancer_narrows_exchange_errors() {
        let provider = freelancer();
        let cases = [
            (
                OAuth2ClientError::InvalidGrant("Grant \"x\" is not supported".to_string()),
                "Invalid grant type.",
            ),
            (
                OAuth2ClientError::MissingParameter(
                    "Required parameter not passed: \"code\"".to_string(),
                ),
                "Required parameter not passed: \"code\"",
            ),
            (
                OAuth2ClientError::InvalidArgument(
                    "expires_in value must be an integer".to_string(),
                ),
                "expires_in value must be an integer",
            ),
            (
                OAuth2ClientError::Transport("connection refused".to_string()),
                "Unknown error occurred.",
            ),
            (
                OAuth2ClientError::Rejected(IdentityError::Provider {
                    message: "Invalid code".to_string(),
                }),
                "Unknown error occurred.",
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(
                provider.exchange_error(error),
                IdentityError::token_exchange(expected)
            );
        }
    }

    #[test]
    fn test_custom_keeps_provider_rejection() {
        let rejection = IdentityError::IdentityProvider {
            message: "Invalid code".to_string(),
            code: 0,
            body: json!({"error_code": 1, "message": "Invalid code"}),
        };
        let provider = custom();
        assert_eq!(
            provider.exchange_error(OAuth2ClientError::Rejected(rejection.clone())),
            rejection
        );
        assert_eq!(
            provider.exchange_error(OAuth2ClientError::Transport("timeout".to_string())),
            IdentityError::token_exchange("transport error: timeout")
        );
    }
}
