//! Generic OAuth2 client implementation using reqwest.
//!
//! This adapter implements the `GenericOAuth2Client` port. It builds the
//! authorization URL, posts token requests as form data, and executes
//! prepared requests, calling back into the injected `ProviderStrategy` at
//! every provider-specific step.

use fln_identity_application::ports::{
    AuthorizationOptions, AuthorizationRequest, GenericOAuth2Client, ProviderStrategy,
};
use fln_identity_application::{OAuth2ClientError, OAuth2ClientResult};
use fln_identity_domain::{
    AccessToken, AuthorizationParams, ClientCredentials, Grant, HttpMethod, PreparedRequest,
    RequestOptions, TokenOptions,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

/// Content-Type for form-urlencoded data.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// User agent sent with every request.
const USER_AGENT: &str = concat!("fln-identity/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed generic OAuth2 client.
pub struct ReqwestOAuth2Client<S> {
    strategy: S,
    credentials: ClientCredentials,
    http_client: Client,
}

impl<S: ProviderStrategy> ReqwestOAuth2Client<S> {
    /// Creates a client that never follows redirects.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(strategy: S, credentials: ClientCredentials) -> OAuth2ClientResult<Self> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| OAuth2ClientError::Transport(e.to_string()))?;

        Ok(Self::with_client(strategy, credentials, http_client))
    }

    /// Creates a client with a custom reqwest client.
    #[must_use]
    pub const fn with_client(
        strategy: S,
        credentials: ClientCredentials,
        http_client: Client,
    ) -> Self {
        Self {
            strategy,
            credentials,
            http_client,
        }
    }

    /// Client credentials sent to the provider.
    #[must_use]
    pub const fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    /// Generic authorization parameters merged with the provider's.
    fn authorization_parameters(&self, options: AuthorizationOptions) -> AuthorizationParams {
        let AuthorizationOptions {
            state,
            scopes,
            mut params,
        } = options;

        let state = state
            .or_else(|| params.get("state").cloned())
            .filter(|state| !state.is_empty())
            .unwrap_or_else(generate_state);
        let scope = scopes
            .unwrap_or_else(|| self.strategy.default_scopes().to_vec())
            .join(self.strategy.scope_separator());

        // approval_prompt is superseded by an explicit prompt
        if !params.contains_key("prompt") {
            params
                .entry("approval_prompt".to_string())
                .or_insert_with(|| "auto".to_string());
        }
        params.insert("state".to_string(), state);
        params.entry("scope".to_string()).or_insert(scope);
        params
            .entry("response_type".to_string())
            .or_insert_with(|| "code".to_string());
        if let Some(redirect_uri) = &self.credentials.redirect_uri {
            params
                .entry("redirect_uri".to_string())
                .or_insert_with(|| redirect_uri.clone());
        }
        params.insert("client_id".to_string(), self.credentials.client_id.clone());

        self.strategy.build_authorization_parameters(params)
    }

    /// Form parameters for a token request.
    fn token_parameters(
        &self,
        grant: Grant,
        options: TokenOptions,
    ) -> OAuth2ClientResult<TokenOptions> {
        for name in grant.required_parameters() {
            if !options.contains_key(*name) {
                return Err(OAuth2ClientError::MissingParameter(format!(
                    "Required parameter not passed: \"{name}\""
                )));
            }
        }

        let mut params = TokenOptions::from([
            ("client_id".to_string(), self.credentials.client_id.clone()),
            (
                "client_secret".to_string(),
                self.credentials.client_secret.clone(),
            ),
        ]);
        if let Some(redirect_uri) = &self.credentials.redirect_uri {
            params.insert("redirect_uri".to_string(), redirect_uri.clone());
        }
        params.extend(options);
        params.insert("grant_type".to_string(), grant.as_str().to_string());
        Ok(params)
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to `OAuth2ClientError`.
    fn map_error(error: &reqwest::Error) -> OAuth2ClientError {
        if error.is_timeout() {
            return OAuth2ClientError::Transport("request timed out".to_string());
        }
        if error.is_connect() {
            return OAuth2ClientError::Transport(format!("connection failed: {error}"));
        }
        OAuth2ClientError::Transport(error.to_string())
    }
}

impl<S: ProviderStrategy> GenericOAuth2Client for ReqwestOAuth2Client<S> {
    type Strategy = S;

    fn strategy(&self) -> &Self::Strategy {
        &self.strategy
    }

    fn authorization_url(
        &self,
        options: AuthorizationOptions,
    ) -> OAuth2ClientResult<AuthorizationRequest> {
        let base = self.strategy.base_authorization_url();
        let mut url = Url::parse(&base)
            .map_err(|e| OAuth2ClientError::InvalidArgument(format!("{e}: {base}")))?;

        let params = self.authorization_parameters(options);
        let state = params.get("state").cloned().unwrap_or_default();
        url.query_pairs_mut().extend_pairs(&params);

        Ok(AuthorizationRequest { url, state })
    }

    async fn exchange_token(
        &self,
        grant: &str,
        options: TokenOptions,
    ) -> OAuth2ClientResult<AccessToken> {
        let grant: Grant = grant.parse().map_err(OAuth2ClientError::InvalidGrant)?;
        let params = self.token_parameters(grant, options)?;
        let url = self.strategy.base_access_token_url(&params);

        let form = serde_urlencoded::to_string(&params).map_err(|e| {
            OAuth2ClientError::InvalidArgument(format!("Failed to encode form: {e}"))
        })?;
        let request = PreparedRequest::new(
            HttpMethod::Post,
            url,
            self.strategy.authorization_headers(None),
            RequestOptions::default()
                .with_header(CONTENT_TYPE.as_str(), FORM_CONTENT_TYPE)
                .with_body(form),
        );

        debug!(grant = %grant, url = %request.url, "requesting access token");
        match self.fetch_response(&request).await? {
            Value::Object(mapping) => AccessToken::from_mapping(mapping)
                .map_err(|e| OAuth2ClientError::InvalidArgument(e.to_string())),
            _ => Err(OAuth2ClientError::InvalidResponse(
                "token response is not an object".to_string(),
            )),
        }
    }

    async fn fetch_response(&self, request: &PreparedRequest) -> OAuth2ClientResult<Value> {
        let url = Url::parse(&request.url)
            .map_err(|e| OAuth2ClientError::InvalidArgument(format!("{e}: {}", request.url)))?;

        let mut builder = self
            .http_client
            .request(Self::to_reqwest_method(request.method), url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        debug!(method = %request.method, url = %request.url, "sending request");
        let response = builder.send().await.map_err(|e| Self::map_error(&e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let text = response
            .text()
            .await
            .map_err(|e| OAuth2ClientError::Transport(format!("Failed to read body: {e}")))?;
        debug!(status, bytes = text.len(), "response received");

        let body = parse_body(content_type.as_deref(), &text)?;
        self.strategy
            .validate_response(status, &body)
            .map_err(OAuth2ClientError::Rejected)?;
        Ok(body)
    }
}

/// Parses a JSON or form-encoded response body.
fn parse_body(content_type: Option<&str>, text: &str) -> OAuth2ClientResult<Value> {
    let form_encoded = content_type.is_some_and(|ct| ct.contains(FORM_CONTENT_TYPE));

    let body = if form_encoded {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(text)
            .map_err(|e| OAuth2ClientError::InvalidResponse(format!("Invalid form body: {e}")))?;
        Value::Object(
            pairs
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect::<Map<String, Value>>(),
        )
    } else {
        serde_json::from_str(text).map_err(|e| {
            OAuth2ClientError::InvalidResponse(format!("Expected JSON from provider: {e}"))
        })?
    };

    if body.is_object() || body.is_array() {
        Ok(body)
    } else {
        Err(OAuth2ClientError::InvalidResponse(
            "Expected a JSON object or array from provider".to_string(),
        ))
    }
}

/// Random 128-bit state, hex encoded.
fn generate_state() -> String {
    rand::random::<[u8; 16]>()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
