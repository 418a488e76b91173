//! OAuth2 client: password grant, refresh grant and revocation.
//!
//! Every call goes through the intercepted pipeline, so a rejected grant is
//! seen by the failed-response hook before it reaches the caller.

use std::time::Duration;

use warden_domain::auth::token_preview;
use warden_domain::request::AUTHORIZATION;
use warden_domain::{
    FormData, Header, Headers, HttpRequest, HttpResponse, ServerConfig, TokenRecord,
};

use super::{AuthEvents, InterceptedClient, OAuthContext, OAuthInterceptor, TokenStore};
use crate::error::{OAuthError, OAuthResult};
use crate::ports::HttpClient;

/// Per-call request adjustments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Headers applied over the defaults; a header with the same name wins.
    pub headers: Headers,
    /// Timeout handed to the transport.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Applies the options to a request.
    pub fn apply(self, request: &mut HttpRequest) {
        request.headers.merge(self.headers);
        if let Some(timeout) = self.timeout {
            request.timeout = Some(timeout);
        }
    }
}

/// Grant type of the password grant.
const PASSWORD_GRANT: &str = "password";
/// Grant type of the refresh grant.
const REFRESH_GRANT: &str = "refresh_token";

/// OAuth2 client bound to the active environment.
#[derive(Debug)]
pub struct OAuthClient<H> {
    context: OAuthContext,
    tokens: TokenStore,
    pipeline: InterceptedClient<H>,
}

impl<H> Clone for OAuthClient<H> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            tokens: self.tokens.clone(),
            pipeline: self.pipeline.clone(),
        }
    }
}

impl<H: HttpClient> OAuthClient<H> {
    /// Builds the client and the pipeline it sends through.
    pub fn new(context: OAuthContext, tokens: TokenStore, events: AuthEvents, http: H) -> Self {
        let interceptor = OAuthInterceptor::new(context.clone(), tokens.clone(), events);
        Self {
            context,
            tokens,
            pipeline: InterceptedClient::new(http, interceptor),
        }
    }

    /// The intercepted pipeline, for calls to protected resources.
    #[must_use]
    pub const fn pipeline(&self) -> &InterceptedClient<H> {
        &self.pipeline
    }

    /// The token accessor.
    #[must_use]
    pub const fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// The configuration context.
    #[must_use]
    pub const fn context(&self) -> &OAuthContext {
        &self.context
    }

    /// True if a token is stored.
    pub async fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated().await
    }

    /// Requests a token with the password grant and stores it.
    ///
    /// `data` usually carries `username` and `password`; its fields override
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Fails if the active environment is not configured, the request fails
    /// or is rejected, the body is not a token object, or the token cannot
    /// be stored.
    pub async fn get_access_token(
        &self,
        data: FormData,
        options: RequestOptions,
    ) -> OAuthResult<HttpResponse> {
        let server = self.context.active_server().await?;
        let form = FormData::new()
            .with("client_id", server.client_id())
            .with("grant_type", PASSWORD_GRANT);

        tracing::debug!(url = %server.grant_url(), "requesting access token");
        self.grant(&server, form, data, options).await
    }

    /// Exchanges the stored refresh token for a new token and stores it.
    ///
    /// # Errors
    ///
    /// See [`get_access_token`](Self::get_access_token).
    pub async fn get_refresh_token(
        &self,
        data: FormData,
        options: RequestOptions,
    ) -> OAuthResult<HttpResponse> {
        let server = self.context.active_server().await?;
        let mut form = FormData::new()
            .with("client_id", server.client_id())
            .with("grant_type", REFRESH_GRANT);
        if let Some(refresh_token) = self.tokens.refresh_token().await {
            form.insert("refresh_token", refresh_token);
        }

        tracing::debug!(url = %server.grant_url(), "refreshing access token");
        self.grant(&server, form, data, options).await
    }

    /// Revokes the stored token and clears it once the server accepts.
    ///
    /// The refresh token is revoked when present, otherwise the access token.
    ///
    /// # Errors
    ///
    /// Fails if the active environment is not configured, the request fails
    /// or is rejected, or the token cannot be cleared.
    pub async fn revoke_token(
        &self,
        data: FormData,
        options: RequestOptions,
    ) -> OAuthResult<HttpResponse> {
        let server = self.context.active_server().await?;
        let mut form = FormData::new().with("client_id", server.client_id());
        let (token, hint) = match self.tokens.refresh_token().await {
            Some(refresh_token) => (Some(refresh_token), REFRESH_GRANT),
            None => (self.tokens.access_token().await, "access_token"),
        };
        if let Some(token) = &token {
            form.insert("token", token.as_str());
        }
        form.insert("token_type_hint", hint);
        form.extend(data);
        with_secret(&mut form, &server);

        tracing::debug!(
            url = %server.revoke_url(),
            hint,
            token = ?token.as_deref().map(token_preview),
            "revoking token"
        );

        let mut request = HttpRequest::post_form(server.revoke_url(), &form);
        options.apply(&mut request);

        let response = self.pipeline.send(request).await?;
        self.tokens.remove_token().await?;
        tracing::info!("token revoked");
        Ok(response)
    }

    async fn grant(
        &self,
        server: &ServerConfig,
        mut form: FormData,
        data: FormData,
        options: RequestOptions,
    ) -> OAuthResult<HttpResponse> {
        form.extend(data);
        with_secret(&mut form, server);

        let mut request = HttpRequest::post_form(server.grant_url(), &form)
            .with_header(Header::absent(AUTHORIZATION));
        options.apply(&mut request);

        let response = self.pipeline.send(request).await?;
        let token = TokenRecord::from_json(&response.body)
            .map_err(|error| OAuthError::InvalidTokenResponse(error.to_string()))?;

        tracing::info!(
            token_type = token.token_type().unwrap_or_default(),
            access_token = ?token.access_token().map(token_preview),
            has_refresh_token = token.refresh_token().is_some(),
            "token stored"
        );
        self.tokens.set_token(token).await?;
        Ok(response)
    }
}

fn with_secret(form: &mut FormData, server: &ServerConfig) {
    if let Some(secret) = server.client_secret() {
        form.insert("client_secret", secret);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::test_support::{MemoryStorage, ScriptedHttpClient, form_pairs};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use warden_domain::{ConfigError, Environment, HttpMethod, Rejection, ServerParams};

    const TOKEN_BODY: &str = r#"{"access_token":"a2","refresh_token":"r2","token_type":"bearer","expires_in":3600}"#;

    struct Fixture {
        client: OAuthClient<Arc<ScriptedHttpClient>>,
        http: Arc<ScriptedHttpClient>,
        storage: Arc<MemoryStorage>,
        events: AuthEvents,
    }

    async fn fixture(
        params: ServerParams,
        storage: MemoryStorage,
        http: ScriptedHttpClient,
    ) -> Fixture {
        let context = OAuthContext::default();
        context.configure(Environment::Dev, params).await.unwrap();
        let storage = Arc::new(storage);
        let tokens = TokenStore::open(storage.clone()).await.unwrap();
        let events = AuthEvents::default();
        let http = Arc::new(http);
        let client = OAuthClient::new(context, tokens, events.clone(), http.clone());
        Fixture {
            client,
            http,
            storage,
            events,
        }
    }

    fn public_client() -> ServerParams {
        ServerParams::new()
            .base_url("https://api.test/")
            .client_id("web")
            .grant_path("token")
    }

    fn pairs(request: &HttpRequest) -> Vec<(String, String)> {
        form_pairs(request.body.as_deref().expect("form body"))
    }

    fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn login() -> FormData {
        FormData::new()
            .with("username", "ana@example.com")
            .with("password", "p&ss word")
    }

    #[tokio::test]
    async fn test_password_grant_stores_token() {
        let f = fixture(
            public_client(),
            MemoryStorage::default(),
            ScriptedHttpClient::default().respond(HttpResponse::new(200, TOKEN_BODY)),
        )
        .await;

        let response = f
            .client
            .get_access_token(login(), RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        let request = f.http.last_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://api.test/token");
        assert_eq!(
            request.headers.get("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert!(request.headers.contains(AUTHORIZATION));
        assert_eq!(request.headers.get(AUTHORIZATION), None);
        assert_eq!(
            pairs(&request),
            owned(&[
                ("client_id", "web"),
                ("grant_type", "password"),
                ("username", "ana@example.com"),
                ("password", "p&ss word"),
            ])
        );
        assert_eq!(
            request.body.as_deref(),
            Some("client_id=web&grant_type=password&username=ana%40example.com&password=p%26ss%20word")
        );

        assert!(f.client.is_authenticated().await);
        let stored = f.storage.current().unwrap();
        assert_eq!(stored.access_token(), Some("a2"));
        assert_eq!(stored.extra.get("expires_in"), Some(&serde_json::json!(3600)));
    }

    #[tokio::test]
    async fn test_grant_never_carries_stored_bearer() {
        let f = fixture(
            public_client(),
            MemoryStorage::with_token(TokenRecord::new("a1", "bearer")),
            ScriptedHttpClient::default().respond(HttpResponse::new(200, TOKEN_BODY)),
        )
        .await;

        f.client
            .get_access_token(login(), RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(f.http.last_request().headers.get(AUTHORIZATION), None);
    }

    #[tokio::test]
    async fn test_caller_data_wins_except_client_secret() {
        let f = fixture(
            public_client().client_secret("s3cret"),
            MemoryStorage::default(),
            ScriptedHttpClient::default().respond(HttpResponse::new(200, TOKEN_BODY)),
        )
        .await;
        let data = FormData::new()
            .with("grant_type", "custom")
            .with("client_secret", "ignored")
            .with("scope", "read");

        f.client
            .get_access_token(data, RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(
            pairs(&f.http.last_request()),
            owned(&[
                ("client_id", "web"),
                ("grant_type", "custom"),
                ("client_secret", "s3cret"),
                ("scope", "read"),
            ])
        );
    }

    #[tokio::test]
    async fn test_options_apply_over_defaults() {
        let f = fixture(
            public_client(),
            MemoryStorage::default(),
            ScriptedHttpClient::default().respond(HttpResponse::new(200, TOKEN_BODY)),
        )
        .await;
        let options = RequestOptions::new()
            .with_header("Authorization", "Basic d2ViOnMz")
            .with_header("X-Trace", "1")
            .with_timeout(Duration::from_secs(5));

        f.client.get_access_token(login(), options).await.unwrap();

        let request = f.http.last_request();
        assert_eq!(request.headers.get(AUTHORIZATION), Some("Basic d2ViOnMz"));
        assert_eq!(request.headers.get("x-trace"), Some("1"));
        assert_eq!(request.timeout, Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_refresh_grant_sends_stored_refresh_token() {
        let f = fixture(
            public_client(),
            MemoryStorage::with_token(TokenRecord::new("a1", "bearer").with_refresh_token("r1")),
            ScriptedHttpClient::default().respond(HttpResponse::new(200, TOKEN_BODY)),
        )
        .await;

        f.client
            .get_refresh_token(FormData::new(), RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(
            pairs(&f.http.last_request()),
            owned(&[
                ("client_id", "web"),
                ("grant_type", "refresh_token"),
                ("refresh_token", "r1"),
            ])
        );
        assert_eq!(f.client.tokens().refresh_token().await.as_deref(), Some("r2"));
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token_omits_field() {
        let f = fixture(
            public_client(),
            MemoryStorage::default(),
            ScriptedHttpClient::default().respond(HttpResponse::new(200, TOKEN_BODY)),
        )
        .await;

        f.client
            .get_refresh_token(FormData::new(), RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(
            pairs(&f.http.last_request()),
            owned(&[("client_id", "web"), ("grant_type", "refresh_token")])
        );
    }

    #[tokio::test]
    async fn test_revoke_prefers_refresh_token() {
        let f = fixture(
            public_client(),
            MemoryStorage::with_token(TokenRecord::new("a1", "bearer").with_refresh_token("r1")),
            ScriptedHttpClient::default().respond(HttpResponse::new(200, "")),
        )
        .await;

        f.client
            .revoke_token(FormData::new(), RequestOptions::new())
            .await
            .unwrap();

        let request = f.http.last_request();
        assert_eq!(request.url, "https://api.test/oauth2/revoke");
        assert_eq!(
            pairs(&request),
            owned(&[
                ("client_id", "web"),
                ("token", "r1"),
                ("token_type_hint", "refresh_token"),
            ])
        );
        assert_eq!(request.headers.get(AUTHORIZATION), Some("Bearera1"));
        assert_eq!(f.client.tokens().token().await, None);
        assert_eq!(f.storage.current(), None);
    }

    #[tokio::test]
    async fn test_revoke_falls_back_to_access_token() {
        let f = fixture(
            public_client().client_secret("s3cret"),
            MemoryStorage::with_token(TokenRecord::new("a1", "bearer")),
            ScriptedHttpClient::default(),
        )
        .await;

        f.client
            .revoke_token(FormData::new(), RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(
            pairs(&f.http.last_request()),
            owned(&[
                ("client_id", "web"),
                ("token", "a1"),
                ("token_type_hint", "access_token"),
                ("client_secret", "s3cret"),
            ])
        );
        assert!(!f.client.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_rejected_revoke_keeps_token() {
        let f = fixture(
            public_client(),
            MemoryStorage::with_token(TokenRecord::new("a1", "bearer")),
            ScriptedHttpClient::default().respond(HttpResponse::new(503, "")),
        )
        .await;

        let error = f
            .client
            .revoke_token(FormData::new(), RequestOptions::new())
            .await
            .unwrap_err();

        assert_eq!(error.rejection().map(Rejection::status), Some(503));
        assert!(f.client.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_invalid_grant_clears_token_and_notifies() {
        let f = fixture(
            public_client(),
            MemoryStorage::with_token(TokenRecord::new("a1", "bearer").with_refresh_token("r1")),
            ScriptedHttpClient::default()
                .respond(HttpResponse::new(400, r#"{"error":"invalid_grant"}"#)),
        )
        .await;
        let mut rx = f.events.subscribe();

        let error = f
            .client
            .get_refresh_token(FormData::new(), RequestOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            OAuthError::Transport(TransportError::Rejected(_))
        ));
        assert_eq!(f.storage.current(), None);
        let event = rx.recv().await.unwrap();
        assert_eq!(event.rejection().error_code().as_deref(), Some("invalid_grant"));
    }

    #[tokio::test]
    async fn test_non_object_body_is_rejected() {
        let f = fixture(
            public_client(),
            MemoryStorage::with_token(TokenRecord::new("a1", "bearer")),
            ScriptedHttpClient::default().respond(HttpResponse::new(200, "[1,2]")),
        )
        .await;

        let error = f
            .client
            .get_access_token(login(), RequestOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(error, OAuthError::InvalidTokenResponse(_)));
        assert_eq!(f.client.tokens().access_token().await.as_deref(), Some("a1"));
    }

    #[tokio::test]
    async fn test_unconfigured_environment_fails_before_sending() {
        let f = fixture(
            public_client(),
            MemoryStorage::default(),
            ScriptedHttpClient::default(),
        )
        .await;
        f.client
            .context()
            .set_active_environment(Environment::Prod)
            .await;

        let error = f
            .client
            .get_access_token(login(), RequestOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            OAuthError::Config(ConfigError::NotConfigured(ref env)) if env == "prod"
        ));
        assert!(f.http.requests().is_empty());
    }
}
