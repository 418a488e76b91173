//! Composition root and command handlers.

use std::io::Write;
use std::sync::Arc;

use tokio::sync::broadcast;
use warden_application::{
    AuthEvents, HttpClient, HttpClientError, OAuthClient, OAuthContext, OAuthError,
    RequestOptions, StorageError, TokenStore, TransportError,
};
use warden_domain::auth::token_preview;
use warden_domain::{
    Environment, FormData, Header, HttpMethod, HttpRequest, HttpResponse,
    OAuthEvent, OAuthSettings,
};
use warden_infrastructure::{
    DEFAULT_NAMESPACE, FileTokenStorage, ReqwestHttpClient, SettingsError, SettingsFile,
};

use crate::cli::{Cli, Commands};

/// Errors surfaced by the command-line client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Settings could not be loaded.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// The token slot failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// An OAuth2 call failed.
    #[error(transparent)]
    OAuth(#[from] OAuthError),

    /// A request through the pipeline failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The HTTP client could not be built.
    #[error(transparent)]
    Http(#[from] HttpClientError),

    /// A command argument is malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Writing the output failed.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Wired-up client ready to run commands.
pub struct App<H> {
    client: OAuthClient<H>,
    events: broadcast::Receiver<OAuthEvent>,
}

impl App<ReqwestHttpClient> {
    /// Builds the client from command-line flags, the settings file and the
    /// `WARDEN_*` environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the token slot cannot
    /// be opened.
    pub async fn from_cli(cli: &Cli) -> Result<Self, AppError> {
        let path = cli.settings.clone().or_else(SettingsFile::default_path);
        let file = match path {
            Some(path) => SettingsFile::load_or_default(&path).await?,
            None => SettingsFile::default(),
        }
        .with_env_overrides()?;

        let namespace = file
            .token_namespace
            .clone()
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        let header_style = file.header_style.unwrap_or_default();

        let mut settings = file.into_settings()?;
        if let Some(env) = cli.env {
            settings.set_active(env);
        }

        let storage = match &cli.token_dir {
            Some(dir) => FileTokenStorage::in_dir(dir, &namespace),
            None => FileTokenStorage::default_location(&namespace)?,
        };
        tracing::debug!(slot = %storage.path().display(), "using token slot");

        let tokens = TokenStore::open(Arc::new(storage))
            .await?
            .with_header_style(header_style);
        Ok(Self::new(settings, tokens, ReqwestHttpClient::new()?))
    }
}

impl<H: HttpClient> App<H> {
    /// Wires the client over the given parts.
    pub fn new(settings: OAuthSettings, tokens: TokenStore, http: H) -> Self {
        let events = AuthEvents::default();
        let rx = events.subscribe();
        let client = OAuthClient::new(OAuthContext::new(settings), tokens, events, http);
        Self { client, events: rx }
    }

    /// Runs one command, writing its report to `out`.
    ///
    /// # Errors
    ///
    /// Returns the command's failure; authentication events raised on the
    /// way are logged either way.
    pub async fn run(&mut self, command: Commands, out: &mut impl Write) -> Result<(), AppError> {
        let result = self.dispatch(command, out).await;
        self.report_events();
        result
    }

    async fn dispatch(&self, command: Commands, out: &mut impl Write) -> Result<(), AppError> {
        match command {
            Commands::Login {
                username,
                password,
                scope,
            } => {
                let mut data = FormData::new()
                    .with("username", username)
                    .with("password", password);
                if let Some(scope) = scope {
                    data.insert("scope", scope);
                }
                self.client
                    .get_access_token(data, RequestOptions::new())
                    .await?;
                writeln!(out, "logged in to {}", self.environment().await)?;
            }
            Commands::Refresh => {
                self.client
                    .get_refresh_token(FormData::new(), RequestOptions::new())
                    .await?;
                writeln!(out, "token refreshed")?;
            }
            Commands::Revoke => {
                self.client
                    .revoke_token(FormData::new(), RequestOptions::new())
                    .await?;
                writeln!(out, "token revoked")?;
            }
            Commands::Status => self.status(out).await?,
            Commands::Request {
                url,
                method,
                headers,
                data,
            } => self.request(url, method, &headers, data, out).await?,
            Commands::Env => self.environments(out).await?,
        }
        Ok(())
    }

    async fn environment(&self) -> Environment {
        self.client.context().active_environment().await
    }

    async fn status(&self, out: &mut impl Write) -> Result<(), AppError> {
        let env = self.environment().await;
        writeln!(out, "environment: {env}")?;
        match self.client.context().active_server().await {
            Ok(server) => writeln!(out, "server: {}", server.base_url())?,
            Err(error) => writeln!(out, "server: {error}")?,
        }

        let tokens = self.client.tokens();
        let Some(token) = tokens.token().await else {
            writeln!(out, "authenticated: no")?;
            return Ok(());
        };
        writeln!(out, "authenticated: yes")?;
        writeln!(out, "token type: {}", token.token_type().unwrap_or("-"))?;
        writeln!(
            out,
            "access token: {}",
            token.access_token().map_or_else(|| "-".to_string(), token_preview)
        )?;
        writeln!(
            out,
            "refresh token: {}",
            if token.refresh_token().is_some() {
                "present"
            } else {
                "absent"
            }
        )?;
        Ok(())
    }

    async fn request(
        &self,
        url: String,
        method: HttpMethod,
        headers: &[String],
        data: Option<String>,
        out: &mut impl Write,
    ) -> Result<(), AppError> {
        let mut request = HttpRequest::new(method, url);
        for raw in headers {
            request.headers.set(parse_header(raw)?);
        }
        request.body = data;

        match self.client.pipeline().send(request).await {
            Ok(response) => write_response(&response, out),
            Err(TransportError::Rejected(rejection)) => {
                write_response(rejection.response(), out)?;
                Err(TransportError::Rejected(rejection).into())
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn environments(&self, out: &mut impl Write) -> Result<(), AppError> {
        let settings = self.client.context().snapshot().await;
        for env in Environment::all() {
            let marker = if *env == settings.active() { "*" } else { " " };
            match settings.server(*env) {
                Ok(server) => writeln!(
                    out,
                    "{marker} {env}  {}  client={}",
                    server.base_url(),
                    server.client_id()
                )?,
                Err(_) => writeln!(out, "{marker} {env}  (not configured)")?,
            }
        }
        Ok(())
    }

    fn report_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    let rejection = event.rejection();
                    tracing::warn!(
                        event = event.name(),
                        url = rejection.url(),
                        status = rejection.status(),
                        error = rejection.error_code().as_deref().unwrap_or("-"),
                        "authentication failure"
                    );
                }
                Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "authentication events dropped");
                }
                Err(_) => break,
            }
        }
    }
}

/// Parses a `Name: value` header argument.
fn parse_header(raw: &str) -> Result<Header, AppError> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| AppError::InvalidArgument(format!("header without ':': {raw}")))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidArgument(format!("empty header name: {raw}")));
    }
    Ok(Header::new(name, value.trim()))
}

fn write_response(response: &HttpResponse, out: &mut impl Write) -> Result<(), AppError> {
    writeln!(out, "HTTP {}", response.status)?;
    if !response.body.is_empty() {
        writeln!(out, "{}", response.body)?;
    }
    Ok(())
}
