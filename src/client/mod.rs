//! Client layer: authenticated requests against the MIMO REST API.
//!
//! [`MimoClient`] owns the host, the token and the HTTP transport. Each remote
//! resource gets a borrowed handle ([`Senders`], [`Messages`], [`Contacts`],
//! [`Groups`], [`Campaigns`], [`Credits`]) whose methods issue exactly one request
//! and return the decoded JSON body.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::config::Settings;
use crate::domain::{ApiHost, ApiToken, ValidationError};

mod campaigns;
mod contacts;
mod credits;
mod groups;
mod messages;
mod senders;

#[cfg(test)]
pub(crate) mod fake;

pub use campaigns::Campaigns;
pub use contacts::Contacts;
pub use credits::Credits;
pub use groups::Groups;
pub use messages::Messages;
pub use senders::Senders;

const DEFAULT_USER_AGENT: &str = concat!("mimo-sms/", env!("CARGO_PKG_VERSION"));

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum HttpBody {
    Empty,
    Json(Value),
    File {
        field: &'static str,
        file_name: String,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

impl HttpResponse {
    fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

pub(crate) trait HttpTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        method: HttpMethod,
        url: Url,
        body: HttpBody,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        method: HttpMethod,
        url: Url,
        body: HttpBody,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let builder = match method {
                HttpMethod::Get => self.client.get(url),
                HttpMethod::Post => self.client.post(url),
            };
            let builder = match body {
                HttpBody::Empty => builder,
                HttpBody::Json(payload) => builder.json(&payload),
                HttpBody::File {
                    field,
                    file_name,
                    bytes,
                } => {
                    let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
                    builder.multipart(reqwest::multipart::Form::new().part(field, part))
                }
            };
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`MimoClient`] and its resource handles.
pub enum MimoError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status whose body is not JSON.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Successful response whose body could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// Request payload could not be serialized to JSON.
    #[error("failed to encode request payload: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// Local file could not be read for upload.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
/// Builder for [`MimoClient`].
pub struct MimoClientBuilder {
    host: ApiHost,
    token: ApiToken,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl MimoClientBuilder {
    pub fn new(host: ApiHost, token: ApiToken) -> Self {
        Self {
            host,
            token,
            timeout: None,
            user_agent: None,
        }
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<MimoClient, MimoError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()));
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|err| MimoError::Transport(Box::new(err)))?;

        Ok(MimoClient {
            host: self.host,
            token: self.token,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level MIMO client.
///
/// Cloning is cheap; clones share the underlying connection pool.
pub struct MimoClient {
    host: ApiHost,
    token: ApiToken,
    http: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for MimoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MimoClient")
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl MimoClient {
    /// Create a client with default HTTP settings.
    pub fn new(host: ApiHost, token: ApiToken) -> Self {
        Self {
            host,
            token,
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    pub fn builder(host: ApiHost, token: ApiToken) -> MimoClientBuilder {
        MimoClientBuilder::new(host, token)
    }

    /// Build a client from resolved [`Settings`], applying the configured timeout.
    pub fn from_settings(settings: &Settings) -> Result<Self, MimoError> {
        let mut builder = Self::builder(settings.api_host.clone(), settings.api_token.clone());
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    #[cfg(test)]
    pub(crate) fn with_transport(transport: impl HttpTransport + 'static) -> Self {
        Self {
            host: ApiHost::new("https://api.example.invalid/v1/").unwrap(),
            token: ApiToken::new("test-token").unwrap(),
            http: Arc::new(transport),
        }
    }

    pub fn host(&self) -> &ApiHost {
        &self.host
    }

    pub fn senders(&self) -> Senders<'_> {
        Senders::new(self)
    }

    pub fn messages(&self) -> Messages<'_> {
        Messages::new(self)
    }

    pub fn contacts(&self) -> Contacts<'_> {
        Contacts::new(self)
    }

    pub fn groups(&self) -> Groups<'_> {
        Groups::new(self)
    }

    pub fn campaigns(&self) -> Campaigns<'_> {
        Campaigns::new(self)
    }

    pub fn credits(&self) -> Credits<'_> {
        Credits::new(self)
    }

    /// End the API session bound to the token.
    pub async fn logout(&self) -> Result<Value, MimoError> {
        self.get("user/logout", Vec::new()).await
    }

    /// Issue one request and return the raw response.
    pub(crate) async fn execute(
        &self,
        method: HttpMethod,
        endpoint: &str,
        params: Vec<(String, String)>,
        body: HttpBody,
    ) -> Result<HttpResponse, MimoError> {
        let url = crate::transport::make_url(&self.host, &self.token, endpoint, &params)?;
        tracing::debug!(method = method.as_str(), endpoint, "MIMO request");

        let response = self
            .http
            .send(method, url, body)
            .await
            .map_err(MimoError::Transport)?;

        tracing::debug!(endpoint, status = response.status, "MIMO response");
        Ok(response)
    }

    pub(crate) async fn get(
        &self,
        endpoint: &str,
        params: Vec<(String, String)>,
    ) -> Result<Value, MimoError> {
        let response = self
            .execute(HttpMethod::Get, endpoint, params, HttpBody::Empty)
            .await?;
        decode_json_body(response)
    }

    pub(crate) async fn post_json(&self, endpoint: &str, payload: Value) -> Result<Value, MimoError> {
        let response = self
            .execute(HttpMethod::Post, endpoint, Vec::new(), HttpBody::Json(payload))
            .await?;
        decode_json_body(response)
    }

    pub(crate) async fn post_file(
        &self,
        endpoint: &str,
        field: &'static str,
        path: &std::path::Path,
    ) -> Result<Value, MimoError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_owned());
        let response = self
            .execute(
                HttpMethod::Post,
                endpoint,
                Vec::new(),
                HttpBody::File {
                    field,
                    file_name,
                    bytes,
                },
            )
            .await?;
        decode_json_body(response)
    }
}

/// MIMO reports business errors as JSON with a 4xx status, so any JSON body is
/// handed back to the caller. Only a non-JSON body is an error.
fn decode_json_body(response: HttpResponse) -> Result<Value, MimoError> {
    match serde_json::from_str::<Value>(&response.body) {
        Ok(value) => {
            if !response.is_success() {
                tracing::debug!(status = response.status, "MIMO returned a JSON error body");
            }
            Ok(value)
        }
        Err(err) if response.is_success() => Err(MimoError::Parse(Box::new(err))),
        Err(_) => {
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            Err(MimoError::HttpStatus {
                status: response.status,
                body,
            })
        }
    }
}
