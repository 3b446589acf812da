//! Type-safe API clients that enforce authentication requirements at compile time

use super::ClientError;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, ClientBuilder, Url, header};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Request timeout applied unless the builder overrides it
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("raiser-client/", env!("CARGO_PKG_VERSION"));

/// Client for public endpoints that don't require authentication
///
/// Clones share one connection pool and one cookie jar. The jar holds the
/// HTTP-only refresh cookie set by the login and refresh responses.
#[derive(Clone)]
pub struct PublicRaiserClient {
    client: Client,
    base_url: String,
    cookies: Arc<Jar>,
}

/// Client for endpoints that require a bearer access token
#[derive(Clone)]
pub struct AuthenticatedRaiserClient {
    client: Client,
    base_url: String,
    access_token: String,
}

fn build_http_client(timeout: Option<Duration>, cookies: Arc<Jar>) -> Result<Client, ClientError> {
    let mut builder = ClientBuilder::new()
        .user_agent(USER_AGENT)
        .cookie_provider(cookies);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

fn normalize_base_url(base_url: String) -> Result<String, ClientError> {
    let base_url = base_url.trim().trim_end_matches('/').to_string();
    if base_url.is_empty() {
        return Err(ClientError::Configuration("base_url must not be empty".into()));
    }
    Ok(base_url)
}

impl PublicRaiserClient {
    /// Create a new public client with the default timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::new_with_timeout(base_url, Some(DEFAULT_TIMEOUT))
    }

    fn new_with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let base_url = normalize_base_url(base_url.into())?;
        let cookies = Arc::new(Jar::default());
        let client = build_http_client(timeout, Arc::clone(&cookies))?;
        Ok(Self {
            client,
            base_url,
            cookies,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder without authentication
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        super::send_json(request).await
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|err| ClientError::Configuration(format!("invalid URL for {path}: {err}")))
    }

    /// `name=value` pairs the jar would send with a request to `path`
    pub fn cookie_header(&self, path: &str) -> Result<Option<String>, ClientError> {
        let url = self.url(path)?;
        Ok(self
            .cookies
            .cookies(&url)
            .and_then(|value| value.to_str().ok().map(str::to_string)))
    }

    /// Seed the jar with `name=value` pairs scoped to `path`
    ///
    /// Accepts the format returned by [`Self::cookie_header`].
    pub fn restore_cookies(&self, path: &str, header: &str) -> Result<(), ClientError> {
        let url = self.url(path)?;
        for pair in header.split(';').map(str::trim).filter(|pair| pair.contains('=')) {
            self.cookies
                .add_cookie_str(&format!("{pair}; Path={path}"), &url);
        }
        Ok(())
    }

    /// Attach an access token, sharing this client's pool and cookie jar
    pub fn with_token(&self, access_token: impl Into<String>) -> AuthenticatedRaiserClient {
        AuthenticatedRaiserClient {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            access_token: access_token.into(),
        }
    }
}

impl AuthenticatedRaiserClient {
    /// Create a new authenticated client with the default timeout
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, ClientError> {
        Ok(PublicRaiserClient::new(base_url)?.with_token(access_token))
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder with authentication
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.access_token))
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        super::send_json(request).await
    }
}

impl fmt::Debug for PublicRaiserClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicRaiserClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for AuthenticatedRaiserClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedRaiserClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Type-safe builder that creates the appropriate client type
pub struct TypedClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl TypedClientBuilder {
    /// Create a new builder
    pub const fn new() -> Self {
        Self {
            base_url: None,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build a public client
    pub fn build_public(self) -> Result<PublicRaiserClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        PublicRaiserClient::new_with_timeout(base_url, self.timeout)
    }
}

impl Default for TypedClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
