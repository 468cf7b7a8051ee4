use crate::api::{Auth, Files, PredefinedTasks, Tasks, Users, Workers};
use crate::error::{ApiError, QalpuchError, Result};
use crate::types::{Envelope, ErrorBody};
use parking_lot::RwLock;
use reqwest::header::CONTENT_TYPE;
use reqwest::{multipart, Method, RequestBuilder, Response};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use std::env;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const BASE_URL_ENV: &str = "QALPUCH_BASE_URL";
const TOKEN_ENV: &str = "QALPUCH_TOKEN";

/// The main client for interacting with the Qalpuch API.
///
/// It holds the shared `reqwest::Client`, the base URL and the session's
/// bearer token. Clones share the same token, so a token set after login is
/// seen by every clone. Token updates are not ordered against requests that
/// are already in flight; callers that refresh tokens concurrently should
/// keep one client per session.
#[derive(Clone)]
pub struct QalpuchClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<String>>,
    cancel: Option<CancellationToken>,
}

impl fmt::Debug for QalpuchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QalpuchClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.is_authenticated())
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

/// Builder for a [`QalpuchClient`] with non-default transport settings.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The API root including its version prefix, e.g. `https://api.example.com/v1`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Total deadline for each request. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// # Errors
    ///
    /// - `QalpuchError::MissingBaseUrl` if no base URL was set.
    /// - `QalpuchError::UrlParseFailed` if the base URL is invalid.
    /// - `QalpuchError::Transport` if the internal HTTP client fails to build.
    pub fn build(self) -> Result<QalpuchClient> {
        let base_url = self.base_url.ok_or(QalpuchError::MissingBaseUrl)?;
        Url::parse(&base_url)?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("qalpuch-rust/{}", env!("CARGO_PKG_VERSION")));
        let http = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .user_agent(user_agent)
            .build()?;

        Ok(QalpuchClient {
            http,
            base_url,
            token: Arc::new(RwLock::new(self.token.unwrap_or_default())),
            cancel: None,
        })
    }
}

impl QalpuchClient {
    /// Creates a new `QalpuchClient`.
    ///
    /// The base URL is taken from `base_url`, falling back to the
    /// `QALPUCH_BASE_URL` environment variable. If `QALPUCH_TOKEN` is set it
    /// becomes the initial bearer token.
    ///
    /// # Errors
    ///
    /// - `QalpuchError::MissingBaseUrl` if the base URL is not provided in either way.
    /// - `QalpuchError::UrlParseFailed` if the base URL is invalid.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        let base_url = base_url
            .or_else(|| env::var(BASE_URL_ENV).ok())
            .ok_or(QalpuchError::MissingBaseUrl)?;

        let mut builder = ClientBuilder::new().base_url(base_url);
        if let Ok(token) = env::var(TOKEN_ENV) {
            builder = builder.token(token);
        }
        builder.build()
    }

    /// Creates a new `QalpuchClient` with an explicit base URL and token.
    ///
    /// Pass an empty token for anonymous calls such as login or worker
    /// registration.
    pub fn new_with_url(base_url: &str, token: &str) -> Result<Self> {
        ClientBuilder::new().base_url(base_url).token(token).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The current bearer token; empty when anonymous.
    pub fn token(&self) -> String {
        self.token.read().clone()
    }

    /// Replaces the bearer token for this client and all of its clones.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = token.into();
    }

    pub fn clear_token(&self) {
        self.token.write().clear();
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.read().is_empty()
    }

    /// Returns a clone of this client whose calls abort with
    /// `QalpuchError::Cancelled` once `token` is cancelled.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
            ..self.clone()
        }
    }

    pub fn auth(&self) -> Auth<'_> {
        Auth::new(self)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    pub fn files(&self) -> Files<'_> {
        Files::new(self)
    }

    pub fn tasks(&self) -> Tasks<'_> {
        Tasks::new(self)
    }

    pub fn workers(&self) -> Workers<'_> {
        Workers::new(self)
    }

    pub fn predefined_tasks(&self) -> PredefinedTasks<'_> {
        PredefinedTasks::new(self)
    }

    /// Performs one authenticated request/response cycle.
    ///
    /// `body`, when given, is sent as JSON. On `success: true` the envelope's
    /// `data` is decoded into `T`; `Ok(None)` means the envelope carried no
    /// data. On `success: false` the status code is classified into an
    /// [`ApiError`].
    pub async fn request<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.http.request(method.clone(), self.endpoint(path)?);
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(|source| QalpuchError::Encode {
                method: method.to_string(),
                path: path.to_string(),
                source,
            })?;
            builder = builder.header(CONTENT_TYPE, "application/json").body(bytes);
        }
        self.dispatch(method, path, builder).await
    }

    /// Sends a multipart form and decodes the enveloped response.
    pub async fn request_multipart<T>(&self, path: &str, form: multipart::Form) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let builder = self.http.post(self.endpoint(path)?).multipart(form);
        self.dispatch(Method::POST, path, builder).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: multipart::Form) -> Result<T> {
        let data = self.request_multipart(path, form).await?;
        require_data(data, Method::POST, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let data = self.request::<(), T>(Method::GET, path, None).await?;
        require_data(data, Method::GET, path)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let data = self.request(Method::POST, path, Some(body)).await?;
        require_data(data, Method::POST, path)
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let data = self.request(Method::PUT, path, Some(body)).await?;
        require_data(data, Method::PUT, path)
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let data = self.request(Method::PATCH, path, Some(body)).await?;
        require_data(data, Method::PATCH, path)
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send::<()>(Method::DELETE, path, None).await
    }

    /// Like [`request`](Self::request) but discards any response data.
    pub async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.request::<B, IgnoredAny>(method, path, body).await?;
        Ok(())
    }

    /// Fetches a non-enveloped body as raw bytes.
    pub async fn download(&self, path: &str) -> Result<Vec<u8>> {
        let builder = self.authorize(self.http.get(self.endpoint(path)?));
        debug!(method = "GET", path, "downloading");
        self.cancellable(fetch_bytes(path, builder)).await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let token = self.token.read();
        if token.is_empty() {
            builder
        } else {
            builder.bearer_auth(token.as_str())
        }
    }

    async fn dispatch<T>(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let builder = self.authorize(builder);
        debug!(%method, path, "dispatching request");

        self.cancellable(exchange(&method, path, builder)).await
    }

    async fn cancellable<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match &self.cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => Err(QalpuchError::Cancelled),
                result = fut => result,
            },
            None => fut.await,
        }
    }
}

async fn fetch_bytes(path: &str, builder: RequestBuilder) -> Result<Vec<u8>> {
    let response = builder.send().await?;
    let status = response.status();
    let bytes = response.bytes().await?;
    if status.is_success() {
        return Ok(bytes.to_vec());
    }

    let err = error_from_body(status.as_u16(), &bytes);
    warn!(path, status = err.status, kind = %err.kind, "download failed");
    Err(err.into())
}

async fn exchange<T>(method: &Method, path: &str, builder: RequestBuilder) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    let response = builder.send().await?;
    decode_response(method, path, response).await
}

async fn decode_response<T>(method: &Method, path: &str, response: Response) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let bytes = response.bytes().await?;

    let envelope: Envelope = match serde_json::from_slice(&bytes) {
        Ok(envelope) => envelope,
        Err(source) => {
            if !status.is_success() {
                let err = error_from_body(status.as_u16(), &bytes);
                warn!(%method, path, status = err.status, kind = %err.kind, "error response without envelope");
                return Err(err.into());
            }
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(None);
            }
            return Err(QalpuchError::MalformedResponse {
                method: method.to_string(),
                path: path.to_string(),
                source,
            });
        }
    };
    debug!(%method, path, status = status.as_u16(), success = envelope.success, "response received");

    if !envelope.success || !status.is_success() {
        let message = error_message(envelope.message.as_deref(), envelope.error.as_ref())
            .unwrap_or_else(|| {
                format!("API error with status {} for {} {}", status.as_u16(), method, path)
            });
        let err = ApiError::new(status.as_u16(), message);
        warn!(%method, path, status = err.status, kind = %err.kind, "API call failed");
        return Err(err.into());
    }

    match envelope.data {
        Some(raw) => serde_json::from_str(raw.get())
            .map(Some)
            .map_err(|source| QalpuchError::Decode {
                method: method.to_string(),
                path: path.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Prefers `message`, then `error` when it is a string.
fn error_message(message: Option<&str>, error: Option<&serde_json::Value>) -> Option<String> {
    if let Some(message) = message.filter(|m| !m.is_empty()) {
        return Some(message.to_string());
    }
    match error {
        Some(serde_json::Value::String(error)) if !error.is_empty() => Some(error.clone()),
        _ => None,
    }
}

/// Classifies a non-2xx response that carries no full envelope. The server's
/// message is kept when the body has one; otherwise the reason phrase is used.
fn error_from_body(status: u16, bytes: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorBody>(bytes)
        .ok()
        .and_then(|body| error_message(body.message.as_deref(), body.error.as_ref()));
    match message {
        Some(message) => ApiError::new(status, message),
        None => ApiError::from_status(status),
    }
}

fn require_data<T>(data: Option<T>, method: Method, path: &str) -> Result<T> {
    data.ok_or_else(|| QalpuchError::MissingData {
        method: method.to_string(),
        path: path.to_string(),
    })
}
