//! Reqwest-backed client for the school backend.
//!
//! Owns transport details only: URL building, bearer token and request id
//! headers, the fixed request timeout, envelope decoding and HTTP error
//! mapping. There is no retry: a failed call is reported once to the caller.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode, Url, header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";
const USER_AGENT: &str = concat!("school-admin/", env!("CARGO_PKG_VERSION"));

/// Uniform response envelope returned by every backend endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Server-provided explanation: `error` first, then `message`.
    pub fn server_message(&self) -> Option<String> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            message: None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ApiError {
    #[error("backend rejected the session")]
    Unauthorized,
    #[error("backend request timed out: {0}")]
    Timeout(String),
    #[error("backend transport error: {0}")]
    Transport(String),
    #[error("backend error (status {status}): {message}")]
    Backend { status: u16, message: String },
    #[error("failed to decode backend response: {0}")]
    Decode(String),
    #[error("invalid backend path: {0}")]
    InvalidPath(String),
}

impl ApiError {
    /// Text suitable for a flash message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Backend { message, .. } => message.clone(),
            ApiError::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            ApiError::Timeout(_) => {
                "The server took too long to respond. Please try again.".to_string()
            }
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

/// One backend call: method, relative path, query parameters and JSON body.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Adds the parameter only when a value is present.
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Decode(format!("failed to encode request body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// HTTP client bound to one backend base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client whose every request is aborted after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is not absolute or the reqwest
    /// client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let parsed =
            Url::parse(base_url).map_err(|e| ApiError::InvalidPath(format!("{base_url}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidPath(base_url.to_string()));
        }
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, path: &str) -> Result<Url, ApiError> {
        validate_path(path)?;
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| ApiError::InvalidPath(format!("{path}: {e}")))
    }

    async fn execute(
        &self,
        token: Option<&str>,
        request: ApiRequest,
    ) -> Result<(StatusCode, Vec<u8>), ApiError> {
        let url = self.url_for(&request.path)?;
        let request_id = Uuid::new_v4();

        log::debug!("backend {} {} [{request_id}]", request.method, request.path);

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(header::ACCEPT, "application/json")
            .header("X-Request-Id", request_id.to_string());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            log::warn!(
                "backend {} {} [{request_id}] failed: {e}",
                request.method,
                request.path
            );
            map_transport_error(e)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;

        if !status.is_success() {
            log::warn!(
                "backend {} {} [{request_id}] answered {}",
                request.method,
                request.path,
                status.as_u16()
            );
        }

        Ok((status, body.to_vec()))
    }

    /// Issues the request and decodes the envelope's `data` into `T`.
    pub async fn send<T: DeserializeOwned>(
        &self,
        token: Option<&str>,
        request: ApiRequest,
    ) -> Result<T, ApiError> {
        let (status, body) = self.execute(token, request).await?;
        decode_response(status, &body)
    }

    /// Issues the request and returns the raw envelope with the HTTP status.
    pub async fn forward(
        &self,
        token: Option<&str>,
        request: ApiRequest,
    ) -> Result<(StatusCode, ApiEnvelope<Value>), ApiError> {
        let (status, body) = self.execute(token, request).await?;
        let envelope = parse_envelope(status, &body)?;
        Ok((status, envelope))
    }
}

/// Accepts only relative paths such as `/finance/invoices`.
pub fn validate_path(path: &str) -> Result<(), ApiError> {
    let invalid = !path.starts_with('/')
        || path.starts_with("//")
        || path.contains("://")
        || path.contains('?')
        || path.contains('#')
        || path.split('/').any(|segment| segment == "..");
    if invalid {
        Err(ApiError::InvalidPath(path.to_string()))
    } else {
        Ok(())
    }
}

fn parse_envelope(status: StatusCode, body: &[u8]) -> Result<ApiEnvelope<Value>, ApiError> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }

    match serde_json::from_slice::<ApiEnvelope<Value>>(body) {
        Ok(envelope) => Ok(envelope),
        Err(err) if status.is_success() => Err(ApiError::Decode(format!(
            "invalid response envelope: {err}"
        ))),
        Err(_) => Err(map_status_error(status, body)),
    }
}

fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, ApiError> {
    let envelope = parse_envelope(status, body)?;

    if !status.is_success() {
        return Err(match (map_status_error(status, body), envelope.server_message()) {
            (ApiError::Backend { status, .. }, Some(message)) => {
                ApiError::Backend { status, message }
            }
            (err, _) => err,
        });
    }

    if !envelope.success {
        return Err(ApiError::Backend {
            status: status.as_u16(),
            message: envelope
                .server_message()
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
        });
    }

    let data = envelope.data.unwrap_or(Value::Null);
    serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))
}

fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout(error.to_string())
    } else {
        ApiError::Transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ApiError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        preview
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ApiError::Timeout(message),
        _ => ApiError::Backend {
            status: status.as_u16(),
            message,
        },
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
