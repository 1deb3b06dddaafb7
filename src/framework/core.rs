//! # Resource Access Core
//!
//! This module defines the single chokepoint every API call goes through.
//!
//! ## Key Types
//!
//! - [`ResourceRequest`]: What to call (method, endpoint, id, payload, notification policy).
//! - [`Payload`]: The request body. Exactly one content mode per request.
//! - [`ResourceClient`]: Builds, authorizes, confirms, sends and reports a request.
//! - [`Outcome`]: Either the parsed response body, or `Declined` when the user
//!   refused a DELETE confirmation.

use crate::confirm::ConfirmationClient;
use crate::framework::error::{ApiErrorBody, ResourceError};
use crate::framework::notify::Notifier;
use crate::framework::transport::{HttpRequest, HttpResponse, Transport};
use crate::session::TokenStore;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Text used for success notifications that do not provide their own.
pub const DEFAULT_SUCCESS_TEXT: &str = "Success!";

/// Message shown before any DELETE is sent.
pub const DELETE_PROMPT: &str = "Are you sure to delete?";

// =============================================================================
// 1. REQUEST DESCRIPTION
// =============================================================================

/// HTTP verbs understood by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file attached to a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// Reads a file and guesses its MIME type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        Ok(Self {
            file_name,
            mime: mime_for_extension(&extension).to_string(),
            bytes,
        })
    }
}

fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// The value of one multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartValue {
    Text(String),
    File(FileUpload),
}

/// One named part of a [`MultipartForm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub value: PartValue,
}

/// An ordered multipart body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: PartValue::Text(value.into()),
        });
        self
    }

    pub fn file(mut self, name: impl Into<String>, file: FileUpload) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: PartValue::File(file),
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// First text part with the given name.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match &part.value {
            PartValue::Text(text) if part.name == name => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Request body. Each variant maps to exactly one `Content-Type`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartForm),
    UrlEncoded(Vec<(String, String)>),
}

impl Payload {
    pub fn content_type(&self) -> &'static str {
        match self {
            Payload::Multipart(_) => "multipart/form-data",
            Payload::UrlEncoded(_) => "application/x-www-form-urlencoded",
            Payload::Empty | Payload::Json(_) => "application/json",
        }
    }
}

/// Whether a successful call produces a success notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Notify {
    #[default]
    Silent,
    /// `None` uses [`DEFAULT_SUCCESS_TEXT`].
    Success(Option<String>),
}

/// A single call against the API.
///
/// # Example
/// ```ignore
/// let request = ResourceRequest::patch("/todos")
///     .with_id(7)
///     .with_payload(Payload::Multipart(form))
///     .notify_success("Todo updated successfully!");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRequest {
    pub method: Method,
    pub endpoint: String,
    pub payload: Payload,
    pub resource_id: Option<String>,
    pub query: Vec<(String, String)>,
    pub notify: Notify,
}

impl ResourceRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            payload: Payload::Empty,
            resource_id: None,
            query: Vec::new(),
            notify: Notify::Silent,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Post, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Patch, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Put, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Delete, endpoint)
    }

    pub fn with_id(mut self, id: impl ToString) -> Self {
        self.resource_id = Some(id.to_string());
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn notify_success(mut self, text: impl Into<String>) -> Self {
        self.notify = Notify::Success(Some(text.into()));
        self
    }

    pub fn notify_default(mut self) -> Self {
        self.notify = Notify::Success(None);
        self
    }

    /// Absolute URL: `base + endpoint`, then `/{id}/` when an id is set, then the query.
    pub fn url(&self, base_api: &str) -> Result<String, ResourceError> {
        let base = base_api.trim_end_matches('/');
        let mut path = if self.endpoint.starts_with('/') || self.endpoint.is_empty() {
            self.endpoint.clone()
        } else {
            format!("/{}", self.endpoint)
        };

        if let Some(id) = &self.resource_id {
            let trimmed = path.trim_end_matches('/').len();
            path.truncate(trimmed);
            path.push('/');
            path.push_str(id);
            path.push('/');
        }

        let mut url = reqwest::Url::parse(&format!("{base}{path}"))
            .map_err(|e| ResourceError::InvalidRequest(format!("{base}{path}: {e}")))?;

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query {
                pairs.append_pair(name, value);
            }
        }

        Ok(url.into())
    }
}

/// Result of a call that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The server answered 2xx. An empty body is `Value::Null`.
    Completed(Value),
    /// The user declined the DELETE confirmation; nothing was sent.
    Declined,
}

impl Outcome {
    pub fn is_declined(&self) -> bool {
        matches!(self, Outcome::Declined)
    }

    pub fn into_body(self) -> Option<Value> {
        match self {
            Outcome::Completed(body) => Some(body),
            Outcome::Declined => None,
        }
    }
}

// =============================================================================
// 2. THE RESOURCE CLIENT
// =============================================================================

/// The one place every API call goes through.
///
/// # Architecture Note
/// Domain clients (`AuthClient`, `TodoClient`, ...) never talk to the network
/// directly. They describe a call as a [`ResourceRequest`] and hand it here, so
/// token injection, content negotiation, DELETE confirmation and user-facing
/// notifications behave the same for every endpoint.
///
/// The client is cheap to clone: every collaborator sits behind an `Arc` or a channel.
#[derive(Clone)]
pub struct ResourceClient {
    base_api: Arc<str>,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
    confirmations: ConfirmationClient,
}

impl ResourceClient {
    pub fn new(
        base_api: impl Into<String>,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
        confirmations: ConfirmationClient,
    ) -> Self {
        let base_api: String = base_api.into();
        Self {
            base_api: Arc::from(base_api.trim_end_matches('/')),
            transport,
            tokens,
            notifier,
            confirmations,
        }
    }

    pub fn base_api(&self) -> &str {
        &self.base_api
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Performs the request and reports the result to the notifier.
    ///
    /// Failures are notified with [`ResourceError::user_message`] and then
    /// returned, so callers can still react to them.
    #[tracing::instrument(skip(self, request), fields(method = %request.method, endpoint = %request.endpoint))]
    pub async fn execute(&self, request: ResourceRequest) -> Result<Outcome, ResourceError> {
        let notify = request.notify.clone();

        match self.dispatch(request).await {
            Ok(Outcome::Completed(body)) => {
                if let Notify::Success(text) = notify {
                    self.notifier
                        .success(text.as_deref().unwrap_or(DEFAULT_SUCCESS_TEXT));
                }
                Ok(Outcome::Completed(body))
            }
            Ok(Outcome::Declined) => {
                info!("Declined by user");
                Ok(Outcome::Declined)
            }
            Err(e) => {
                warn!(error = %e, "Request failed");
                self.notifier.error(&e.user_message());
                Err(e)
            }
        }
    }

    /// Like [`execute`](Self::execute) but decodes the body. `Declined` maps to `None`.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        request: ResourceRequest,
    ) -> Result<Option<T>, ResourceError> {
        match self.execute(request).await? {
            Outcome::Declined => Ok(None),
            Outcome::Completed(body) => serde_json::from_value(body).map(Some).map_err(|e| {
                warn!(error = %e, "Unexpected response shape");
                ResourceError::Decode(e.to_string())
            }),
        }
    }

    async fn dispatch(&self, request: ResourceRequest) -> Result<Outcome, ResourceError> {
        if request.method == Method::Delete {
            let confirmed = self
                .confirmations
                .request_confirmation(Some(DELETE_PROMPT))
                .await?;
            if !confirmed {
                return Ok(Outcome::Declined);
            }
        }

        let http = self.prepare(request)?;
        debug!(url = %http.url, "Sending");

        let response = self.transport.send(http).await?;
        info!(status = response.status, "Response");

        Self::into_outcome(response)
    }

    /// Turns a [`ResourceRequest`] into a wire-level request with all headers set.
    pub fn prepare(&self, request: ResourceRequest) -> Result<HttpRequest, ResourceError> {
        let url = request.url(&self.base_api)?;

        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if let Some(token) = self.tokens.get()? {
            headers.push((
                "Authorization".to_string(),
                format!("Bearer {}", token.value()),
            ));
        }
        headers.push((
            "Content-Type".to_string(),
            request.payload.content_type().to_string(),
        ));

        Ok(HttpRequest {
            method: request.method,
            url,
            headers,
            payload: request.payload,
        })
    }

    fn into_outcome(response: HttpResponse) -> Result<Outcome, ResourceError> {
        if !response.is_success() {
            return Err(ResourceError::Api {
                status: response.status,
                body: ApiErrorBody::from_bytes(&response.body),
            });
        }

        if response.body.is_empty() {
            return Ok(Outcome::Completed(Value::Null));
        }

        let body = serde_json::from_slice(&response.body).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&response.body).into_owned())
        });
        Ok(Outcome::Completed(body))
    }
}
