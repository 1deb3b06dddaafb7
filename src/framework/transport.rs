//! The network seam.
//!
//! [`ResourceClient`](crate::framework::ResourceClient) only ever sees a
//! [`Transport`]. Production code plugs in [`HttpTransport`] (reqwest); tests
//! plug in [`MockTransport`](crate::framework::mock::MockTransport).

use crate::framework::core::{FormPart, Method, Payload, PartValue};
use crate::framework::error::ResourceError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

/// A fully prepared request: absolute URL, all headers, body.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub payload: Payload,
}

impl HttpRequest {
    /// Header lookup, case-insensitive on the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Path component of the URL, without query.
    pub fn path(&self) -> String {
        reqwest::Url::parse(&self.url)
            .map(|url| url.path().to_string())
            .unwrap_or_default()
    }

    /// Query component of the URL, if any.
    pub fn query(&self) -> Option<String> {
        reqwest::Url::parse(&self.url)
            .ok()
            .and_then(|url| url.query().map(str::to_string))
    }
}

/// Status and raw body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends prepared requests. Only connection-level failures are errors; any
/// HTTP status is a successful `send`.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ResourceError>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a client whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ResourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ResourceError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    fn multipart(parts: &[FormPart]) -> Result<Form, ResourceError> {
        let mut form = Form::new();
        for part in parts {
            form = match &part.value {
                PartValue::Text(text) => form.text(part.name.clone(), text.clone()),
                PartValue::File(file) => {
                    let body = Part::bytes(file.bytes.clone())
                        .file_name(file.file_name.clone())
                        .mime_str(&file.mime)
                        .map_err(|e| ResourceError::InvalidRequest(e.to_string()))?;
                    form.part(part.name.clone(), body)
                }
            };
        }
        Ok(form)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ResourceError> {
        let mut builder = self
            .client
            .request(Self::method(request.method), &request.url);

        let is_multipart = matches!(request.payload, Payload::Multipart(_));
        for (name, value) in &request.headers {
            // reqwest writes its own multipart Content-Type with the boundary
            if is_multipart && name.eq_ignore_ascii_case("content-type") {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match &request.payload {
            Payload::Empty => builder,
            Payload::Json(value) => builder.json(value),
            Payload::UrlEncoded(fields) => builder.form(fields),
            Payload::Multipart(form) => builder.multipart(Self::multipart(form.parts())?),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ResourceError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ResourceError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
