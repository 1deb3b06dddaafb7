//! # Mock Transport
//!
//! Utilities for testing clients without a server.
//!
//! Script the responses with [`MockTransport::expect_get`] and friends, hand
//! the mock to a [`ResourceClient`](crate::framework::ResourceClient), then
//! inspect what was sent with [`MockTransport::requests`].

use crate::framework::core::Method;
use crate::framework::error::ResourceError;
use crate::framework::transport::{HttpRequest, HttpResponse, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// What the mock answers with.
enum Reply {
    Response(HttpResponse),
    TransportError(String),
}

/// One scripted request.
struct Expectation {
    method: Method,
    path: String,
    delay: Option<Duration>,
    reply: Reply,
}

/// A scripted [`Transport`] with expectation tracking.
///
/// Expectations are consumed in order. A request that does not match the next
/// expectation's method and path panics.
///
/// # Example
/// ```ignore
/// let mock = MockTransport::new();
/// mock.expect_get("/api/users/me/").return_json(200, json!({ "id": 1 }));
///
/// let client = ResourceClient::new(BASE, mock.clone(), tokens, notifier, confirmations);
/// // Use client in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    /// Creates a new mock with no expectations.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Expects a request with the given method and URL path.
    pub fn expect(&self, method: Method, path: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            path: path.into(),
            delay: None,
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_get(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Get, path)
    }

    pub fn expect_post(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Post, path)
    }

    pub fn expect_patch(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Patch, path)
    }

    pub fn expect_delete(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Delete, path)
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ResourceError> {
        let expectation = self.expectations.lock().unwrap().pop_front();
        self.requests.lock().unwrap().push(request.clone());

        let Some(expectation) = expectation else {
            panic!("Unexpected request: {} {}", request.method, request.url);
        };

        let path = request.path();
        if expectation.method != request.method || expectation.path != path {
            panic!(
                "Expectation mismatch: expected {} {}, got {} {}",
                expectation.method, expectation.path, request.method, path
            );
        }

        if let Some(delay) = expectation.delay {
            tokio::time::sleep(delay).await;
        }

        match expectation.reply {
            Reply::Response(response) => Ok(response),
            Reply::TransportError(message) => Err(ResourceError::Transport(message)),
        }
    }
}

/// Builder for one expectation.
pub struct ExpectationBuilder {
    method: Method,
    path: String,
    delay: Option<Duration>,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl ExpectationBuilder {
    /// Delays the reply, to simulate a slow server.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replies with a JSON body.
    pub fn return_json(self, status: u16, body: Value) {
        let body = serde_json::to_vec(&body).unwrap();
        self.push(Reply::Response(HttpResponse { status, body }));
    }

    /// Replies with a raw body.
    pub fn return_body(self, status: u16, body: impl Into<Vec<u8>>) {
        self.push(Reply::Response(HttpResponse {
            status,
            body: body.into(),
        }));
    }

    /// Fails as if the connection dropped.
    pub fn return_transport_error(self, message: impl Into<String>) {
        self.push(Reply::TransportError(message.into()));
    }

    fn push(self, reply: Reply) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation {
            method: self.method,
            path: self.path,
            delay: self.delay,
            reply,
        });
    }
}
