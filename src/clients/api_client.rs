use crate::framework::{Outcome, ResourceClient, ResourceError, ResourceRequest};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Shared plumbing for the domain clients.
///
/// Each client owns a [`ResourceClient`] and its own error type; the provided
/// methods send a request and convert the failure once, through `map_error`.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// The client-specific error type.
    type Error: From<ResourceError> + Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient;

    /// Map resource errors to the client error type.
    fn map_error(e: ResourceError) -> Self::Error {
        Self::Error::from(e)
    }

    /// Send a request.
    #[tracing::instrument(skip(self, request), fields(endpoint = %request.endpoint))]
    async fn send(&self, request: ResourceRequest) -> Result<Outcome, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().execute(request).await.map_err(Self::map_error)
    }

    /// Send a request and decode the body. `None` when the user declined.
    #[tracing::instrument(skip(self, request), fields(endpoint = %request.endpoint))]
    async fn send_json<T>(&self, request: ResourceRequest) -> Result<Option<T>, Self::Error>
    where
        T: DeserializeOwned + Send + 'static,
    {
        tracing::debug!("Sending request");
        self.inner()
            .execute_json::<T>(request)
            .await
            .map_err(Self::map_error)
    }
}
