use crate::clients::api_client::ApiClient;
use crate::clients::error::UserError;
use crate::framework::{Payload, ResourceClient, ResourceError, ResourceRequest};
use crate::model::{ProfileUpdate, User};
use async_trait::async_trait;
use tracing::{debug, instrument};

pub const PROFILE_SUCCESS: &str = "Profile updated successfully!";

/// Client for the signed-in user's profile.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient,
}

impl UserClient {
    pub fn new(inner: ResourceClient) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ApiClient for UserClient {
    type Error = UserError;

    fn inner(&self) -> &ResourceClient {
        &self.inner
    }
}

impl UserClient {
    /// The current user. `None` without a session; the server is not asked then.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<Option<User>, UserError> {
        if self
            .inner
            .tokens()
            .get()
            .map_err(ResourceError::from)?
            .is_none()
        {
            debug!("No session, skipping profile fetch");
            return Ok(None);
        }

        self.send_json(ResourceRequest::get("/users/me/")).await
    }

    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), UserError> {
        self.send(
            ResourceRequest::patch("/users/me/")
                .with_payload(Payload::Multipart(update.to_multipart()))
                .notify_success(PROFILE_SUCCESS),
        )
        .await?;
        Ok(())
    }
}
