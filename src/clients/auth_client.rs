use crate::clients::api_client::ApiClient;
use crate::clients::error::AuthError;
use crate::framework::{Payload, ResourceClient, ResourceError, ResourceRequest};
use crate::model::{LoginRequest, LoginResponse, ResetPasswordRequest, SignupRequest, ValidationError};
use crate::session::AuthToken;
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

pub const LOGIN_SUCCESS: &str = "Login successful!";
pub const SIGNUP_SUCCESS: &str = "Account created successfully!";
pub const RESET_SUCCESS: &str = "Password reset link sent to your email!";

/// Client for the authentication endpoints and the local session.
#[derive(Clone)]
pub struct AuthClient {
    inner: ResourceClient,
}

impl AuthClient {
    pub fn new(inner: ResourceClient) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ApiClient for AuthClient {
    type Error = AuthError;

    fn inner(&self) -> &ResourceClient {
        &self.inner
    }
}

impl AuthClient {
    /// Signs in and stores the token for 1 day, or 30 with `remember_me`.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(
        &self,
        request: &LoginRequest,
        remember_me: bool,
    ) -> Result<AuthToken, AuthError> {
        self.check(request.validate())?;

        let response: Option<LoginResponse> = self
            .send_json(
                ResourceRequest::post("/auth/login/")
                    .with_payload(Payload::Multipart(request.to_multipart())),
            )
            .await?;

        let Some(access) = response.and_then(|r| r.access) else {
            warn!("Login succeeded without an access token");
            return Err(AuthError::MissingToken);
        };

        let token = AuthToken::issue(access, remember_me);
        self.inner
            .tokens()
            .set(token.clone())
            .map_err(ResourceError::from)?;
        info!(remember_me, expires_at = %token.expires_at(), "Logged in");
        self.inner.notifier().success(LOGIN_SUCCESS);
        Ok(token)
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn signup(&self, request: &SignupRequest) -> Result<(), AuthError> {
        self.check(request.validate())?;

        self.send(
            ResourceRequest::post("/users/signup/")
                .with_payload(Payload::Multipart(request.to_multipart())),
        )
        .await?;

        info!("Account created");
        self.inner.notifier().success(SIGNUP_SUCCESS);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        let request = ResetPasswordRequest::new(email);
        self.check(request.validate())?;

        let body = serde_json::to_value(&request)
            .map_err(|e| ResourceError::InvalidRequest(e.to_string()))?;
        self.send(
            ResourceRequest::post("/auth/reset-password/")
                .with_payload(Payload::Json(body))
                .notify_success(RESET_SUCCESS),
        )
        .await?;
        Ok(())
    }

    /// Forgets the stored token. Nothing is sent to the server.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.inner.tokens().remove().map_err(ResourceError::from)?;
        info!("Logged out");
        Ok(())
    }

    /// `true` while an unexpired token is stored.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.inner.tokens().get(), Ok(Some(_)))
    }

    /// Reports a local validation failure the same way a server error would be.
    fn check(&self, result: Result<(), ValidationError>) -> Result<(), AuthError> {
        result.map_err(|e| {
            debug!(error = %e, "Rejected before sending");
            self.inner.notifier().error(&e.to_string());
            AuthError::Invalid(e)
        })
    }
}
