use crate::clients::{AuthClient, TodoClient, TodoFeed, UserClient};
use crate::config::AppConfig;
use crate::confirm::{self, ConfirmationClient, Prompt};
use crate::framework::{HttpTransport, Notifier, ResourceClient, ResourceError, Transport};
use crate::model::TodoQuery;
use crate::runtime::guard::Redirect;
use crate::session::{FileTokenStore, TokenStore};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

/// The main runtime orchestrator for the todo admin client.
///
/// `AdminSystem` is responsible for:
/// - **Dependency Wiring**: One `ResourceClient` (transport, token store, notifier,
///   confirmation broker) shared by every domain client
/// - **Lifecycle Management**: Starting and stopping the confirmation broker
///
/// # Example
///
/// ```ignore
/// let system = AdminSystem::from_config(&config, notifier, prompt)?;
///
/// system.auth_client.login(&LoginRequest::new(email, password), false).await?;
/// let todos = system.todo_client.list(&TodoQuery::default()).await?;
///
/// // Gracefully shut down when done
/// system.shutdown().await?;
/// ```
pub struct AdminSystem {
    /// Login, signup, password reset, logout
    pub auth_client: AuthClient,

    /// The signed-in user's profile
    pub user_client: UserClient,

    /// Todo CRUD
    pub todo_client: TodoClient,

    /// Mount a dialog here to answer confirmations interactively
    pub confirmations: ConfirmationClient,

    resources: ResourceClient,

    /// Task handles for background actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl AdminSystem {
    /// Starts the confirmation broker and wires the clients.
    ///
    /// `prompt` answers confirmations while no dialog is mounted.
    pub fn new(
        base_api: impl Into<String>,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
        prompt: Arc<dyn Prompt>,
    ) -> Self {
        // Buffer size of 32 means up to 32 callers can be queued for an answer
        let (broker, confirmations) = confirm::new(32);
        let broker_handle = tokio::spawn(async move {
            broker.run(prompt).await;
        });

        let resources = ResourceClient::new(
            base_api,
            transport,
            tokens,
            notifier,
            confirmations.clone(),
        );
        info!(base_api = resources.base_api(), "System started");

        Self {
            auth_client: AuthClient::new(resources.clone()),
            user_client: UserClient::new(resources.clone()),
            todo_client: TodoClient::new(resources.clone()),
            confirmations,
            resources,
            handles: vec![broker_handle],
        }
    }

    /// Production wiring: reqwest transport and a token file under the config directory.
    pub fn from_config(
        config: &AppConfig,
        notifier: Arc<dyn Notifier>,
        prompt: Arc<dyn Prompt>,
    ) -> Result<Self, ResourceError> {
        let transport = HttpTransport::with_timeout(config.request_timeout())?;
        let tokens = FileTokenStore::new(config.token_dir(), config.token_name.clone());

        Ok(Self::new(
            config.base_api.clone(),
            Arc::new(transport),
            Arc::new(tokens),
            notifier,
            prompt,
        ))
    }

    pub fn resources(&self) -> &ResourceClient {
        &self.resources
    }

    /// `true` while an unexpired token is stored.
    pub fn is_authenticated(&self) -> bool {
        self.auth_client.is_authenticated()
    }

    /// Where a navigation to `route` should go, given the current session.
    pub fn guard(&self, route: &str) -> Redirect {
        let redirect = Redirect::decide(route, self.is_authenticated());
        if redirect != Redirect::Allow {
            info!(route, ?redirect, "Redirect");
        }
        redirect
    }

    /// A live todo listing following `queries`.
    pub fn todo_feed(&self, queries: watch::Receiver<TodoQuery>) -> TodoFeed {
        TodoFeed::spawn(self.todo_client.clone(), queries)
    }

    /// Gracefully shuts down the system.
    ///
    /// Dropping the clients closes the broker's channel; the broker then drains
    /// and exits. Clones handed out elsewhere (a running `TodoFeed`, for one)
    /// keep it alive, so drop those first.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if all background tasks shut down cleanly
    /// - `Err(String)` if any task failed or panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.auth_client);
        drop(self.user_client);
        drop(self.todo_client);
        drop(self.confirmations);
        drop(self.resources);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Background task failed: {:?}", e);
                return Err(format!("Background task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
