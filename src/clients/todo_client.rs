use crate::clients::api_client::ApiClient;
use crate::clients::error::TodoError;
use crate::framework::{Outcome, Payload, ResourceClient, ResourceRequest};
use crate::model::{Todo, TodoDraft, TodoId, TodoPage, TodoQuery};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, instrument};

pub const CREATE_SUCCESS: &str = "Todo created successfully!";
pub const UPDATE_SUCCESS: &str = "Todo updated successfully!";
pub const DELETE_SUCCESS: &str = "Todo deleted successfully!";

/// Client for the `/todos` collection.
#[derive(Clone)]
pub struct TodoClient {
    inner: ResourceClient,
}

impl TodoClient {
    pub fn new(inner: ResourceClient) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ApiClient for TodoClient {
    type Error = TodoError;

    fn inner(&self) -> &ResourceClient {
        &self.inner
    }
}

impl TodoClient {
    #[instrument(skip(self))]
    pub async fn list(&self, query: &TodoQuery) -> Result<Vec<Todo>, TodoError> {
        let request = query
            .pairs()
            .into_iter()
            .fold(ResourceRequest::get("/todos/"), |request, (name, value)| {
                request.with_query(name, value)
            });

        let page: Option<TodoPage> = self.send_json(request).await?;
        let todos = page.map(|page| page.results).unwrap_or_default();
        debug!(count = todos.len(), "Listed");
        Ok(todos)
    }

    /// Looks a todo up in the unfiltered listing.
    #[instrument(skip(self))]
    pub async fn find(&self, id: TodoId) -> Result<Todo, TodoError> {
        self.list(&TodoQuery::default())
            .await?
            .into_iter()
            .find(|todo| todo.id == id)
            .ok_or(TodoError::NotFound(id))
    }

    /// Creates a todo. Returns it when the server echoes it back.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&self, draft: &TodoDraft) -> Result<Option<Todo>, TodoError> {
        let outcome = self
            .send(
                ResourceRequest::post("/todos/")
                    .with_payload(Payload::Multipart(draft.to_multipart()))
                    .notify_success(CREATE_SUCCESS),
            )
            .await?;
        info!("Created");
        Ok(Self::echoed(outcome))
    }

    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: TodoId, draft: &TodoDraft) -> Result<Option<Todo>, TodoError> {
        let outcome = self
            .send(
                ResourceRequest::patch("/todos")
                    .with_id(id)
                    .with_payload(Payload::Multipart(draft.to_multipart()))
                    .notify_success(UPDATE_SUCCESS),
            )
            .await?;
        info!(%id, "Updated");
        Ok(Self::echoed(outcome))
    }

    /// Update when editing an existing todo, create otherwise.
    pub async fn save(
        &self,
        id: Option<TodoId>,
        draft: &TodoDraft,
    ) -> Result<Option<Todo>, TodoError> {
        match id {
            Some(id) => self.update(id, draft).await,
            None => self.create(draft).await,
        }
    }

    /// Deletes after asking the user. `Ok(false)` when they declined.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: TodoId) -> Result<bool, TodoError> {
        let outcome = self
            .send(
                ResourceRequest::delete("/todos")
                    .with_id(id)
                    .notify_success(DELETE_SUCCESS),
            )
            .await?;

        let deleted = !outcome.is_declined();
        info!(%id, deleted, "Delete");
        Ok(deleted)
    }

    fn echoed(outcome: Outcome) -> Option<Todo> {
        outcome
            .into_body()
            .filter(|body| !matches!(body, Value::Null))
            .and_then(|body| serde_json::from_value(body).ok())
    }
}
