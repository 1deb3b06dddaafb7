//! A live todo listing that follows a changing query.
//!
//! [`TodoFeed`] watches a `TodoQuery` (usually the settled output of a
//! [`Debouncer`](crate::debounce::Debouncer)) and refetches whenever it changes
//! or [`TodoFeed::refresh`] is called. A fetch still in flight when the next
//! one starts is dropped, so its response can never overwrite newer results.

use crate::clients::todo_client::TodoClient;
use crate::model::{Todo, TodoQuery};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// What the feed currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    pub loading: bool,
    /// The query `todos` belongs to.
    pub query: TodoQuery,
    pub todos: Vec<Todo>,
}

enum Trigger {
    Query,
    Refresh,
    Closed,
}

/// Handle to the feed task. Dropping it stops the feed and any fetch in flight.
pub struct TodoFeed {
    state: watch::Receiver<FeedState>,
    refresh: mpsc::UnboundedSender<()>,
    task: JoinHandle<()>,
}

impl TodoFeed {
    /// Starts fetching immediately with the current query.
    pub fn spawn(client: TodoClient, queries: watch::Receiver<TodoQuery>) -> Self {
        let (publisher, state) = watch::channel(FeedState {
            loading: true,
            ..FeedState::default()
        });
        let (refresh, refresh_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(Self::run(client, queries, refresh_rx, publisher));

        Self {
            state,
            refresh,
            task,
        }
    }

    /// Refetches with the current query, e.g. after a create or delete.
    pub fn refresh(&self) {
        let _ = self.refresh.send(());
    }

    /// Receiver for state changes.
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.clone()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> FeedState {
        self.state.borrow().clone()
    }

    async fn run(
        client: TodoClient,
        mut queries: watch::Receiver<TodoQuery>,
        mut refresh: mpsc::UnboundedReceiver<()>,
        publisher: watch::Sender<FeedState>,
    ) {
        info!("Todo feed started");
        let mut fetches = 0u64;

        loop {
            let query = queries.borrow_and_update().clone();
            publisher.send_modify(|state| state.loading = true);
            fetches += 1;
            debug!(?query, fetches, "Fetching");

            let fetch = client.list(&query);
            tokio::pin!(fetch);

            let mut closed = false;
            let todos = tokio::select! {
                biased;
                trigger = Self::next_trigger(&mut queries, &mut refresh) => match trigger {
                    Trigger::Closed => {
                        closed = true;
                        fetch.await.unwrap_or_default()
                    }
                    Trigger::Query | Trigger::Refresh => {
                        debug!("Superseded");
                        continue;
                    }
                },
                // Failures were already reported by the client.
                result = &mut fetch => result.unwrap_or_default(),
            };

            debug!(count = todos.len(), "Publishing");
            publisher.send_modify(|state| {
                state.loading = false;
                state.query = query.clone();
                state.todos = todos;
            });

            if closed {
                break;
            }
            if let Trigger::Closed = Self::next_trigger(&mut queries, &mut refresh).await {
                break;
            }
        }

        info!(fetches, "Shutdown");
    }

    async fn next_trigger(
        queries: &mut watch::Receiver<TodoQuery>,
        refresh: &mut mpsc::UnboundedReceiver<()>,
    ) -> Trigger {
        tokio::select! {
            changed = queries.changed() => match changed {
                Ok(()) => Trigger::Query,
                Err(_) => Trigger::Closed,
            },
            signal = refresh.recv() => match signal {
                Some(()) => Trigger::Refresh,
                None => Trigger::Closed,
            },
        }
    }
}

impl Drop for TodoFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}
