use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use todo_admin::confirm::FixedPrompt;
use todo_admin::debounce::Debouncer;
use todo_admin::framework::mock::MockTransport;
use todo_admin::framework::{Notification, RecordingNotifier};
use todo_admin::model::{DateFilter, TodoQuery};
use todo_admin::runtime::AdminSystem;
use todo_admin::session::{AuthToken, MemoryTokenStore};
use tokio::sync::watch;
use tokio::time::sleep;

const BASE: &str = "https://todo.example.com/api";

fn system() -> (AdminSystem, Arc<MockTransport>, Arc<RecordingNotifier>) {
    let mock = MockTransport::new();
    let notifier = Arc::new(RecordingNotifier::new());
    let tokens = MemoryTokenStore::with_token("todo_admin_token", AuthToken::issue("abc123", false));
    let system = AdminSystem::new(
        BASE,
        mock.clone(),
        Arc::new(tokens),
        notifier.clone(),
        Arc::new(FixedPrompt(true)),
    );
    (system, mock, notifier)
}

fn page(titles: &[&str]) -> Value {
    let results: Vec<Value> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| json!({ "id": i + 1, "title": title }))
        .collect();
    json!({ "count": results.len(), "results": results })
}

fn titles(todos: &[todo_admin::model::Todo]) -> Vec<&str> {
    todos.iter().map(|todo| todo.title.as_str()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_is_discarded() {
    let (system, mock, _) = system();
    mock.expect_get("/api/todos/")
        .after(Duration::from_millis(500))
        .return_json(200, page(&["old"]));
    mock.expect_get("/api/todos/")
        .after(Duration::from_millis(10))
        .return_json(200, page(&["new"]));

    let (queries, rx) = watch::channel(TodoQuery::default());
    let feed = system.todo_feed(rx);
    let mut updates = feed.subscribe();

    // Let the first (slow) fetch get under way.
    sleep(Duration::from_millis(100)).await;
    assert_eq!(mock.requests().len(), 1);
    assert!(feed.state().loading);

    queries.send(TodoQuery::new("new", DateFilter::All)).unwrap();
    let state = updates
        .wait_for(|state| !state.loading)
        .await
        .unwrap()
        .clone();
    assert_eq!(state.query.search, "new");
    assert_eq!(titles(&state.todos), vec!["new"]);

    // Well past the point the first response would have landed.
    sleep(Duration::from_secs(1)).await;
    let state = feed.state();
    assert_eq!(titles(&state.todos), vec!["new"]);
    assert_eq!(mock.requests().len(), 2);
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_refresh_refetches_current_query() {
    let (system, mock, _) = system();
    mock.expect_get("/api/todos/").return_json(200, page(&["a"]));
    mock.expect_get("/api/todos/").return_json(200, page(&["a", "b"]));

    let (_queries, rx) = watch::channel(TodoQuery::new("x", DateFilter::All));
    let feed = system.todo_feed(rx);
    let mut updates = feed.subscribe();

    updates.wait_for(|state| !state.loading).await.unwrap();
    assert_eq!(titles(&feed.state().todos), vec!["a"]);

    feed.refresh();
    updates
        .wait_for(|state| !state.loading && state.todos.len() == 2)
        .await
        .unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].query().as_deref(), Some("search=x&todo_date="));
    mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_failed_fetch_shows_empty_list() {
    let (system, mock, notifier) = system();
    mock.expect_get("/api/todos/")
        .return_json(403, json!({ "detail": "Not allowed" }));

    let (_queries, rx) = watch::channel(TodoQuery::default());
    let feed = system.todo_feed(rx);
    let mut updates = feed.subscribe();

    let state = updates
        .wait_for(|state| !state.loading)
        .await
        .unwrap()
        .clone();

    assert!(state.todos.is_empty());
    assert_eq!(notifier.last(), Some(Notification::Error("Not allowed".into())));
}

#[tokio::test(start_paused = true)]
async fn test_debounced_search_fetches_once_settled() {
    let (system, mock, _) = system();
    mock.expect_get("/api/todos/").return_json(200, page(&["all"]));
    mock.expect_get("/api/todos/").return_json(200, page(&["abc"]));

    let (search, settled) = Debouncer::new(TodoQuery::default(), Duration::from_millis(300));
    let feed = system.todo_feed(settled);
    let mut updates = feed.subscribe();
    updates.wait_for(|state| !state.loading).await.unwrap();

    for term in ["a", "ab", "abc"] {
        search.set(TodoQuery::new(term, DateFilter::All));
        sleep(Duration::from_millis(100)).await;
    }
    // Still typing as far as the debouncer is concerned.
    assert_eq!(mock.requests().len(), 1);

    let state = updates
        .wait_for(|state| !state.loading && state.query.search == "abc")
        .await
        .unwrap()
        .clone();

    assert_eq!(titles(&state.todos), vec!["abc"]);
    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].query().as_deref(), Some("search=abc&todo_date="));
    mock.verify();
}
