use chrono::{Duration as ChronoDuration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use todo_admin::confirm::{self, FixedPrompt};
use todo_admin::framework::mock::MockTransport;
use todo_admin::framework::{
    MultipartForm, Notification, Outcome, Payload, RecordingNotifier, ResourceClient,
    ResourceError, ResourceRequest,
};
use todo_admin::session::{AuthToken, MemoryTokenStore, TokenStore};

const BASE: &str = "https://todo.example.com/api";

/// A `ResourceClient` over a mock transport, with a running broker that
/// answers every confirmation with `confirm`.
fn client_with(
    tokens: MemoryTokenStore,
    confirm: bool,
) -> (ResourceClient, Arc<MockTransport>, Arc<RecordingNotifier>) {
    let mock = MockTransport::new();
    let notifier = Arc::new(RecordingNotifier::new());
    let (broker, confirmations) = confirm::new(8);
    tokio::spawn(broker.run(Arc::new(FixedPrompt(confirm))));

    let client = ResourceClient::new(
        BASE,
        mock.clone(),
        Arc::new(tokens),
        notifier.clone(),
        confirmations,
    );
    (client, mock, notifier)
}

fn signed_in() -> MemoryTokenStore {
    MemoryTokenStore::with_token("todo_admin_token", AuthToken::issue("abc123", false))
}

fn anonymous() -> MemoryTokenStore {
    MemoryTokenStore::new("todo_admin_token")
}

// =============================================================================
// HEADERS
// =============================================================================

#[tokio::test]
async fn test_bearer_token_attached_when_signed_in() {
    let (client, mock, _) = client_with(signed_in(), true);
    mock.expect_get("/api/users/me/").return_json(200, json!({ "id": 1 }));

    client.execute(ResourceRequest::get("/users/me/")).await.unwrap();

    let request = mock.last_request().unwrap();
    assert_eq!(request.header("authorization"), Some("Bearer abc123"));
    assert_eq!(request.header("Accept"), Some("application/json"));
    mock.verify();
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let (client, mock, _) = client_with(anonymous(), true);
    mock.expect_get("/api/todos/").return_json(200, json!({ "results": [] }));

    client.execute(ResourceRequest::get("/todos/")).await.unwrap();

    assert_eq!(mock.last_request().unwrap().header("Authorization"), None);
}

#[tokio::test]
async fn test_expired_token_is_not_sent() {
    let expired = AuthToken::new("stale", Utc::now() - ChronoDuration::hours(1));
    let tokens = MemoryTokenStore::with_token("todo_admin_token", expired);
    assert!(tokens.get().unwrap().is_none());

    let (client, mock, _) = client_with(tokens, true);
    mock.expect_get("/api/todos/").return_json(200, json!({ "results": [] }));

    client.execute(ResourceRequest::get("/todos/")).await.unwrap();

    assert_eq!(mock.last_request().unwrap().header("Authorization"), None);
}

#[tokio::test]
async fn test_content_type_follows_payload() {
    let (client, mock, _) = client_with(signed_in(), true);
    mock.expect_post("/api/todos/").return_json(201, json!({ "id": 9, "title": "x" }));
    mock.expect_post("/api/auth/reset-password/").return_body(200, "");

    let form = MultipartForm::new().text("title", "x");
    client
        .execute(ResourceRequest::post("/todos/").with_payload(Payload::Multipart(form)))
        .await
        .unwrap();
    client
        .execute(
            ResourceRequest::post("/auth/reset-password/")
                .with_payload(Payload::Json(json!({ "email": "a@b.c" }))),
        )
        .await
        .unwrap();

    let requests = mock.requests();
    assert_eq!(requests[0].header("Content-Type"), Some("multipart/form-data"));
    assert_eq!(requests[1].header("Content-Type"), Some("application/json"));
}

#[tokio::test]
async fn test_url_encoded_payload_header() {
    let (client, mock, _) = client_with(signed_in(), true);
    mock.expect_post("/api/auth/token/").return_json(200, json!({}));

    let fields = vec![
        ("grant_type".to_string(), "password".to_string()),
        ("username".to_string(), "alice".to_string()),
    ];
    client
        .execute(ResourceRequest::post("/auth/token/").with_payload(Payload::UrlEncoded(fields.clone())))
        .await
        .unwrap();

    let request = mock.last_request().unwrap();
    assert_eq!(
        request.header("Content-Type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(request.payload, Payload::UrlEncoded(fields));
    mock.verify();
}

#[tokio::test]
async fn test_query_pairs_are_encoded() {
    let (client, mock, _) = client_with(signed_in(), true);
    mock.expect_get("/api/todos/").return_json(200, json!({ "results": [] }));

    client
        .execute(
            ResourceRequest::get("/todos/")
                .with_query("search", "buy milk")
                .with_query("todo_date", ""),
        )
        .await
        .unwrap();

    assert_eq!(
        mock.last_request().unwrap().query().as_deref(),
        Some("search=buy+milk&todo_date=")
    );
}

// =============================================================================
// DELETE CONFIRMATION
// =============================================================================

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let (client, mock, notifier) = client_with(signed_in(), false);

    let outcome = client
        .execute(ResourceRequest::delete("/todos").with_id(5).notify_default())
        .await
        .unwrap();

    assert!(outcome.is_declined());
    assert!(mock.requests().is_empty());
    assert!(notifier.events().is_empty());
    mock.verify();
}

#[tokio::test]
async fn test_confirmed_delete_is_sent() {
    let (client, mock, notifier) = client_with(signed_in(), true);
    mock.expect_delete("/api/todos/5/").return_body(204, "");

    let outcome = client
        .execute(ResourceRequest::delete("/todos").with_id(5).notify_default())
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Completed(Value::Null));
    assert_eq!(notifier.last(), Some(Notification::Success("Success!".into())));
    mock.verify();
}

#[tokio::test]
async fn test_declined_delete_decodes_to_none() {
    let (client, mock, _) = client_with(signed_in(), false);

    let body: Option<Value> = client
        .execute_json(ResourceRequest::delete("/todos/").with_id(1))
        .await
        .unwrap();

    assert!(body.is_none());
    mock.verify();
}

// =============================================================================
// RESPONSES AND NOTIFICATIONS
// =============================================================================

#[tokio::test]
async fn test_custom_success_text() {
    let (client, mock, notifier) = client_with(signed_in(), true);
    mock.expect_patch("/api/users/me/").return_json(200, json!({ "id": 1 }));

    client
        .execute(ResourceRequest::patch("/users/me/").notify_success("Profile updated successfully!"))
        .await
        .unwrap();

    assert_eq!(
        notifier.events(),
        vec![Notification::Success("Profile updated successfully!".into())]
    );
}

#[tokio::test]
async fn test_silent_by_default() {
    let (client, mock, notifier) = client_with(signed_in(), true);
    mock.expect_get("/api/users/me/").return_json(200, json!({ "id": 1 }));

    client.execute(ResourceRequest::get("/users/me/")).await.unwrap();

    assert!(notifier.events().is_empty());
}

#[tokio::test]
async fn test_detail_message_is_shown() {
    let (client, mock, notifier) = client_with(signed_in(), true);
    mock.expect_post("/api/auth/login/")
        .return_json(401, json!({ "detail": "Invalid credentials" }));

    let err = client
        .execute(ResourceRequest::post("/auth/login/"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.is_access_denied());
    assert_eq!(notifier.last(), Some(Notification::Error("Invalid credentials".into())));
}

#[tokio::test]
async fn test_detail_wins_over_message() {
    let (client, mock, notifier) = client_with(signed_in(), true);
    mock.expect_post("/api/todos/")
        .return_json(400, json!({ "message": "second", "detail": "first" }));

    let _ = client.execute(ResourceRequest::post("/todos/")).await;

    assert_eq!(notifier.last(), Some(Notification::Error("first".into())));
}

#[tokio::test]
async fn test_message_field_is_shown() {
    let (client, mock, notifier) = client_with(signed_in(), true);
    mock.expect_post("/api/users/signup/")
        .return_json(400, json!({ "message": "Email already registered" }));

    let _ = client.execute(ResourceRequest::post("/users/signup/")).await;

    assert_eq!(
        notifier.last(),
        Some(Notification::Error("Email already registered".into()))
    );
}

#[tokio::test]
async fn test_unrecognized_error_body() {
    let (client, mock, notifier) = client_with(signed_in(), true);
    mock.expect_get("/api/todos/").return_body(500, "<html>Internal Server Error</html>");

    let err = client.execute(ResourceRequest::get("/todos/")).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(notifier.last(), Some(Notification::Error("An error occurred".into())));
}

#[tokio::test]
async fn test_transport_failure_uses_unexpected_message() {
    let (client, mock, notifier) = client_with(signed_in(), true);
    mock.expect_get("/api/todos/").return_transport_error("connection refused");

    let err = client.execute(ResourceRequest::get("/todos/")).await.unwrap_err();

    assert!(matches!(err, ResourceError::Transport(_)));
    assert_eq!(err.status(), None);
    assert_eq!(
        notifier.last(),
        Some(Notification::Error("An unexpected error occurred.".into()))
    );
}

#[tokio::test]
async fn test_plain_text_success_body() {
    let (client, mock, _) = client_with(signed_in(), true);
    mock.expect_get("/api/health/").return_body(200, "ok");

    let outcome = client.execute(ResourceRequest::get("/health/")).await.unwrap();

    assert_eq!(outcome.into_body(), Some(Value::String("ok".into())));
}

#[tokio::test]
async fn test_decode_failure_is_not_notified() {
    #[derive(Debug, serde::Deserialize)]
    #[allow(dead_code)]
    struct Strict {
        id: u64,
    }

    let (client, mock, notifier) = client_with(signed_in(), true);
    mock.expect_get("/api/users/me/").return_json(200, json!({ "name": "no id" }));

    let result: Result<Option<Strict>, _> =
        client.execute_json(ResourceRequest::get("/users/me/")).await;

    assert!(matches!(result, Err(ResourceError::Decode(_))));
    assert!(notifier.events().is_empty());
}
