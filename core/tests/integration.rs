//! Full lifecycle tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every consumer
//! operation over real HTTP through `HttpApiClient`. Validates that option
//! building, transport and response conversion work end-to-end.

use std::sync::Arc;

use resource_consumer::{
    ApiResponse, CallOptions, CancellationToken, ClientConfig, ConsumerConfig, ConsumerError, CreateUser,
    HttpApiClient, ResourceConsumer, UpdateUser, User, UsersConsumer,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct WhoAmI {
    authenticated: bool,
}

async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}")
}

fn http_client(base_url: &str, token: Option<&str>) -> Arc<HttpApiClient> {
    let mut config = ClientConfig::new(base_url).unwrap();
    if let Some(token) = token {
        config = config.with_bearer_token(token);
    }
    Arc::new(HttpApiClient::new(config).unwrap())
}

#[tokio::test]
async fn crud_lifecycle() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();

    let base = spawn_server().await;
    let client = http_client(&base, None);
    let users = UsersConsumer::from_consumer(ResourceConsumer::with_config(
        client,
        ConsumerConfig {
            prefix: "users".to_string(),
            log_request: true,
            log_response: true,
        },
    ));
    let cancel = CancellationToken::new();

    // Step 1: list, should be empty.
    let listed = users.list(&cancel).await.unwrap().into_result().unwrap();
    assert!(listed.is_empty(), "expected empty list");

    // Step 2: create a user.
    let input = CreateUser {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
    };
    let created = users.create(&input, &cancel).await.unwrap().into_result().unwrap();
    assert_eq!(created.name, "Ada");
    assert!(created.active);
    let id = created.id;

    // Step 3: get the created user.
    let fetched = users.get(id, &cancel).await.unwrap();
    assert_eq!(fetched, ApiResponse::Payload(created.clone()));

    // Step 4: partial update.
    let update = UpdateUser {
        email: Some("ada@lovelace.dev".to_string()),
        ..Default::default()
    };
    let updated = users.update(id, &update, &cancel).await.unwrap().into_result().unwrap();
    assert_eq!(updated.name, "Ada");
    assert_eq!(updated.email, "ada@lovelace.dev");

    // Step 5: list, should have one item.
    let listed = users.list(&cancel).await.unwrap().into_result().unwrap();
    assert_eq!(listed, vec![updated]);

    // Step 6: delete.
    let deleted = users.delete(id, &cancel).await.unwrap();
    assert_eq!(deleted, ApiResponse::Payload(()));

    // Step 7: get after delete returns a problem and no payload.
    let (payload, problem) = users.get(id, &cancel).await.unwrap().into_parts();
    assert!(payload.is_none());
    let problem = problem.unwrap();
    assert_eq!(problem.status, Some(404));
    assert_eq!(problem.title.as_deref(), Some("Not Found"));

    // Step 8: delete again is still a problem.
    let again = users.delete(id, &cancel).await.unwrap();
    assert_eq!(again.problem().and_then(|p| p.status), Some(404));
}

#[tokio::test]
async fn validation_problem_passes_through() {
    let base = spawn_server().await;
    let users = UsersConsumer::new(http_client(&base, None));

    let input = CreateUser {
        name: String::new(),
        email: "nobody@example.com".to_string(),
    };
    let out = users.create(&input, &CancellationToken::new()).await.unwrap();
    let problem = out.problem().unwrap();
    assert_eq!(problem.status, Some(422));
    assert_eq!(problem.detail.as_deref(), Some("name must not be empty"));
}

#[tokio::test]
async fn missing_body_is_rejected_locally() {
    let base = spawn_server().await;
    let consumer = ResourceConsumer::new(http_client(&base, None), "users");

    let err = consumer
        .create::<User, _>(None::<CreateUser>, CallOptions::default(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ConsumerError::MissingRequestBody));

    let listed = consumer
        .get_all::<User>(CallOptions::default(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(listed.payload().map(Vec::len), Some(0));
}

#[tokio::test]
async fn upload_avatar_round_trip() {
    let base = spawn_server().await;
    let users = UsersConsumer::new(http_client(&base, None));

    let receipt = users
        .upload_avatar(vec![0u8; 1024], "avatar.png", &CancellationToken::new())
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(receipt.file_name, "avatar.png");
    assert_eq!(receipt.size, 1024);
}

#[tokio::test]
async fn anonymous_calls_skip_credentials() {
    let base = spawn_server().await;
    let consumer = ResourceConsumer::new(http_client(&base, Some("secret")), "users");
    let cancel = CancellationToken::new();

    let authed = consumer
        .get::<WhoAmI>("", CallOptions::default().override_uri("whoami"), &cancel)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert!(authed.authenticated);

    let anonymous = consumer
        .get::<WhoAmI>("", CallOptions::anonymous().override_uri("whoami"), &cancel)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert!(!anonymous.authenticated);
}

#[tokio::test]
async fn cancelled_before_call() {
    let base = spawn_server().await;
    let users = UsersConsumer::new(http_client(&base, None));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = users.list(&cancel).await.unwrap_err();
    assert!(matches!(err, ConsumerError::Cancelled));
}

#[tokio::test]
async fn unreachable_server_is_a_problem() {
    // Bind then drop so the port is closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let users = UsersConsumer::new(http_client(&format!("http://{addr}"), None));
    let out = users.list(&CancellationToken::new()).await.unwrap();
    assert_eq!(out.problem().and_then(|p| p.status), Some(503));
}
