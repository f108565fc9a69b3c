use super::*;
use crate::utils::test_server::{MockBackendServer, MockResponse};

const LISBON_REPLY: &str = r#"{"message":{"content":"Lisbon itinerary...","sender":"agent","timestamp":"2024-01-01T00:00:00Z"}}"#;

fn unused_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

#[tokio::test]
async fn repeated_failed_probes_skip_the_chat_request() {
    let server = MockBackendServer::start(vec![
        ("GET", "/health", MockResponse::status(503)),
        ("POST", "/api/chat", MockResponse::json(200, LISBON_REPLY)),
    ])
    .await;
    let backend = HttpBackend::new(&server.base_url());

    for _ in 0..2 {
        let result = backend.send_message("Plan a trip to Lisbon", "u1").await;
        assert_eq!(result, Err(BackendError::Unavailable));
    }

    assert_eq!(server.request_count("/health").await, 2);
    assert_eq!(server.request_count("/api/chat").await, 0);
    assert!(!backend.is_available());
}

#[tokio::test]
async fn probe_runs_only_while_marked_unavailable() {
    let server = MockBackendServer::start(vec![
        ("GET", "/health", MockResponse::status(200)),
        ("POST", "/api/chat", MockResponse::json(200, LISBON_REPLY)),
    ])
    .await;
    let backend = HttpBackend::new(&server.base_url());

    for _ in 0..3 {
        let message = backend
            .send_message("Plan a trip to Lisbon", "u1")
            .await
            .expect("send should succeed");
        assert_eq!(message.content, "Lisbon itinerary...");
    }

    assert_eq!(server.request_count("/health").await, 1);
    assert_eq!(server.request_count("/api/chat").await, 3);
}

#[tokio::test]
async fn non_success_status_is_request_failed_with_code() {
    let server = MockBackendServer::start(vec![
        ("GET", "/health", MockResponse::status(200)),
        (
            "POST",
            "/api/chat",
            MockResponse::json(500, r#"{"detail":"Internal server error"}"#),
        ),
    ])
    .await;
    let backend = HttpBackend::new(&server.base_url());

    let err = backend
        .send_message("hello", "u1")
        .await
        .expect_err("should fail");
    assert!(matches!(
        err,
        BackendError::RequestFailed {
            status: Some(500),
            ..
        }
    ));
}

#[tokio::test]
async fn malformed_envelopes_are_request_failures() {
    let bodies = [
        "not json",
        r#"{"reply":"wrong key"}"#,
        r#"{"message":{"content":"x","sender":"agent","timestamp":"not a time"}}"#,
        r#"{"message":{"content":"x","sender":"robot","timestamp":"2024-01-01T00:00:00Z"}}"#,
    ];
    for body in bodies {
        let server = MockBackendServer::start(vec![
            ("GET", "/health", MockResponse::status(200)),
            ("POST", "/api/chat", MockResponse::json(200, body)),
        ])
        .await;
        let backend = HttpBackend::new(&server.base_url());

        let err = backend
            .send_message("hello", "u1")
            .await
            .expect_err("malformed body should fail");
        assert!(
            matches!(
                err,
                BackendError::RequestFailed {
                    status: Some(200),
                    ..
                }
            ),
            "unexpected error for {body}: {err:?}"
        );
    }
}

#[tokio::test]
async fn blank_text_fails_before_any_traffic() {
    let server = MockBackendServer::start(Vec::new()).await;
    let backend = HttpBackend::new(&server.base_url());

    assert_eq!(
        backend.send_message("  \n", "u1").await,
        Err(BackendError::EmptyMessage)
    );
    assert!(server.requests().await.is_empty());
}

#[tokio::test]
async fn get_agents_absorbs_every_failure() {
    let failing = [
        MockResponse::status(500),
        MockResponse::json(200, r#"{"success":false,"data":{"agents":[]}}"#),
        MockResponse::json(200, r#"{"agents":[{"id":"a","name":"A"}]}"#),
        MockResponse::json(200, "<html>oops</html>"),
    ];
    for response in failing {
        let server = MockBackendServer::start(vec![("GET", "/api/agents", response)]).await;
        let backend = HttpBackend::new(&server.base_url());
        assert!(backend.fetch_agents().await.is_err());
        assert!(backend.get_agents().await.is_empty());
    }

    let backend = HttpBackend::new(&unused_base_url());
    assert!(backend.get_agents().await.is_empty());
}

#[tokio::test]
async fn get_agents_returns_backend_list() {
    let server = MockBackendServer::start(vec![(
        "GET",
        "/api/agents",
        MockResponse::json(
            200,
            r##"{"success":true,"data":{"agents":[
                {"id":"orchestrator","name":"Orchestrator","type":"orchestrator","description":"Main coordinator","specialization":["Coordination","Routing"],"color":"#2563EB","icon":"Bot","active":true},
                {"id":"offers-manager","name":"Deals Manager","type":"offers","description":"Finds deals","specialization":["Deals"],"color":"#16A34A","icon":"Tag","active":false}
            ]}}"##,
        ),
    )])
    .await;
    let backend = HttpBackend::new(&server.base_url());

    let agents = backend.get_agents().await;
    let ids: Vec<&str> = agents.iter().map(|agent| agent.id.as_str()).collect();
    assert_eq!(ids, vec!["orchestrator", "offers-manager"]);
    assert!(!agents[1].active);
}

#[tokio::test]
async fn switch_requires_backend_confirmation() {
    let server = MockBackendServer::start(vec![
        ("POST", "/api/llm/switch", MockResponse::json(200, r#"{"success":false}"#)),
        ("POST", "/api/llm/switch", MockResponse::status(400)),
        ("POST", "/api/llm/switch", MockResponse::json(200, r#"{"success":true}"#)),
    ])
    .await;
    let backend = HttpBackend::new(&server.base_url());

    assert_eq!(
        backend.switch_provider("google").await,
        Err(BackendError::SwitchRejected {
            provider: "google".to_string()
        })
    );
    assert!(matches!(
        backend.switch_provider("google").await,
        Err(BackendError::FetchFailed { .. })
    ));
    assert_eq!(backend.switch_provider("google").await, Ok(()));
}

#[tokio::test]
async fn providers_snapshot_tolerates_missing_optional_fields() {
    let server = MockBackendServer::start(vec![(
        "GET",
        "/api/llm/providers",
        MockResponse::json(
            200,
            r#"{"success":true,"data":{"providers":{"openai":{"available":true}},"default":"anthropic"}}"#,
        ),
    )])
    .await;
    let backend = HttpBackend::new(&server.base_url());

    let snapshot = backend.fetch_providers().await.expect("providers");
    assert_eq!(snapshot.total(), 1);
    assert_eq!(snapshot.default_key(), None);
    let openai = snapshot.get("openai").expect("openai");
    assert!(openai.models.is_empty());
    assert!(openai.status.is_empty());
}

#[test]
fn error_messages_are_descriptive() {
    assert_eq!(
        BackendError::RequestFailed {
            status: Some(502),
            reason: "non-success status".to_string()
        }
        .to_string(),
        "Request failed with status 502: non-success status"
    );
    assert_eq!(
        BackendError::FetchFailed {
            resource: "agents",
            reason: "timeout".to_string()
        }
        .to_string(),
        "Failed to fetch agents: timeout"
    );
}
