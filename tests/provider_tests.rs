// tests for the http completion provider against a local stand-in server

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    routing::post,
};
use studyhub::{
    ChatCompletions, CompletionProvider, ResponseType, Tutor, TutorConfig, TutorError,
};

#[derive(Default)]
struct Seen {
    auth: Option<String>,
    body: Option<serde_json::Value>,
}

type Shared = Arc<Mutex<Seen>>;

// serve `app` on a random local port and return its completions url
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1/chat/completions")
}

async fn completions(
    State(seen): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    let mut seen = seen.lock().unwrap();
    seen.auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    seen.body = Some(body);

    Json(serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": "Try thinking about slopes." } }]
    }))
}

fn request() -> studyhub::CompletionRequest {
    Tutor::new(TutorConfig::new(Some("k".to_string()))).request("Explain limits", Some("calculus"))
}

#[tokio::test]
async fn test_sends_openai_shaped_request() {
    let seen = Shared::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(seen.clone());
    let url = spawn(app).await;

    let provider = ChatCompletions::new(url);
    let body = provider.complete("secret", &request()).await.unwrap();
    assert!(body.get("choices").is_some());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.auth.as_deref(), Some("Bearer secret"));

    let sent = seen.body.as_ref().unwrap();
    assert_eq!(sent["model"], "llama-3.1-8b-instant");
    assert_eq!(sent["temperature"], 0.7);
    assert_eq!(sent["max_tokens"], 1024);
    assert_eq!(sent["messages"][0]["role"], "system");
    assert_eq!(sent["messages"][1]["role"], "user");
    assert_eq!(sent["messages"][1]["content"], "Explain limits");
}

#[tokio::test]
async fn test_tutor_end_to_end() {
    let seen = Shared::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(seen);
    let url = spawn(app).await;

    let tutor = Tutor::new(TutorConfig {
        api_key: Some("secret".to_string()),
        endpoint: url,
        model: "test-model".to_string(),
    });

    let reply = tutor.answer("limits?", None).await;
    assert_eq!(reply.text, "Try thinking about slopes.");
    assert_eq!(reply.kind, ResponseType::Hint);
}

#[tokio::test]
async fn test_error_status_is_provider_error() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
    );
    let url = spawn(app).await;

    let err = ChatCompletions::new(url)
        .complete("bad", &request())
        .await
        .unwrap_err();

    match err {
        TutorError::Provider(detail) => {
            assert!(detail.contains("401"));
            assert!(detail.contains("invalid api key"));
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_body_is_provider_error() {
    let app = Router::new().route("/v1/chat/completions", post(|| async { "not json" }));
    let url = spawn(app).await;

    let err = ChatCompletions::new(url)
        .complete("k", &request())
        .await
        .unwrap_err();

    assert!(matches!(err, TutorError::Provider(_)));
}

#[tokio::test]
async fn test_unreachable_provider_answers_with_error_text() {
    // bind then drop so nothing is listening on the port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let tutor = Tutor::new(TutorConfig {
        api_key: Some("secret".to_string()),
        endpoint: format!("http://{addr}/v1/chat/completions"),
        model: "test-model".to_string(),
    });

    let reply = tutor.answer("hello", None).await;
    let prefix = "I'm experiencing technical difficulties. Please try again later. Error: ";
    assert!(reply.text.starts_with(prefix));
    assert!(reply.text.len() > prefix.len());
}

#[tokio::test]
async fn test_truncated_error_body_keeps_status_and_read_error() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // promise a longer body than we send, then hang up
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut seen = Vec::new();
        let mut buf = [0u8; 4096];
        // the json body is the last thing on the wire
        while !seen.ends_with(b"}") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            seen.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(b"HTTP/1.1 502 Bad Gateway\r\ncontent-length: 100\r\n\r\nupstream")
            .await
            .unwrap();
    });

    let err = ChatCompletions::new(format!("http://{addr}/v1/chat/completions"))
        .complete("k", &request())
        .await
        .unwrap_err();

    match err {
        TutorError::Provider(detail) => {
            assert!(detail.contains("502"));
            assert!(detail.contains("body unreadable"));
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}
