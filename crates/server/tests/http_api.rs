//! HTTP API tests
//!
//! Requests go straight into the router via `oneshot`; no socket is opened.

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use loan_agent_config::{default_script, Settings};
use futures::StreamExt;
use loan_agent_server::{create_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app_with(settings: Settings) -> Router {
    create_router(AppState::new(settings, default_script()))
}

fn app() -> Router {
    app_with(Settings::default())
}

fn fast_app() -> Router {
    let mut settings = Settings::default();
    settings.handler.delay_ms = 0;
    settings.sequencer.time_scale = 0.0;
    app_with(settings)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// =============================================================================
// Mock loan-agent endpoint
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_loan_agent_returns_all_stages() {
    let app = app();
    let started = tokio::time::Instant::now();

    let response = send(
        &app,
        post_json(
            "/functions/v1/loan-agent",
            json!({ "userMessage": "I am John Doe, need a personal loan of 500000" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(started.elapsed() >= Duration::from_millis(1_000));
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    for key in ["master", "verification", "underwriting", "sanction"] {
        let text = body["stages"][key].as_str().unwrap();
        assert!(!text.is_empty(), "stage {} is empty", key);
    }
}

#[tokio::test]
async fn test_loan_agent_is_idempotent() {
    let app = fast_app();
    let request = || post_json("/loan-agent", json!({ "userMessage": "need a home loan" }));

    let first = body_json(send(&app, request()).await).await;
    let second = body_json(send(&app, request()).await).await;
    assert_eq!(
        serde_json::to_vec(&first["stages"]).unwrap(),
        serde_json::to_vec(&second["stages"]).unwrap()
    );

    let other = body_json(
        send(&app, post_json("/loan-agent", json!({ "userMessage": "x" }))).await,
    )
    .await;
    assert_eq!(first["stages"], other["stages"]);
}

#[tokio::test]
async fn test_loan_agent_malformed_body() {
    let app = fast_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/functions/v1/loan-agent")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
    let body = body_json(response).await;
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn test_loan_agent_accepts_any_json_except_null() {
    let app = fast_app();
    let raw = |body: &'static str| {
        Request::builder()
            .method(Method::POST)
            .uri("/loan-agent")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    };

    for body in [r#"{"userMessage": 5}"#, r#""hi""#, "[]", "{}"] {
        let response = send(&app, raw(body)).await;
        assert_eq!(response.status(), StatusCode::OK, "body {}", body);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert!(json["stages"]["sanction"].is_string());
    }

    let response = send(&app, raw("null")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = fast_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/functions/v1/loan-agent")
        .header(header::ORIGIN, "https://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "apikey, content-type")
        .body(Body::empty())
        .unwrap();

    let response = send(&app, request).await;
    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
    let allowed = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    for name in ["authorization", "x-client-info", "apikey", "content-type"] {
        assert!(allowed.contains(name), "missing {} in {}", name, allowed);
    }
    assert!(body_bytes(response).await.is_empty());
}

// =============================================================================
// Chat sessions
// =============================================================================

async fn create_session(app: &Router) -> String {
    let response = send(
        app,
        Request::builder()
            .method(Method::POST)
            .uri("/api/sessions")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["processing"], false);
    assert_eq!(body["statuses"]["master"], "idle");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_chat_session_runs_to_completion() {
    let app = fast_app();
    let id = create_session(&app).await;

    let response = send(
        &app,
        post_json(
            &format!("/api/sessions/{}/messages", id),
            json!({ "content": "need a personal loan of 500000" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let mut snapshot = Value::Null;
    for _ in 0..100 {
        snapshot = body_json(send(&app, get(&format!("/api/sessions/{}", id))).await).await;
        if snapshot["processing"] == false {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(snapshot["processing"], false);
    let messages = snapshot["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 5);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[4]["agent"], "Sanction Agent");
    for key in ["master", "verification", "underwriting", "sanction"] {
        assert_eq!(snapshot["statuses"][key], "complete");
    }
}

#[tokio::test(start_paused = true)]
async fn test_chat_rejects_submission_while_busy() {
    let app = app();
    let id = create_session(&app).await;
    let uri = format!("/api/sessions/{}/messages", id);

    let first = send(&app, post_json(&uri, json!({ "content": "home loan" }))).await;
    assert_eq!(first.status(), StatusCode::ACCEPTED);

    let second = send(&app, post_json(&uri, json!({ "content": "car loan" }))).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert!(body_json(second).await["error"].is_string());

    let snapshot = body_json(send(&app, get(&format!("/api/sessions/{}", id))).await).await;
    assert_eq!(snapshot["processing"], true);
    assert_eq!(snapshot["messages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_chat_rejects_blank_message() {
    let app = fast_app();
    let id = create_session(&app).await;

    let response = send(
        &app,
        post_json(
            &format!("/api/sessions/{}/messages", id),
            json!({ "content": "   " }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_chat_malformed_body_is_json_error() {
    let app = fast_app();
    let id = create_session(&app).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/sessions/{}/messages", id))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{bad"))
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let body = body_json(response).await;
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));

    // Nothing was submitted
    let snapshot = body_json(send(&app, get(&format!("/api/sessions/{}", id))).await).await;
    assert!(snapshot["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_session_limit() {
    let mut settings = Settings::default();
    settings.sessions.max_sessions = 1;
    let app = app_with(settings);

    create_session(&app).await;
    let response = send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/api/sessions")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_session_event_stream() {
    let app = fast_app();
    let id = create_session(&app).await;

    let response = send(&app, get(&format!("/api/sessions/{}/events", id))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));
    let mut stream = response.into_body().into_data_stream();

    let submitted = send(
        &app,
        post_json(
            &format!("/api/sessions/{}/messages", id),
            json!({ "content": "need a personal loan of 500000" }),
        ),
    )
    .await;
    assert_eq!(submitted.status(), StatusCode::ACCEPTED);

    let mut names: Vec<String> = Vec::new();
    let mut buffer = String::new();
    let read = async {
        while let Some(chunk) = stream.next().await {
            buffer.push_str(&String::from_utf8_lossy(&chunk.unwrap()));
            while let Some(end) = buffer.find("\n\n") {
                let frame: String = buffer.drain(..end + 2).collect();
                if let Some(name) = frame.lines().find_map(|l| l.strip_prefix("event:")) {
                    names.push(name.trim().to_string());
                }
            }
            if names.last().map(String::as_str) == Some("sequence_completed") {
                break;
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), read)
        .await
        .expect("sequence completed within timeout");

    let mut expected = vec!["sequence_started"];
    for _ in 0..4 {
        expected.extend(["status_changed", "message_appended", "status_changed"]);
    }
    expected.push("sequence_completed");
    assert_eq!(names, expected);
}

#[tokio::test]
async fn test_unknown_and_deleted_sessions() {
    let app = fast_app();
    let response = send(
        &app,
        get("/api/sessions/00000000-0000-0000-0000-000000000000"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let id = create_session(&app).await;
    let uri = format!("/api/sessions/{}", id);
    let response = send(
        &app,
        Request::builder()
            .method(Method::DELETE)
            .uri(&uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(send(&app, get(&uri)).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_agents() {
    let app = fast_app();
    let body = body_json(send(&app, get("/api/agents")).await).await;
    let labels: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["label"].as_str().unwrap())
        .collect();
    assert_eq!(
        labels,
        vec![
            "Master Agent",
            "Verification Agent",
            "Underwriting Agent",
            "Sanction Agent"
        ]
    );
}

// =============================================================================
// Dashboard
// =============================================================================

#[tokio::test]
async fn test_list_loans() {
    let app = fast_app();
    let body = body_json(send(&app, get("/api/loans")).await).await;

    assert_eq!(body["summary"]["total_applications"], 156);
    let loans = body["loans"].as_array().unwrap();
    assert_eq!(loans.len(), 3);
    assert_eq!(loans[0]["id"], "LOAN-001");
    assert_eq!(loans[0]["amount_display"], "₹5,00,000");
    assert_eq!(loans[0]["status_label"], "Sanctioned");
    assert_eq!(loans[0]["sanction_letter_available"], true);
    assert_eq!(loans[1]["sanction_letter_available"], false);
    assert_eq!(loans[2]["sanction_letter_available"], false);
}

#[tokio::test]
async fn test_sanction_letter_download() {
    let app = fast_app();

    let response = send(&app, get("/api/loans/LOAN-001/sanction-letter")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("sanction-letter-LOAN-001.txt"));
    let letter = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(letter.contains("John Doe"));

    let response = send(&app, get("/api/loans/LOAN-002/sanction-letter")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(&app, get("/api/loans/LOAN-999/sanction-letter")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_and_disabled_metrics() {
    let app = fast_app();
    let body = body_json(send(&app, get("/health")).await).await;
    assert_eq!(body["status"], "healthy");

    let response = send(&app, get("/metrics")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
