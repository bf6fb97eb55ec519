use super::*;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use shared::{domain::Position, error::ReplyError};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct ServerState {
    status: StatusCode,
    body: String,
    received: Arc<Mutex<Vec<Value>>>,
}

async fn handle_submit_answer(
    State(state): State<ServerState>,
    Json(payload): Json<Value>,
) -> (StatusCode, String) {
    state.received.lock().await.push(payload);
    (state.status, state.body.clone())
}

async fn spawn_grading_server(
    status: StatusCode,
    body: impl Into<String>,
) -> Result<(String, Arc<Mutex<Vec<Value>>>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        status,
        body: body.into(),
        received: Arc::clone(&received),
    };
    let app = Router::new()
        .route("/handler/submit_answer", post(handle_submit_answer))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/handler/submit_answer"), received))
}

#[tokio::test]
async fn posts_order_as_json_array_and_decodes_incorrect_reply() {
    let (url, received) = spawn_grading_server(
        StatusCode::OK,
        json!({
            "correct": false,
            "message": "Incorrect (0.33/1.0)",
            "attempts": 1,
            "grade": 0.33,
            "remaining_attempts": 2,
            "state": [1, 0, 2],
        })
        .to_string(),
    )
    .await
    .expect("spawn server");
    let client = HttpGradingClient::from_handler_url(&url).expect("client");

    let result = client
        .submit_answer(&SubmitAnswerRequest::new(["Apple", "Banana", "Cherry"]))
        .await
        .expect("graded");

    assert!(!result.correct);
    assert_eq!(result.attempts, "1");
    assert_eq!(result.remaining_attempts, 2);
    assert_eq!(
        result.state,
        Some(vec![Position(1), Position(0), Position(2)])
    );
    assert_eq!(result.grade, Some(0.33));

    let received = received.lock().await;
    assert_eq!(received.as_slice(), &[json!(["Apple", "Banana", "Cherry"])]);
}

#[tokio::test]
async fn decodes_correct_reply_without_state() {
    let (url, _received) = spawn_grading_server(
        StatusCode::OK,
        json!({
            "correct": true,
            "message": "Correct (1.0/1.0)",
            "attempts": "1 of 3",
            "remaining_attempts": 2,
        })
        .to_string(),
    )
    .await
    .expect("spawn server");
    let client = HttpGradingClient::from_handler_url(&url).expect("client");

    let result = client
        .submit_answer(&SubmitAnswerRequest::new(["A"]))
        .await
        .expect("graded");
    assert!(result.correct);
    assert_eq!(result.attempts, "1 of 3");
    assert!(result.state.is_none());
}

#[tokio::test]
async fn server_error_body_is_surfaced_verbatim() {
    let (url, _received) = spawn_grading_server(
        StatusCode::CONFLICT,
        json!({ "error": "Max number of <b>attempts</b> reached" }).to_string(),
    )
    .await
    .expect("spawn server");
    let client = HttpGradingClient::from_handler_url(&url).expect("client");

    let err = client
        .submit_answer(&SubmitAnswerRequest::new(["A", "B"]))
        .await
        .expect_err("must fail");
    match &err {
        GradingError::Server { status, message } => {
            assert_eq!(*status, 409);
            assert_eq!(message, "Max number of <b>attempts</b> reached");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), "Max number of <b>attempts</b> reached");
}

#[tokio::test]
async fn failure_without_error_body_names_status() {
    let (url, _received) =
        spawn_grading_server(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            .await
            .expect("spawn server");
    let client = HttpGradingClient::from_handler_url(&url).expect("client");

    let err = client
        .submit_answer(&SubmitAnswerRequest::new(["A"]))
        .await
        .expect_err("must fail");
    assert!(matches!(
        err,
        GradingError::Reply(ReplyError::MissingErrorBody { status: 500 })
    ));
    assert_eq!(err.user_message(), "Submission failed (HTTP 500).");
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = HttpGradingClient::from_handler_url(&format!("http://{addr}/submit_answer"))
        .expect("client");
    let err = client
        .submit_answer(&SubmitAnswerRequest::new(["A"]))
        .await
        .expect_err("must fail");
    assert!(matches!(err, GradingError::Transport(_)), "{err:?}");
}

#[test]
fn rejects_invalid_handler_url() {
    let err = HttpGradingClient::from_handler_url("not a url")
        .err()
        .expect("must fail");
    assert!(err.to_string().contains("invalid grading handler url"));
}

#[tokio::test]
async fn unconfigured_client_never_grades() {
    let err = UnconfiguredGradingClient
        .submit_answer(&SubmitAnswerRequest::new(["A"]))
        .await
        .expect_err("must fail");
    assert!(matches!(err, GradingError::Transport(_)));
}
