//! Integration test: the execution proxy driving the real HTTP backend.
//!
//! The stub runner tests bind a local axum server. The live test needs
//! `SNIPBOX_RUNNER_URL` and `SNIPBOX_RUNNER_API_KEY` pointing at a real runner.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::post;
use axum::{Json, Router};
use snipbox_core::SecretString;
use snipbox_runner::{
    ExecutionOutcome, ExecutionProxy, FailureKind, HttpRunner, Language, RunnerConfig,
};

async fn stub_runner(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub runner");
    let addr = listener.local_addr().expect("stub runner address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/api/run")
}

fn proxy_for(endpoint: String, timeout: Duration) -> ExecutionProxy {
    let config = RunnerConfig::new(endpoint, SecretString::new("integration-key"))
        .with_timeout(timeout)
        .with_retries(1);
    let runner = HttpRunner::new(&config).expect("runner client");
    ExecutionProxy::new(Arc::new(runner), config.timeout, config.retries)
}

#[tokio::test]
async fn stdin_reaches_runner_and_output_is_passed_through() {
    async fn echo_stdin(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
        let stdin = body["stdin"].as_str().unwrap_or_default().to_owned();
        Json(serde_json::json!({ "stdout": stdin, "stderr": "warning: unused\n" }))
    }
    let endpoint = stub_runner(Router::new().route("/api/run", post(echo_stdin))).await;
    let proxy = proxy_for(endpoint, Duration::from_secs(2));

    let outcome = proxy
        .execute(Language::Python, "print(input())", "hello from stdin\n")
        .await;

    assert_eq!(
        outcome,
        ExecutionOutcome::Completed {
            stdout: "hello from stdin\n".to_owned(),
            stderr: "warning: unused\n".to_owned(),
        }
    );
}

#[tokio::test]
async fn slow_runner_yields_timeout_outcome() {
    async fn slow() -> Json<serde_json::Value> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Json(serde_json::json!({ "stdout": "", "stderr": "" }))
    }
    let endpoint = stub_runner(Router::new().route("/api/run", post(slow))).await;
    let proxy = proxy_for(endpoint, Duration::from_millis(100));

    let outcome = proxy.execute(Language::C, "int main(){}", "").await;

    assert!(
        matches!(outcome, ExecutionOutcome::Failed { kind: FailureKind::Timeout, .. }),
        "expected timeout outcome, got {outcome:?}"
    );
}

#[tokio::test]
async fn html_error_page_yields_malformed_outcome() {
    async fn html() -> &'static str {
        "<html>gateway error</html>"
    }
    let endpoint = stub_runner(Router::new().route("/api/run", post(html))).await;
    let proxy = proxy_for(endpoint, Duration::from_secs(2));

    let outcome = proxy.execute(Language::JavaScript, "1", "").await;

    assert!(
        matches!(outcome, ExecutionOutcome::Failed { kind: FailureKind::Malformed, .. }),
        "expected malformed outcome, got {outcome:?}"
    );
}

/// Smoke test against a live runner.
#[tokio::test]
#[ignore = "requires SNIPBOX_RUNNER_URL and SNIPBOX_RUNNER_API_KEY"]
async fn live_runner_executes_python() {
    let endpoint = std::env::var("SNIPBOX_RUNNER_URL").expect("SNIPBOX_RUNNER_URL set");
    let key = std::env::var("SNIPBOX_RUNNER_API_KEY").expect("SNIPBOX_RUNNER_API_KEY set");
    let config = RunnerConfig::new(endpoint, SecretString::new(key));
    let runner = HttpRunner::new(&config).expect("runner client");
    let proxy = ExecutionProxy::new(Arc::new(runner), config.timeout, config.retries);

    let outcome = proxy.execute(Language::Python, "print(6 * 7)", "").await;

    match outcome {
        ExecutionOutcome::Completed { stdout, .. } => assert_eq!(stdout.trim(), "42"),
        other => panic!("live runner failed: {other:?}"),
    }
}
