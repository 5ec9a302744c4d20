//! Shared helpers for runner integration tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use bh_core::config::models::EngineConfig;
use bh_runner::state::AppState;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// A runner whose engines are shell scripts inside a temp dir.
pub struct TestRunner {
    pub dir: TempDir,
    pub state: AppState,
}

impl TestRunner {
    /// `locust_sleep` seconds pass between writing reports and exiting.
    pub fn new(locust_sleep: u32) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let locust = write_executable(dir.path(), "fake-locust", &locust_script(locust_sleep));
        let config = EngineConfig {
            reports_dir: dir.path().join("reports"),
            locust_bin: locust.to_string_lossy().into_owned(),
            jmeter_bin: "bench-hub-missing-jmeter".to_string(),
            default_host: "http://localhost:8080".to_string(),
        };
        Self {
            state: AppState::new(config),
            dir,
        }
    }

    pub fn app(&self) -> Router {
        bh_runner::build_app(self.state.clone())
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.dir.path().join("reports")
    }

    /// Wait until `task_id` has a spawned process.
    #[allow(dead_code)]
    pub async fn wait_until_running(&self, task_id: &str) {
        for _ in 0..250 {
            if self.state.registry().pid_of(task_id).is_some() {
                // Let the script get past its report writes.
                tokio::time::sleep(Duration::from_millis(200)).await;
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("Task {task_id} never started");
    }
}

fn locust_script(sleep_secs: u32) -> String {
    format!(
        r#"#!/bin/sh
csv=""
html=""
while [ $# -gt 0 ]; do
  case "$1" in
    --csv) csv="$2"; shift ;;
    --html) html="$2"; shift ;;
  esac
  shift
done
echo "Type,Name,Request Count" > "${{csv}}_stats.csv"
echo "<html>locust</html>" > "$html"
if [ {sleep_secs} -gt 0 ]; then
  sleep {sleep_secs}
fi
exit 0
"#
    )
}

fn write_executable(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("Failed to write fake engine");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake engine executable");
    }
    path
}

/// Serve `app` on an ephemeral local port and return its base URL.
#[allow(dead_code)]
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });
    format!("http://{addr}/")
}

/// A valid locust run request body.
pub fn run_body(task_id: &str) -> Value {
    serde_json::json!({
        "task_id": task_id,
        "task_name": "smoke",
        "users_count": 5,
        "spawn_rate": 1,
        "duration_seconds": 1,
        "target_host": "",
        "script_type": "locust",
        "script_content": "from locust import HttpUser\n",
    })
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request");
    app.oneshot(request).await.expect("Request failed")
}

pub async fn post_raw(app: Router, uri: &str, body: String) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("Failed to build request");
    app.oneshot(request).await.expect("Request failed")
}

pub async fn post_json(app: Router, uri: &str, body: &Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

/// Assert an error response carries the expected status and code.
pub async fn assert_error(response: Response<Body>, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code);
    assert!(json["error"].is_string());
}
