//! The core's remote client talking to a real runner over TCP.

#![cfg(unix)]

mod common;

use std::time::Duration;

use bh_core::config::models::RemoteConfig;
use bh_core::remote::{RemoteClient, RemoteError};
use bh_protocol::runner::RunRequest;
use bh_protocol::task_models::ExecutionOutcome;
use common::*;

async fn serve(runner: &TestRunner) -> RemoteClient {
    RemoteClient::new(RemoteConfig {
        base_url: spawn_server(runner.app()).await,
        timeout_margin: Duration::from_secs(30),
        stop_timeout: Duration::from_secs(10),
    })
}

fn run_request(task_id: &str) -> RunRequest {
    serde_json::from_value(run_body(task_id)).expect("Invalid run request")
}

#[tokio::test]
async fn test_remote_run_round_trip() {
    let runner = TestRunner::new(0);
    let client = serve(&runner).await;

    let response = client.run(&run_request("r1")).await.unwrap();

    assert_eq!(response.status, ExecutionOutcome::Finished);
    assert_eq!(response.reports.len(), 2);
}

#[tokio::test]
async fn test_remote_run_rejected() {
    let runner = TestRunner::new(0);
    let client = serve(&runner).await;
    let mut request = run_request("r2");
    request.spawn_rate = 0;

    let err = client.run(&request).await.unwrap_err();

    match err {
        RemoteError::Status { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("spawn_rate"));
        }
        other => panic!("Expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_remote_stop_of_unknown_task_is_ok() {
    let runner = TestRunner::new(0);
    let client = serve(&runner).await;

    client.stop("never-started").await.unwrap();
}

#[tokio::test]
async fn test_remote_stop_during_run() {
    let runner = TestRunner::new(30);
    let client = serve(&runner).await;

    let running = {
        let client = client.clone();
        tokio::spawn(async move { client.run(&run_request("r3")).await })
    };
    runner.wait_until_running("r3").await;
    client.stop("r3").await.unwrap();

    let response = tokio::time::timeout(Duration::from_secs(10), running)
        .await
        .expect("Run should end after stop")
        .unwrap()
        .unwrap();
    assert_eq!(response.status, ExecutionOutcome::Stopped);
}
