use bh_protocol::*;

#[test]
fn test_run_request_deserialization() {
    let json = r#"{
        "task_id": "42",
        "task_name": "checkout",
        "users_count": 10,
        "spawn_rate": 2,
        "duration_seconds": 60,
        "target_host": "https://shop.example.com",
        "jmeter_tpm": null,
        "script_type": "locust",
        "script_content": "print('hi')"
    }"#;

    let request: RunRequest = serde_json::from_str(json).expect("Failed to deserialize RunRequest");

    assert_eq!(request.task_id, "42");
    assert_eq!(request.users_count, 10);
    assert_eq!(request.spawn_rate, 2);
    assert_eq!(request.duration_seconds, 60);
    assert_eq!(request.jmeter_tpm, None);
    assert_eq!(ScriptKind::parse(&request.script_type), Some(ScriptKind::Locust));
}

#[test]
fn test_run_request_optional_fields_default() {
    // Older orchestrators omit target_host, jmeter_tpm and script_type.
    let json = r#"{
        "task_id": "7",
        "users_count": 1,
        "spawn_rate": 1,
        "duration_seconds": 1,
        "script_content": "x"
    }"#;

    let request: RunRequest = serde_json::from_str(json).expect("Failed to deserialize RunRequest");

    assert_eq!(request.task_name, "");
    assert_eq!(request.target_host, "");
    assert_eq!(request.script_type, "");
    assert!(request.jmeter_tpm.is_none());
}

#[test]
fn test_negative_numbers_still_decode() {
    let json = r#"{
        "task_id": "7",
        "users_count": -1,
        "spawn_rate": 0,
        "duration_seconds": 5,
        "script_content": "x"
    }"#;

    let request: RunRequest = serde_json::from_str(json).expect("Failed to deserialize RunRequest");
    assert_eq!(request.users_count, -1);
    assert_eq!(request.spawn_rate, 0);
}

#[test]
fn test_run_response_wire_shape() {
    let response = RunResponse {
        status: ExecutionOutcome::Stopped,
        reports: vec![ReportInfo {
            name: "checkout-report.html".to_string(),
            report_type: ReportType::Html,
            file_path: "task_42_20240101120000/report.html".to_string(),
        }],
    };

    let value = serde_json::to_value(&response).expect("Failed to serialize RunResponse");

    assert_eq!(value["status"], "stopped");
    assert_eq!(value["reports"][0]["type"], "html");
    assert_eq!(value["reports"][0]["file_path"], "task_42_20240101120000/report.html");
}

#[test]
fn test_run_response_rejects_unknown_status() {
    let json = r#"{"status": "exploded", "reports": []}"#;
    assert!(serde_json::from_str::<RunResponse>(json).is_err());
}

#[test]
fn test_unknown_report_type_is_tolerated() {
    let json = r#"{"name": "n", "type": "pdf", "file_path": "a/b.pdf"}"#;
    let info: ReportInfo = serde_json::from_str(json).expect("Failed to deserialize ReportInfo");
    assert_eq!(info.report_type, ReportType::Other);
}

#[test]
fn test_task_status_serialization() {
    let task = Task::new("t1", "smoke", "s1", 10, 2, 5).with_target_host("example.com:9090");

    let json = serde_json::to_value(&task).expect("Failed to serialize Task");
    assert_eq!(json["status"], "created");
    assert_eq!(json["target_host"], "example.com:9090");

    let back: Task = serde_json::from_value(json).expect("Failed to deserialize Task");
    assert_eq!(back, task);
}

#[test]
fn test_script_type_field_name() {
    let json = r#"{
        "id": "s1",
        "name": "plan",
        "type": "jmeter",
        "content": "<jmeterTestPlan/>",
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    }"#;

    let script: Script = serde_json::from_str(json).expect("Failed to deserialize Script");
    assert_eq!(script.kind, ScriptKind::JMeter);
    assert_eq!(script.description, "");
}

#[test]
fn test_bench_config_from_partial_toml() {
    let toml_str = r#"
reports_dir = "/tmp/reports"
runner_url = "  "
"#;

    let config: BenchConfig = toml::from_str(toml_str).expect("Failed to parse BenchConfig");

    assert_eq!(config.reports_dir, "/tmp/reports");
    assert_eq!(config.locust_bin, DEFAULT_LOCUST_BIN);
    assert_eq!(config.default_host, DEFAULT_TARGET_HOST);
    // Blank runner URL means local mode.
    assert_eq!(config.runner_url(), None);
}
