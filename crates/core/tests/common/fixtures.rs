//! Test fixtures for engine and orchestrator tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bh_core::config::models::EngineConfig;
use bh_core::state::registry::ProcessRegistry;
use bh_protocol::script_models::{Script, ScriptKind};
use bh_protocol::task_models::Task;
use chrono::Utc;

/// JTL content with one failed sample.
#[allow(dead_code)]
pub const JTL_WITH_FAILURE: &str = "timeStamp,elapsed,label,responseCode,success\n\
1700000000000,12,GET /,200,true\n\
1700000000100,30,GET /cart,500,false\n";

/// JTL content where every sample passed.
#[allow(dead_code)]
pub const JTL_ALL_PASSED: &str = "timeStamp,elapsed,label,responseCode,success\n\
1700000000000,12,GET /,200,true\n\
1700000000100,9,GET /cart,200,true\n";

/// Write an executable shell script to `dir/name`.
pub fn write_executable(dir: &Path, name: &str, body: &str) -> PathBuf {
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

/// A locust stand-in that writes both reports, optionally sleeps, and
/// exits with `exit_code`. Its arguments are saved to `args.txt` in the
/// working directory.
pub fn fake_locust(dir: &Path, exit_code: i32, sleep_secs: u32) -> PathBuf {
    let body = format!(
        r#"#!/bin/sh
all="$*"
csv=""
html=""
while [ $# -gt 0 ]; do
  case "$1" in
    --csv) csv="$2"; shift ;;
    --html) html="$2"; shift ;;
  esac
  shift
done
echo "$all" > "$(dirname "$html")/args.txt"
echo "Type,Name,Request Count" > "${{csv}}_stats.csv"
echo "<html>locust</html>" > "$html"
echo "fake locust done"
echo "fake locust warning" >&2
if [ {sleep_secs} -gt 0 ]; then
  sleep {sleep_secs}
fi
exit {exit_code}
"#
    );
    write_executable(dir, "fake-locust", &body)
}

/// A locust stand-in that writes both reports and runs until SIGTERM,
/// then takes `grace_secs` to shut down before exiting.
#[allow(dead_code)]
pub fn fake_slow_stopping_locust(dir: &Path, grace_secs: u32) -> PathBuf {
    let body = format!(
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
sleep 30 &
worker=$!
trap 'kill $worker 2>/dev/null; sleep {grace_secs}; exit 143' TERM
wait $worker
exit 0
"#
    );
    write_executable(dir, "fake-slow-locust", &body)
}

/// A jmeter stand-in that writes the dashboard and `jtl` as its results
/// file, then exits with `exit_code`.
#[allow(dead_code)]
pub fn fake_jmeter(dir: &Path, jtl: &str, exit_code: i32) -> PathBuf {
    let body = format!(
        r#"#!/bin/sh
all="$*"
results=""
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    -l) results="$2"; shift ;;
    -o) out="$2"; shift ;;
  esac
  shift
done
echo "$all" > "$(dirname "$results")/args.txt"
mkdir -p "$out"
echo "<html>jmeter</html>" > "$out/index.html"
cat > "$results" <<'JTL'
{jtl}JTL
exit {exit_code}
"#
    );
    write_executable(dir, "fake-jmeter", &body)
}

pub fn create_test_engine_config(reports_dir: &Path, locust: &Path, jmeter: &Path) -> EngineConfig {
    EngineConfig {
        reports_dir: reports_dir.to_path_buf(),
        locust_bin: locust.to_string_lossy().into_owned(),
        jmeter_bin: jmeter.to_string_lossy().into_owned(),
        default_host: "http://localhost:8080".to_string(),
    }
}

#[allow(dead_code)]
pub fn create_test_script(id: &str, kind: ScriptKind) -> Script {
    let now = Utc::now();
    Script {
        id: id.to_string(),
        name: format!("{id}-script"),
        description: String::new(),
        kind,
        content: match kind {
            ScriptKind::Locust => "from locust import HttpUser, task\n".to_string(),
            ScriptKind::JMeter => "<jmeterTestPlan version=\"1.2\"/>\n".to_string(),
        },
        created_at: now,
        updated_at: now,
    }
}

#[allow(dead_code)]
pub fn create_test_task(id: &str, script_id: &str) -> Task {
    Task::new(id, format!("{id}-name"), script_id, 5, 1, 1)
}

/// Wait until `task_id` has a spawned process in the registry.
#[allow(dead_code)]
pub async fn wait_until_spawned(registry: &ProcessRegistry, task_id: &str) {
    for _ in 0..250 {
        if registry.pid_of(task_id).is_some() {
            // Let the script get past its report writes.
            tokio::time::sleep(Duration::from_millis(200)).await;
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("Task {task_id} never spawned a process");
}
