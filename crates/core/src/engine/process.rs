//! Child process supervision.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;

use crate::engine::command::EngineCommand;
use crate::engine::ExecutionError;
use crate::state::registry::Registration;

/// How a supervised process ended.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ProcessExit {
    pub success: bool,
    pub code: Option<i32>,
    /// A stop request arrived while the execution held its registration.
    pub stopped: bool,
}

/// Spawn `command` under `registration` and wait for it to exit.
///
/// The registration is released before returning, whatever the exit path.
/// A stop requested before the spawn skips the process entirely.
pub(crate) async fn run_to_exit(
    command: &EngineCommand,
    registration: Registration<'_>,
) -> Result<ProcessExit, ExecutionError> {
    let owned_id = registration.task_id().to_string();
    let task_id = owned_id.as_str();

    if registration.stop_requested() {
        tracing::info!(task_id, "Stop requested before the engine started");
        return Ok(ProcessExit {
            success: false,
            code: None,
            stopped: registration.clear(),
        });
    }

    let mut cmd = command.to_command();
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.kill_on_drop(true);

    tracing::debug!(task_id, command = %command.display(), "Spawning engine");

    let mut child = cmd.spawn().map_err(|source| ExecutionError::Spawn {
        program: command.program.clone(),
        source,
    })?;

    let handle = registration.handle().clone();
    if let Some(pid) = child.id() {
        handle.set_pid(pid);
    }

    if let Some(stdout) = child.stdout.take() {
        forward_lines(task_id.to_string(), stdout, false);
    }
    if let Some(stderr) = child.stderr.take() {
        forward_lines(task_id.to_string(), stderr, true);
    }

    let status = tokio::select! {
        status = child.wait() => status,
        () = handle.kill_requested() => {
            tracing::warn!(task_id, "Forced kill requested, killing engine process");
            if let Err(e) = child.kill().await {
                tracing::error!(task_id, error = %e, "Failed to kill engine process");
            }
            child.wait().await
        }
    };

    let stopped = registration.clear();

    let (success, code) = match status {
        Ok(status) => (status.success(), status.code()),
        Err(e) => {
            tracing::error!(task_id, error = %e, "Failed to wait for engine process");
            (false, None)
        }
    };

    Ok(ProcessExit {
        success,
        code,
        stopped,
    })
}

/// Relay engine output into the log, one event per line.
fn forward_lines<R>(task_id: String, reader: R, is_stderr: bool)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = LinesStream::new(BufReader::new(reader).lines());
        while let Some(line) = lines.next().await {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            if is_stderr {
                tracing::info!(task_id = %task_id, stream = "stderr", "{line}");
            } else {
                tracing::debug!(task_id = %task_id, stream = "stdout", "{line}");
            }
        }
    });
}
