//! Registry of locally running engine processes.
//!
//! Each in-flight local execution owns exactly one entry, keyed by task id,
//! from the moment it claims the id until its process has exited. A second
//! claim on a held id is refused. A stop request flags the entry and
//! signals the process; the finishing execution reads the flag back when it
//! releases its own entry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tokio::sync::Notify;

/// How a [`ProcessHandle::terminate`] call reached the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// SIGTERM was delivered.
    Graceful,
    /// The owning execution was asked to kill the child.
    Forced,
}

/// Stoppable reference to one engine process.
///
/// Cloning shares the pid slot and the kill signal, so a clone handed out by
/// [`ProcessRegistry::mark_stopped`] reaches the execution that owns the
/// process. The pid is unset until the process has been spawned.
#[derive(Debug, Clone, Default)]
pub struct ProcessHandle {
    pid: Arc<OnceLock<u32>>,
    kill: Arc<Notify>,
}

impl ProcessHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid.get().copied()
    }

    /// Record the spawned process id. Later calls are ignored.
    pub(crate) fn set_pid(&self, pid: u32) {
        let _ = self.pid.set(pid);
    }

    /// Whether both handles refer to the same registration.
    pub fn same_as(&self, other: &ProcessHandle) -> bool {
        Arc::ptr_eq(&self.kill, &other.kill)
    }

    /// Resolves once a forced kill has been requested.
    ///
    /// A request made before this is awaited is not lost.
    pub async fn kill_requested(&self) {
        self.kill.notified().await;
    }

    /// Ask the process to terminate.
    ///
    /// Sends SIGTERM where possible and falls back to a forced kill,
    /// performed by the execution holding the child, when the signal
    /// cannot be delivered or the process has not been spawned yet.
    pub fn terminate(&self) -> Termination {
        if let Some(pid) = self.pid() {
            if send_sigterm(pid) {
                return Termination::Graceful;
            }
            tracing::warn!(pid, "SIGTERM could not be delivered, forcing kill");
        }
        self.kill.notify_one();
        Termination::Forced
    }
}

#[cfg(unix)]
fn send_sigterm(pid: u32) -> bool {
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return false;
    };
    // SAFETY: kill(2) has no memory-safety preconditions; a stale pid only
    // yields ESRCH.
    unsafe { libc::kill(pid, libc::SIGTERM) == 0 }
}

#[cfg(not(unix))]
fn send_sigterm(_pid: u32) -> bool {
    false
}

#[derive(Debug)]
struct Entry {
    handle: ProcessHandle,
    stopped: bool,
}

/// Concurrency-safe map from task id to its running process.
///
/// Every operation takes the single internal lock for its whole duration.
/// Instances are independent: the orchestrator and a remote runner each
/// own their own.
#[derive(Debug, Default)]
pub struct ProcessRegistry {
    entries: Mutex<HashMap<String, Entry>>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `task_id` for one execution.
    ///
    /// Returns `None` while another execution still holds the id. The
    /// claim is released by [`Registration::clear`], or on drop.
    pub fn register(&self, task_id: &str) -> Option<Registration<'_>> {
        let mut entries = self.entries();
        if entries.contains_key(task_id) {
            tracing::warn!(task_id, "Task already has a running process");
            return None;
        }
        let handle = ProcessHandle::new();
        entries.insert(
            task_id.to_string(),
            Entry {
                handle: handle.clone(),
                stopped: false,
            },
        );
        Some(Registration {
            registry: self,
            task_id: task_id.to_string(),
            handle,
            released: false,
        })
    }

    /// Flag the task as stopped and return its handle for signalling.
    ///
    /// Returns `None` when nothing is registered, e.g. because the process
    /// already exited.
    pub fn mark_stopped(&self, task_id: &str) -> Option<ProcessHandle> {
        let mut entries = self.entries();
        let entry = entries.get_mut(task_id)?;
        entry.stopped = true;
        Some(entry.handle.clone())
    }

    /// Pid of the task's process, once it has been spawned.
    pub fn pid_of(&self, task_id: &str) -> Option<u32> {
        self.entries().get(task_id).and_then(|entry| entry.handle.pid())
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.entries().contains_key(task_id)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove the entry only if it still belongs to `handle`.
    fn remove_own(&self, task_id: &str, handle: &ProcessHandle) -> bool {
        let mut entries = self.entries();
        match entries.get(task_id) {
            Some(entry) if entry.handle.same_as(handle) => {
                entries.remove(task_id).is_some_and(|entry| entry.stopped)
            }
            _ => false,
        }
    }

    fn is_stopped(&self, task_id: &str, handle: &ProcessHandle) -> bool {
        self.entries()
            .get(task_id)
            .is_some_and(|entry| entry.stopped && entry.handle.same_as(handle))
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // The map holds no invariants a panicking holder could break.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One execution's claim on a task id.
#[derive(Debug)]
pub struct Registration<'a> {
    registry: &'a ProcessRegistry,
    task_id: String,
    handle: ProcessHandle,
    released: bool,
}

impl Registration<'_> {
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn handle(&self) -> &ProcessHandle {
        &self.handle
    }

    /// Whether a stop has been requested for this claim so far.
    pub fn stop_requested(&self) -> bool {
        self.registry.is_stopped(&self.task_id, &self.handle)
    }

    /// Release the claim and report whether a stop was requested.
    pub fn clear(mut self) -> bool {
        self.released = true;
        self.registry.remove_own(&self.task_id, &self.handle)
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        if !self.released {
            self.registry.remove_own(&self.task_id, &self.handle);
        }
    }
}
