//! Supervision of in-flight effects.
//!
//! Every effect runs under an [`EffectKey`]. The supervisor keeps at most one
//! task per key, cancels superseded work, and re-checks each completion
//! against the current task before handing it back to the owner, so a result
//! that raced past its own cancellation is dropped instead of applied.

mod handle;
mod token;

use std::collections::HashMap;
use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::Instrument;

pub use handle::{EffectKey, TaskHandle, TaskId, TaskStatus};
pub use token::CancelToken;

/// What `run` does when the key already has a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPolicy {
    /// Cancel the existing task, then start the new one.
    #[default]
    Supersede,
    /// Fail with [`SupervisorError::DuplicateInFlight`] and start nothing.
    RejectIfRunning,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SupervisorError {
    #[error("Effect '{key}' is already in flight")]
    DuplicateInFlight { key: EffectKey },
}

/// How an effect ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T, E> {
    Success(T),
    Failure(E),
    Cancelled,
}

/// Result of one task, sent back to the owner's execution context.
#[derive(Debug)]
pub struct Completion<T, E> {
    pub key: EffectKey,
    pub task: TaskId,
    pub outcome: Outcome<T, E>,
}

pub type CompletionReceiver<T, E> = mpsc::UnboundedReceiver<Completion<T, E>>;

struct TaskEntry {
    handle: TaskHandle,
    join: JoinHandle<()>,
}

/// Sends exactly one completion per task, even when the body panics or the
/// task is aborted (both report `Cancelled`).
struct CompletionGuard<T, E> {
    sender: Option<mpsc::UnboundedSender<Completion<T, E>>>,
    key: EffectKey,
    task: TaskId,
}

impl<T, E> CompletionGuard<T, E> {
    fn finish(mut self, outcome: Outcome<T, E>) {
        self.send(outcome);
    }

    fn send(&mut self, outcome: Outcome<T, E>) {
        let Some(sender) = self.sender.take() else {
            return;
        };
        let completion = Completion {
            key: self.key.clone(),
            task: self.task,
            outcome,
        };
        if sender.send(completion).is_err() {
            tracing::trace!("Completion dropped (supervisor gone)");
        }
    }
}

impl<T, E> Drop for CompletionGuard<T, E> {
    fn drop(&mut self) {
        self.send(Outcome::Cancelled);
    }
}

/// Tracks in-flight effects per key.
///
/// Completions do not touch any state; they are queued on the channel
/// returned by [`TaskSupervisor::new`] and must be passed through
/// [`TaskSupervisor::accept`] by the owner.
pub struct TaskSupervisor<T, E> {
    runtime: Handle,
    sender: mpsc::UnboundedSender<Completion<T, E>>,
    tasks: HashMap<EffectKey, TaskEntry>,
    next_id: u64,
}

impl<T: Send + 'static, E: Send + 'static> TaskSupervisor<T, E> {
    pub fn new(runtime: Handle) -> (Self, CompletionReceiver<T, E>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let supervisor = Self {
            runtime,
            sender,
            tasks: HashMap::new(),
            next_id: 0,
        };
        (supervisor, receiver)
    }

    /// Start `work` under `key`.
    ///
    /// `work` is called immediately with the task's [`CancelToken`]; the
    /// future it returns runs on the supervisor's runtime.
    ///
    /// # Errors
    /// Returns [`SupervisorError::DuplicateInFlight`] when `key` already has
    /// a task and `policy` is [`RunPolicy::RejectIfRunning`].
    pub fn run<W, Fut>(
        &mut self,
        key: EffectKey,
        policy: RunPolicy,
        work: W,
    ) -> Result<TaskHandle, SupervisorError>
    where
        W: FnOnce(CancelToken) -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        if self.tasks.contains_key(&key) {
            match policy {
                RunPolicy::RejectIfRunning => {
                    return Err(SupervisorError::DuplicateInFlight { key });
                }
                RunPolicy::Supersede => {
                    tracing::debug!(key = %key, "Superseding in-flight effect");
                    self.cancel(&key);
                }
            }
        }

        self.next_id += 1;
        let id = TaskId(self.next_id);
        let token = CancelToken::new();
        let handle = TaskHandle::new(key.clone(), id, token.clone());

        let body = work(token.clone());
        let sender = self.sender.clone();
        let task_handle = handle.clone();
        let task_key = key.clone();
        let span = tracing::debug_span!("effect", key = %key, task = %id);

        let join = self.runtime.spawn(
            async move {
                let guard = CompletionGuard {
                    sender: Some(sender),
                    key: task_key,
                    task: id,
                };
                let result = body.await;
                let outcome = if token.is_cancelled() {
                    Outcome::Cancelled
                } else {
                    task_handle.mark_finished();
                    match result {
                        Ok(value) => Outcome::Success(value),
                        Err(error) => Outcome::Failure(error),
                    }
                };
                guard.finish(outcome);
            }
            .instrument(span),
        );

        tracing::debug!(key = %key, task = %id, "Effect started");
        self.tasks.insert(
            key,
            TaskEntry {
                handle: handle.clone(),
                join,
            },
        );
        Ok(handle)
    }
}

impl<T, E> TaskSupervisor<T, E> {
    /// Cancel and forget the task under `key`. No-op if there is none.
    pub fn cancel(&mut self, key: &EffectKey) -> bool {
        let Some(entry) = self.tasks.remove(key) else {
            return false;
        };
        entry.handle.mark_cancelled();
        entry.join.abort();
        tracing::debug!(key = %key, task = %entry.handle.id(), "Effect cancelled");
        true
    }

    /// Cancel every task. Returns how many were in flight.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.tasks.len();
        for (key, entry) in self.tasks.drain() {
            entry.handle.mark_cancelled();
            entry.join.abort();
            tracing::debug!(key = %key, task = %entry.handle.id(), "Effect cancelled");
        }
        count
    }

    /// Check a completion against the current task for its key.
    ///
    /// Returns the outcome and forgets the task when the completion belongs
    /// to it. Completions from superseded or cancelled tasks return `None`.
    pub fn accept(&mut self, completion: Completion<T, E>) -> Option<Outcome<T, E>> {
        let current = self
            .tasks
            .get(&completion.key)
            .map(|entry| entry.handle.id());

        if current != Some(completion.task) {
            tracing::debug!(
                key = %completion.key,
                task = %completion.task,
                "Discarding stale completion"
            );
            return None;
        }

        if let Some(entry) = self.tasks.remove(&completion.key) {
            if matches!(completion.outcome, Outcome::Cancelled) {
                entry.handle.mark_cancelled();
            }
        }
        Some(completion.outcome)
    }

    pub fn is_running(&self, key: &EffectKey) -> bool {
        self.tasks.contains_key(key)
    }

    pub fn handle(&self, key: &EffectKey) -> Option<&TaskHandle> {
        self.tasks.get(key).map(|entry| &entry.handle)
    }

    /// Number of tasks whose completion has not been accepted yet.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn running_keys(&self) -> Vec<EffectKey> {
        self.tasks.keys().cloned().collect()
    }
}

impl<T, E> Drop for TaskSupervisor<T, E> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
