use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use super::token::CancelToken;

/// Deduplication identity of an effect: feature name plus resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EffectKey {
    feature: &'static str,
    resource: String,
}

impl EffectKey {
    pub fn new(feature: &'static str, resource: impl Into<String>) -> Self {
        Self {
            feature,
            resource: resource.into(),
        }
    }

    pub fn feature(&self) -> &'static str {
        self.feature
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }
}

impl fmt::Display for EffectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.feature, self.resource)
    }
}

/// Monotonic id of one supervised task. Never reused within a supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TaskStatus {
    Running = 0,
    /// Body returned; completion not yet accepted by the owner.
    Finished = 1,
    Cancelled = 2,
}

impl TaskStatus {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => TaskStatus::Running,
            1 => TaskStatus::Finished,
            _ => TaskStatus::Cancelled,
        }
    }
}

/// View of a supervised task.
///
/// The task itself is owned by the supervisor; a handle only observes it.
/// It stops being active once the body finishes or the task is cancelled.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    key: EffectKey,
    id: TaskId,
    status: Arc<AtomicU8>,
    token: CancelToken,
}

impl TaskHandle {
    pub(crate) fn new(key: EffectKey, id: TaskId, token: CancelToken) -> Self {
        Self {
            key,
            id,
            status: Arc::new(AtomicU8::new(TaskStatus::Running as u8)),
            token,
        }
    }

    pub fn key(&self) -> &EffectKey {
        &self.key
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn status(&self) -> TaskStatus {
        TaskStatus::from_u8(self.status.load(Ordering::SeqCst))
    }

    pub fn is_active(&self) -> bool {
        self.status() == TaskStatus::Running
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub(crate) fn mark_finished(&self) {
        let _ = self.status.compare_exchange(
            TaskStatus::Running as u8,
            TaskStatus::Finished as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }

    pub(crate) fn mark_cancelled(&self) {
        self.token.cancel();
        self.status
            .store(TaskStatus::Cancelled as u8, Ordering::SeqCst);
    }
}
