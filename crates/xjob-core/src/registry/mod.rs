use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use tracing::{debug, trace};

use crate::{
    error::CoreError,
    sync::{read, write},
    task::TaskRef,
};

/// Task definitions indexed by handler name.
///
/// Filled during startup, read concurrently afterwards.
/// Registering an existing name replaces the previous definition.
#[derive(Clone, Default)]
pub struct TaskRegistry {
    inner: Arc<RwLock<HashMap<String, TaskRef>>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: impl Into<String>, task: TaskRef) -> &Self {
        let name = name.into();
        let replaced = write(&self.inner).insert(name.clone(), task).is_some();
        if replaced {
            debug!(handler = %name, "task definition replaced");
        } else {
            trace!(handler = %name, "task definition registered");
        }
        self
    }

    pub fn exists(&self, name: &str) -> bool {
        read(&self.inner).contains_key(name)
    }

    pub fn lookup(&self, name: &str) -> Result<TaskRef, CoreError> {
        read(&self.inner)
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::TaskNotRegistered(name.to_string()))
    }

    pub fn len(&self) -> usize {
        read(&self.inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered handler names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = read(&self.inner).keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{TaskContext, TaskFn, TaskOutcome};

    fn task_with_msg(msg: &'static str) -> TaskRef {
        TaskFn::arc(move |_ctx: TaskContext| async move { TaskOutcome::success_with(msg) })
    }

    #[test]
    fn register_and_lookup() {
        let reg = TaskRegistry::new();
        reg.register("demo", task_with_msg("a"));

        assert!(reg.exists("demo"));
        assert!(reg.lookup("demo").is_ok());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn lookup_unknown_fails() {
        let reg = TaskRegistry::new();
        assert!(!reg.exists("ghost"));
        assert!(matches!(
            reg.lookup("ghost"),
            Err(CoreError::TaskNotRegistered(name)) if name == "ghost"
        ));
    }

    #[tokio::test]
    async fn later_registration_wins() {
        let reg = TaskRegistry::new();
        reg.register("demo", task_with_msg("first"))
            .register("demo", task_with_msg("second"));
        assert_eq!(reg.len(), 1);

        let task = reg.lookup("demo").unwrap();
        let ctx = TaskContext::new(1, 1, tokio_util::sync::CancellationToken::new());
        assert_eq!(task.run(ctx).await.msg, "second");
    }

    #[test]
    fn names_are_sorted() {
        let reg = TaskRegistry::new();
        reg.register("b", task_with_msg(""));
        reg.register("a", task_with_msg(""));
        assert_eq!(reg.names(), vec!["a".to_string(), "b".to_string()]);
        assert!(!reg.is_empty());
    }
}
