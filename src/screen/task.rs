// SPDX-License-Identifier: GPL-3.0-only

//! Deferred work returned from `CameraScreen::update`
//!
//! A [`Task`] is a bag of futures that each resolve to a message. The screen
//! never awaits anything itself; whichever event loop drives it (the COSMIC
//! runtime, the terminal loop, or a test) runs the futures and feeds the
//! resulting messages back into `update`.

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use std::future::Future;

/// Pending asynchronous work producing messages of type `M`
#[must_use = "tasks do nothing unless they are run"]
pub struct Task<M> {
    futures: Vec<BoxFuture<'static, M>>,
}

impl<M: Send + 'static> Task<M> {
    /// No work
    pub fn none() -> Self {
        Self {
            futures: Vec::new(),
        }
    }

    /// Immediately yield `message`
    pub fn done(message: M) -> Self {
        Self {
            futures: vec![future::ready(message).boxed()],
        }
    }

    /// Run `future` and map its output into a message
    pub fn perform<T, F>(future: F, f: impl FnOnce(T) -> M + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            futures: vec![future.map(f).boxed()],
        }
    }

    /// Combine several tasks into one
    pub fn batch(tasks: impl IntoIterator<Item = Task<M>>) -> Self {
        Self {
            futures: tasks.into_iter().flat_map(|t| t.futures).collect(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.futures.is_empty()
    }

    /// Number of futures in the task
    pub fn len(&self) -> usize {
        self.futures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_none()
    }

    /// Wrap each produced message
    pub fn map<N: Send + 'static>(self, f: impl Fn(M) -> N + Clone + Send + 'static) -> Task<N> {
        Task {
            futures: self
                .futures
                .into_iter()
                .map(|fut| {
                    let f = f.clone();
                    fut.map(f).boxed()
                })
                .collect(),
        }
    }

    /// Hand the futures to an executor
    pub fn into_futures(self) -> Vec<BoxFuture<'static, M>> {
        self.futures
    }

    /// Run all futures concurrently and collect their messages in order
    pub async fn run(self) -> Vec<M> {
        future::join_all(self.futures).await
    }
}

impl<M> std::fmt::Debug for Task<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("futures", &self.futures.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_batch_keeps_order() {
        let task = Task::batch([
            Task::done(1),
            Task::none(),
            Task::perform(async { 20 }, |v| v + 1),
        ]);
        assert_eq!(task.len(), 2);
        assert_eq!(task.run().await, vec![1, 21]);
    }

    #[tokio::test]
    async fn test_map_wraps_messages() {
        let task = Task::done(3).map(|v| format!("msg-{v}"));
        assert_eq!(task.run().await, vec!["msg-3".to_string()]);
    }

    #[test]
    fn test_none_is_empty() {
        let task: Task<()> = Task::none();
        assert!(task.is_none());
        assert!(task.into_futures().is_empty());
    }
}
