//! Owner-thread task queue.
//!
//! Background work (such as an HTTP fetch running on the tokio runtime) must
//! not touch UI state directly. Instead it posts a task through a
//! [`TaskSender`]; the owner of the [`TaskQueue`] runs pending tasks on its own
//! thread, handing each one mutable access to the owner's context `C`.
//!
//! ```
//! use horizon_lookup_core::TaskQueue;
//!
//! let queue = TaskQueue::<Vec<u32>>::new();
//! let sender = queue.sender();
//!
//! std::thread::spawn(move || {
//!     sender.post(|items| items.push(7)).unwrap();
//! })
//! .join()
//! .unwrap();
//!
//! let mut items = Vec::new();
//! assert_eq!(queue.process_all(&mut items), 1);
//! assert_eq!(items, vec![7]);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender};

use crate::error::{CoreError, Result};
use crate::logging::targets;

/// A unique identifier for a posted task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Global counter for generating unique task IDs.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

/// A boxed task closure.
type BoxedTask<C> = Box<dyn FnOnce(&mut C) + Send + 'static>;

/// Internal task data.
struct TaskData<C> {
    id: TaskId,
    task: BoxedTask<C>,
}

/// A queue of tasks that run on the thread that owns it.
pub struct TaskQueue<C> {
    sender: Sender<TaskData<C>>,
    receiver: Receiver<TaskData<C>>,
}

impl<C> TaskQueue<C> {
    /// Create a new task queue.
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self { sender, receiver }
    }

    /// Get a sender that can post tasks from any thread.
    pub fn sender(&self) -> TaskSender<C> {
        TaskSender {
            sender: self.sender.clone(),
        }
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Process every task that was pending when the call started.
    ///
    /// Tasks posted while processing are left for the next call.
    /// Returns the number of tasks processed.
    pub fn process_all(&self, context: &mut C) -> usize {
        let limit = self.receiver.len();
        let mut processed = 0;
        while processed < limit {
            let Ok(task_data) = self.receiver.try_recv() else {
                break;
            };
            tracing::trace!(target: targets::TASK, task = task_data.id.as_u64(), "running task");
            (task_data.task)(context);
            processed += 1;
        }
        processed
    }
}

impl<C> Default for TaskQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for TaskQueue<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.receiver.len())
            .finish()
    }
}

/// A cloneable, thread-safe handle for posting tasks to a [`TaskQueue`].
pub struct TaskSender<C> {
    sender: Sender<TaskData<C>>,
}

impl<C> TaskSender<C> {
    /// Post a task to run on the queue owner's thread.
    ///
    /// Fails with [`CoreError::TaskQueueClosed`] once the queue is dropped.
    pub fn post<F>(&self, task: F) -> Result<TaskId>
    where
        F: FnOnce(&mut C) + Send + 'static,
    {
        let id = next_task_id();
        self.sender
            .send(TaskData {
                id,
                task: Box::new(task),
            })
            .map_err(|_| {
                tracing::debug!(target: targets::TASK, task = id.as_u64(), "task queue closed, dropping task");
                CoreError::TaskQueueClosed
            })?;
        Ok(id)
    }
}

impl<C> Clone for TaskSender<C> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<C> std::fmt::Debug for TaskSender<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskSender").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_run_in_post_order() {
        let queue = TaskQueue::<Vec<i32>>::new();
        let sender = queue.sender();
        for n in 1..=3 {
            sender.post(move |v| v.push(n)).unwrap();
        }

        assert_eq!(queue.pending_count(), 3);

        let mut values = Vec::new();
        assert_eq!(queue.process_all(&mut values), 3);
        assert_eq!(values, vec![1, 2, 3]);
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_tasks_posted_while_processing_wait() {
        let queue = TaskQueue::<Vec<&'static str>>::new();
        let sender = queue.sender();
        let again = sender.clone();
        sender
            .post(move |v| {
                v.push("first");
                again.post(|v| v.push("second")).unwrap();
            })
            .unwrap();

        let mut values = Vec::new();
        assert_eq!(queue.process_all(&mut values), 1);
        assert_eq!(values, vec!["first"]);
        assert_eq!(queue.process_all(&mut values), 1);
        assert_eq!(values, vec!["first", "second"]);
    }

    #[test]
    fn test_sender_posts_from_other_thread() {
        let queue = TaskQueue::<String>::new();
        let sender = queue.sender();

        std::thread::spawn(move || {
            sender.post(|s| s.push_str("from worker")).unwrap();
        })
        .join()
        .unwrap();

        let mut text = String::new();
        queue.process_all(&mut text);
        assert_eq!(text, "from worker");
    }

    #[test]
    fn test_sender_fails_after_queue_dropped() {
        let queue = TaskQueue::<()>::new();
        let sender = queue.sender();
        drop(queue);

        assert_eq!(sender.post(|_| {}), Err(CoreError::TaskQueueClosed));
    }

    #[test]
    fn test_task_ids_are_unique() {
        let queue = TaskQueue::<()>::new();
        let sender = queue.sender();
        let a = sender.post(|_| {}).unwrap();
        let b = sender.post(|_| {}).unwrap();
        assert_ne!(a, b);
    }
}
