//! Worker pool and handles for work scheduled onto it.
//!
//! A scheduled job owns every buffer it touches. [`JobHandle::complete`] blocks
//! until the job has run and hands those buffers back, so a buffer can never
//! be reused while a worker still holds it.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use rayon::ThreadPool;

use crate::error::ConfigError;

/// Build the worker pool. `threads == 0` lets rayon pick its default.
pub fn build_pool(threads: usize) -> Result<Arc<ThreadPool>, ConfigError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("voxel-conway-{i}"))
        .build()?;
    Ok(Arc::new(pool))
}

/// Handle to a job running on the worker pool.
#[must_use = "a scheduled job must be completed to recover its buffers"]
pub struct JobHandle<T> {
    receiver: mpsc::Receiver<thread::Result<T>>,
}

impl<T: Send + 'static> JobHandle<T> {
    /// Spawn `job` onto `pool` and return immediately.
    pub fn spawn<F>(pool: &ThreadPool, job: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (sender, receiver) = mpsc::sync_channel(1);
        pool.spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(job));
            // The handle may already be gone if its owner is unwinding.
            let _ = sender.send(result);
        });
        JobHandle { receiver }
    }

    /// Block until the job finishes and return its output.
    /// A panic inside the job is resumed on the calling thread.
    pub fn complete(self) -> T {
        match self.receiver.recv() {
            Ok(Ok(output)) => output,
            Ok(Err(payload)) => panic::resume_unwind(payload),
            Err(_) => panic!("worker dropped a scheduled job without reporting back"),
        }
    }
}

/// At most one outstanding job of a given kind.
///
/// Scheduling into an occupied slot is a logic fault and panics.
pub struct JobSlot<T> {
    name: &'static str,
    handle: Option<JobHandle<T>>,
}

impl<T: Send + 'static> JobSlot<T> {
    pub fn new(name: &'static str) -> Self {
        JobSlot { name, handle: None }
    }

    pub fn is_scheduled(&self) -> bool {
        self.handle.is_some()
    }

    /// Store a freshly spawned job.
    ///
    /// # Panics
    /// If a previous job in this slot has not been completed.
    pub fn schedule(&mut self, handle: JobHandle<T>) {
        assert!(
            self.handle.is_none(),
            "{} scheduled while a previous schedule is still outstanding",
            self.name
        );
        self.handle = Some(handle);
    }

    /// Wait for the outstanding job, if any.
    pub fn complete(&mut self) -> Option<T> {
        self.handle.take().map(JobHandle::complete)
    }
}
