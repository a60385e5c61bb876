//! Repeating-task thread pool.
//!
//! Tasks live in one shared FIFO queue. A worker pops a task, runs one pass of
//! it and, if the task asks to be repeated, pushes it back at the end of the
//! queue. A task therefore never runs on two workers at once.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

mod thread_pool;

pub use self::thread_pool::{default_thread_count, ThreadPool, HARDWARE_THREADS};

/// What the pool should do with a task after one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Enqueue the task again.
    Repeat,
    /// Drop the task.
    Retire,
}

pub trait JobTask: Send + 'static {
    fn run(&mut self) -> JobStatus;
}

struct JobQueueState<T> {
    jobs: VecDeque<T>,
    running: usize,
}

struct JobQueueShared<T> {
    state: Mutex<JobQueueState<T>>,
    job_available: Condvar,
    idle: Condvar,
    must_finish: AtomicBool,
}

pub(crate) struct JobQueue<T> {
    shared: Arc<JobQueueShared<T>>,
}

impl<T> Clone for JobQueue<T> {
    fn clone(&self) -> Self {
        JobQueue {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: JobTask> JobQueue<T> {
    pub(crate) fn new() -> JobQueue<T> {
        JobQueue {
            shared: Arc::new(JobQueueShared {
                state: Mutex::new(JobQueueState {
                    jobs: VecDeque::with_capacity(16),
                    running: 0,
                }),
                job_available: Condvar::new(),
                idle: Condvar::new(),
                must_finish: AtomicBool::new(false),
            }),
        }
    }

    pub(crate) fn push(&self, job: T) {
        let mut state = self.shared.state.lock();
        state.jobs.push_back(job);
        self.shared.job_available.notify_one();
    }

    /// Blocks until a job is available and marks it running, or returns `None`
    /// once the queue has been told to finish.
    pub(crate) fn pop_blocking(&self) -> Option<T> {
        let mut state = self.shared.state.lock();
        loop {
            if self.shared.must_finish.load(Ordering::Acquire) {
                return None;
            }
            if let Some(job) = state.jobs.pop_front() {
                state.running += 1;
                return Some(job);
            }
            self.shared.job_available.wait(&mut state);
        }
    }

    /// Hands back a job popped with `pop_blocking` after one pass.
    pub(crate) fn complete(&self, job: T, status: JobStatus) {
        let mut state = self.shared.state.lock();
        state.running -= 1;

        match status {
            JobStatus::Repeat => {
                state.jobs.push_back(job);
                self.shared.job_available.notify_one();
            },
            JobStatus::Retire => {
                drop(job);
                if state.jobs.is_empty() && state.running == 0 {
                    self.shared.idle.notify_all();
                }
            },
        }
    }

    /// Used when a pass panicked and the job is lost.
    pub(crate) fn abandon(&self) {
        let mut state = self.shared.state.lock();
        state.running -= 1;
        if state.jobs.is_empty() && state.running == 0 {
            self.shared.idle.notify_all();
        }
    }

    pub(crate) fn finish(&self) {
        let _state = self.shared.state.lock();
        self.shared.must_finish.store(true, Ordering::Release);
        self.shared.job_available.notify_all();
        self.shared.idle.notify_all();
    }

    pub(crate) fn is_finishing(&self) -> bool {
        self.shared.must_finish.load(Ordering::Acquire)
    }

    pub(crate) fn len(&self) -> usize {
        self.shared.state.lock().jobs.len()
    }

    /// Waits until no job is queued or running. Returns `false` on timeout or
    /// when the queue is finishing with work left.
    pub(crate) fn wait_until_idle(&self, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        let mut state = self.shared.state.lock();

        while !(state.jobs.is_empty() && state.running == 0) {
            if self.shared.must_finish.load(Ordering::Acquire) {
                return false;
            }
            match deadline {
                Some(deadline) => {
                    if self.shared.idle.wait_until(&mut state, deadline).timed_out() {
                        return state.jobs.is_empty() && state.running == 0;
                    }
                },
                None => self.shared.idle.wait(&mut state),
            }
        }

        true
    }
}
