use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use lazy_static::lazy_static;
use log::{debug, error, info};

use super::{JobQueue, JobTask};
use crate::error::TracerError;

lazy_static! {
    pub static ref HARDWARE_THREADS: usize = num_cpus::get();
}

/// One thread is left for the display loop.
pub fn default_thread_count() -> usize {
    HARDWARE_THREADS.saturating_sub(1).max(1)
}

pub struct ThreadPool<T: JobTask> {
    job_threads: Vec<JoinHandle<()>>,
    job_queue: JobQueue<T>,
}

impl<T: JobTask> ThreadPool<T> {
    pub fn new(thread_count: usize) -> Result<ThreadPool<T>, TracerError> {
        if thread_count == 0 {
            return Err(TracerError::NoThreads);
        }

        let job_queue = JobQueue::new();
        let mut pool = ThreadPool {
            job_threads: Vec::with_capacity(thread_count),
            job_queue,
        };

        for index in 0..thread_count {
            let job_thread = JobThread {
                thread_pool_index: index,
                queue: pool.job_queue.clone(),
            };

            let handle = thread::Builder::new()
                .name(format!("tracer-worker-{}", index))
                .spawn(move || job_thread.run())
                .map_err(|cause| TracerError::ThreadSpawn { index, cause })?;

            pool.job_threads.push(handle);
        }

        info!("Thread pool: spooled up {} threads", thread_count);
        Ok(pool)
    }

    pub fn thread_count(&self) -> usize {
        self.job_threads.len()
    }

    pub fn enqueue(&self, task: T) {
        self.job_queue.push(task);
    }

    pub fn queued_jobs(&self) -> usize {
        self.job_queue.len()
    }

    /// Blocks until every task has retired.
    pub fn wait_for_jobs(&self) -> bool {
        self.job_queue.wait_until_idle(None)
    }

    /// Returns `true` if every task retired within `timeout`.
    pub fn wait_for_jobs_timeout(&self, timeout: Duration) -> bool {
        self.job_queue.wait_until_idle(Some(timeout))
    }

    /// Workers exit after their current pass; queued tasks are dropped.
    pub fn finish_and_join_all(&mut self) {
        if self.job_threads.is_empty() {
            return;
        }

        self.job_queue.finish();
        for handle in self.job_threads.drain(..) {
            if handle.join().is_err() {
                error!("Thread pool: a worker thread panicked");
            }
        }

        info!("Thread pool: all threads have exited");
    }
}

impl<T: JobTask> Drop for ThreadPool<T> {
    fn drop(&mut self) {
        self.finish_and_join_all();
    }
}

struct JobThread<T: JobTask> {
    thread_pool_index: usize,
    queue: JobQueue<T>,
}

impl<T: JobTask> JobThread<T> {
    fn run(self) {
        debug!("Job thread {} started", self.thread_pool_index);

        while let Some(mut job) = self.queue.pop_blocking() {
            match panic::catch_unwind(AssertUnwindSafe(|| job.run())) {
                Ok(status) => self.queue.complete(job, status),
                Err(_) => {
                    error!("Job thread {}: task panicked and was dropped", self.thread_pool_index);
                    self.queue.abandon();
                },
            }

            if self.queue.is_finishing() {
                break;
            }
        }

        debug!("Job thread {} stopped", self.thread_pool_index);
    }
}
