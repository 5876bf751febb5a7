//! The job queue (C1): a thread-safe FIFO of heterogeneous work with
//! priority insert and blocking wait.
//!
//! The source pairs a `pthread_mutex_t` protecting the FIFO with a counting
//! semaphore used purely as a wake signal. Rust's `Condvar` collapses both
//! into one primitive without losing the contract that matters: the mutex
//! guarding the deque is never held across a blocking wait, and urgent jobs
//! are inserted at the front. See DESIGN.md for why this is the idiomatic
//! substitution rather than a literal `libc::sem_t` binding.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};

use crate::job::Job;

/// One queue slot: a real job, or the shutdown sentinel (a wake token
/// carrying no payload).
enum Slot {
    Job(Job),
    Sentinel,
}

pub struct JobQueue {
    deque: Mutex<VecDeque<Slot>>,
    cv: Condvar,
    ready: AtomicBool,
}

impl JobQueue {
    pub fn new() -> Self {
        Self {
            deque: Mutex::new(VecDeque::new()),
            cv: Condvar::new(),
            ready: AtomicBool::new(true),
        }
    }

    /// Inserts `job` at the front (`urgent`) or back, then wakes exactly one
    /// waiter.
    pub fn post(&self, job: Job, urgent: bool) {
        let mut deque = self.deque.lock().expect("job queue mutex poisoned");
        if urgent {
            deque.push_front(Slot::Job(job));
        } else {
            deque.push_back(Slot::Job(job));
        }
        drop(deque);
        self.cv.notify_one();
    }

    /// Posts the shutdown sentinel: a wake token with no payload. Always
    /// inserted at the back — shutdown never needs to jump the queue ahead
    /// of in-flight work, it only needs every worker to eventually observe
    /// it.
    pub fn post_shutdown(&self) {
        let mut deque = self.deque.lock().expect("job queue mutex poisoned");
        deque.push_back(Slot::Sentinel);
        drop(deque);
        self.cv.notify_one();
    }

    /// Blocks until a wake token is available, then dequeues and returns the
    /// front element. `None` means the shutdown sentinel — callers must
    /// treat that as a terminate signal.
    pub fn wait(&self) -> Option<Job> {
        let mut deque = self.deque.lock().expect("job queue mutex poisoned");
        loop {
            match deque.pop_front() {
                Some(Slot::Job(job)) => return Some(job),
                Some(Slot::Sentinel) => return None,
                None => {
                    deque = self
                        .cv
                        .wait(deque)
                        .expect("job queue condvar wait poisoned");
                }
            }
        }
    }

    /// Whether the queue has been initialized. Other subsystems gate
    /// posting on this during startup/shutdown windows.
    pub fn ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Marks the queue unusable and drops whatever is left in it. Called
    /// once, under lifecycle shutdown, after every worker has been joined.
    pub fn retire(&self) {
        self.ready.store(false, Ordering::Release);
        self.deque.lock().expect("job queue mutex poisoned").clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.deque.lock().unwrap().len()
    }
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::QueueItem;
    use std::sync::Arc;
    use std::thread;

    fn item(kind: &str) -> Job {
        Job::QueueItem(QueueItem {
            kind: kind.to_string(),
            payload: serde_json::Value::Null,
        })
    }

    #[test]
    fn fifo_order_for_same_urgency() {
        let q = JobQueue::new();
        q.post(item("a"), false);
        q.post(item("b"), false);

        let first = q.wait().unwrap();
        let second = q.wait().unwrap();
        assert!(matches!(first, Job::QueueItem(ref i) if i.kind == "a"));
        assert!(matches!(second, Job::QueueItem(ref i) if i.kind == "b"));
    }

    #[test]
    fn urgent_jumps_the_queue() {
        let q = JobQueue::new();
        for _ in 0..5 {
            q.post(item("normal"), false);
        }
        q.post(item("urgent"), true);

        let first = q.wait().unwrap();
        assert!(matches!(first, Job::QueueItem(ref i) if i.kind == "urgent"));
    }

    #[test]
    fn sentinel_unblocks_a_waiter() {
        let q = Arc::new(JobQueue::new());
        let waiter = {
            let q = Arc::clone(&q);
            thread::spawn(move || q.wait())
        };

        // give the waiter a moment to block
        thread::sleep(std::time::Duration::from_millis(20));
        q.post_shutdown();

        let result = waiter.join().unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn at_most_once_consumption_under_concurrency() {
        use std::sync::atomic::AtomicUsize;

        let q = Arc::new(JobQueue::new());
        let posted = 200;
        for i in 0..posted {
            q.post(item(&format!("job-{i}")), i % 7 == 0);
        }

        let consumed = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let q = Arc::clone(&q);
            let consumed = Arc::clone(&consumed);
            handles.push(thread::spawn(move || loop {
                match q.wait() {
                    Some(_) => {
                        consumed.fetch_add(1, Ordering::SeqCst);
                    }
                    None => break,
                }
            }));
        }

        // Let all workers drain real jobs, then shut them down.
        while consumed.load(Ordering::SeqCst) < posted {
            thread::sleep(std::time::Duration::from_millis(5));
        }
        for _ in 0..handles.len() {
            q.post_shutdown();
        }
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(consumed.load(Ordering::SeqCst), posted);
    }
}
