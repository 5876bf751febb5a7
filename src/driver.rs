//! The background driver (C6): periodically scans per-user persistent
//! queues and the global queue, promotes due items into the job queue, and
//! schedules housekeeping (daily purge).
//!
//! Coupling the sleep interval to work done gives natural backpressure: a
//! busy system spins through queues without sleeping, an idle system polls
//! at 3s granularity.

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::context::Context;
use crate::job::{Job, QueueItem};

const IDLE_SLEEP: Duration = Duration::from_secs(3);
const FIRST_PURGE_DELAY: Duration = Duration::from_secs(10 * 60);
const PURGE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Wakes the background driver out of its idle sleep — used by shutdown to
/// cut the sleep short, mirroring the source's `sleep_mutex`/`sleep_cond`
/// pair kept separate from the job queue's own mutex: at most one of
/// `{job_mutex, sleep_mutex}` is held at a time.
#[derive(Default)]
pub struct SleepSignal {
    mutex: Mutex<()>,
    condvar: Condvar,
}

impl SleepSignal {
    pub fn new() -> Self {
        Self::default()
    }

    fn sleep(&self, ctx: &Context, duration: Duration) {
        let guard = self.mutex.lock().expect("sleep mutex poisoned");
        let _ = self
            .condvar
            .wait_timeout_while(guard, duration, |_| ctx.is_running())
            .expect("sleep condvar wait poisoned");
    }

    pub fn wake(&self) {
        let _guard = self.mutex.lock().expect("sleep mutex poisoned");
        self.condvar.notify_all();
    }
}

/// Runs the background driver loop until `ctx.is_running()` is false.
/// Intended to be the body of its own dedicated thread.
pub fn run(ctx: &Context, sleep: &SleepSignal) {
    ctx.diagnostics.log("background thread started");

    let mut next_purge = Instant::now() + FIRST_PURGE_DELAY;

    while ctx.is_running() {
        let mut cnt = 0usize;

        for uid in ctx.users.user_list() {
            if ctx.users.user_profile(&uid).is_some() {
                cnt += ctx.queue_processor.process_user_queue(&uid);
            }
        }

        cnt += ctx.queue_processor.process_queue();

        if Instant::now() > next_purge {
            next_purge = Instant::now() + PURGE_INTERVAL;
            ctx.queue.post(Job::QueueItem(QueueItem::purge()), false);
        }

        if cnt == 0 {
            sleep.sleep(ctx, IDLE_SLEEP);
        }
    }

    ctx.diagnostics.log("background thread stopped");
}
