//! The worker pool (C2): N symmetric workers, each pulling one job and
//! dispatching by kind. No work-stealing, no affinity — ordering across
//! workers is not guaranteed; the urgent flag on the job queue is what
//! keeps freshly accepted connections ahead of a backlog of deferred
//! deliveries.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::connection::handle_connection;
use crate::context::Context;
use crate::job::Job;

pub const MAX_THREADS: usize = 256;

/// Determines the worker count: the configured value, else CPU count,
/// clamped to `[4, MAX_THREADS]`.
pub fn resolve_thread_count(configured: usize) -> usize {
    let n = if configured == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    } else {
        configured
    };
    n.clamp(4, MAX_THREADS)
}

/// Spawns `count` worker threads, each running [`worker_loop`]. Diagnostic
/// index is `1..count` — 0 is reserved for the background driver in the
/// source's thread table, kept here purely as a naming convention since
/// Rust threads carry no positional slot.
pub fn spawn_workers(ctx: Arc<Context>, count: usize) -> Vec<JoinHandle<()>> {
    (1..=count)
        .map(|worker_id| {
            let ctx = Arc::clone(&ctx);
            thread::Builder::new()
                .name(format!("snac-worker-{worker_id}"))
                .spawn(move || worker_loop(worker_id, &ctx))
                .expect("failed to spawn worker thread")
        })
        .collect()
}

fn worker_loop(worker_id: usize, ctx: &Context) {
    ctx.diagnostics.debug(1, &format!("job thread {worker_id} started"));

    loop {
        match ctx.queue.wait() {
            None => break, // shutdown sentinel
            Some(Job::Connection(conn)) => handle_connection(ctx, conn),
            Some(Job::QueueItem(item)) => ctx.queue_processor.process_queue_item(&item),
        }
    }

    ctx.diagnostics.debug(1, &format!("job thread {worker_id} stopped"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_below_minimum() {
        assert_eq!(resolve_thread_count(1), 4);
    }

    #[test]
    fn clamps_above_maximum() {
        assert_eq!(resolve_thread_count(10_000), MAX_THREADS);
    }

    #[test]
    fn keeps_configured_value_in_range() {
        assert_eq!(resolve_thread_count(16), 16);
    }
}
