//! Lifecycle (C7): strictly ordered startup, signal wiring, graceful
//! shutdown.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use crate::acceptor::{self, accept_loop};
use crate::context::Context;
use crate::driver::{self, SleepSignal};
use crate::error::ServerError;
use crate::worker::{resolve_thread_count, spawn_workers};

pub struct Server {
    ctx: Arc<Context>,
    listener: std::net::TcpListener,
    sleep: Arc<SleepSignal>,
}

impl Server {
    /// Startup, strictly ordered:
    /// 1. config is assumed already read (caller constructs `Context`)
    /// 2. bind listening socket, abort on failure
    pub fn bind(ctx: Arc<Context>) -> Result<Self, ServerError> {
        let listener = acceptor::bind(&ctx.config.address, ctx.config.port)?;
        Ok(Self {
            ctx,
            listener,
            sleep: Arc::new(SleepSignal::new()),
        })
    }

    /// Installs SIGTERM/SIGINT handling. SIGPIPE is ignored automatically
    /// by Rust's default libstd socket handling on the platforms this
    /// crate targets (writes to a closed socket surface as an `EPIPE`
    /// `io::Error`, never a process-killing signal), so there's no
    /// separate step for it here — the source installs `SIG_IGN` for it
    /// explicitly because C's default disposition would kill the process.
    ///
    /// Spawns a dedicated signal-watching thread (via `signal_hook`, which
    /// does the async-signal-safe part internally and delivers the signal
    /// to this thread as an ordinary blocking read) and returns
    /// immediately; shutdown runs on that thread once a signal arrives.
    pub fn install_signal_handlers(&self) -> Result<(), ServerError> {
        let mut signals = signal_hook::iterator::Signals::new([
            signal_hook::consts::SIGTERM,
            signal_hook::consts::SIGINT,
        ])
        .map_err(|_| ServerError::WakePrimitiveFailed)?;

        let ctx = Arc::clone(&self.ctx);
        let sleep = Arc::clone(&self.sleep);
        let local_addr = self.listener.local_addr().ok();

        std::thread::Builder::new()
            .name("snac-signal-watcher".to_string())
            .spawn(move || {
                // Blocks in normal thread context — not restricted
                // signal-handler context — so it's free to touch mutexes,
                // allocate, and log.
                if signals.forever().next().is_some() {
                    ctx.diagnostics.log("termination signal received");
                    ctx.stop();
                    sleep.wake();
                    // Unblock a main thread parked in `accept()` by
                    // connecting to our own listener once.
                    if let Some(addr) = local_addr {
                        let _ = std::net::TcpStream::connect_timeout(
                            &addr,
                            std::time::Duration::from_millis(50),
                        );
                    }
                }
            })
            .expect("failed to spawn signal watcher thread");

        Ok(())
    }

    /// Spawns the background driver and `N-1` workers, then runs the
    /// accept loop on the calling thread until shutdown.
    pub fn run(self) -> std::io::Result<()> {
        let start = Instant::now();
        let thread_count = resolve_thread_count(self.ctx.config.num_threads);
        self.ctx
            .diagnostics
            .debug(0, &format!("using {thread_count} threads"));

        let driver_handle: JoinHandle<()> = {
            let ctx = Arc::clone(&self.ctx);
            let sleep = Arc::clone(&self.sleep);
            std::thread::Builder::new()
                .name("snac-background-driver".to_string())
                .spawn(move || driver::run(&ctx, &sleep))
                .expect("failed to spawn background driver thread")
        };

        let worker_count = thread_count - 1;
        let worker_handles = spawn_workers(Arc::clone(&self.ctx), worker_count);

        self.ctx.diagnostics.log(&format!(
            "httpd start {}:{} {}",
            self.ctx.config.address,
            self.ctx.config.port,
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
        ));

        accept_loop(&self.ctx, &self.listener);

        self.shutdown(worker_count, worker_handles, driver_handle);

        let uptime = start.elapsed();
        self.ctx
            .diagnostics
            .log(&format!("httpd stop (run time: {uptime:?})"));

        Ok(())
    }

    /// Graceful shutdown: stop accepting, drain workers via sentinels,
    /// wake the driver, join everyone, retire the queue.
    fn shutdown(
        &self,
        worker_count: usize,
        worker_handles: Vec<JoinHandle<()>>,
        driver_handle: JoinHandle<()>,
    ) {
        self.ctx.stop();

        for _ in 0..worker_count {
            self.ctx.queue.post_shutdown();
        }
        self.sleep.wake();

        for handle in worker_handles {
            let _ = handle.join();
        }
        let _ = driver_handle.join();

        self.ctx.queue.retire();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::*;
    use crate::config::Config;
    use crate::diagnostics::TracingDiagnostics;
    use crate::job::Job;
    use crate::stubs::*;
    use std::sync::Arc;

    fn test_context(port: u16) -> Arc<Context> {
        let config = Arc::new(
            Config::from_yaml_str(&format!(
                "host: example.test\nbase_url: https://example.test\naddress: 127.0.0.1\nport: {port}\nnum_threads: 4\n"
            ))
            .unwrap(),
        );
        Arc::new(
            crate::context::ContextBuilder::new(
                config,
                Arc::new(TracingDiagnostics::new()),
                Arc::new(InMemoryUserDirectory::empty()),
                Arc::new(EmptyInstanceTimeline),
                Arc::new(DecliningWebFinger),
                Arc::new(DecliningActivityPub),
                Arc::new(DecliningOAuth),
                Arc::new(DecliningMastoApi),
                Arc::new(DecliningHtml),
                Arc::new(NoopQueueProcessor),
            )
            .build(),
        )
    }

    #[test]
    fn shutdown_terminates_workers_within_bounded_time() {
        let ctx = test_context(0);
        let worker_count = 4;
        let handles = spawn_workers(Arc::clone(&ctx), worker_count);

        // Post some ordinary backlog first: shutdown termination must be
        // bounded independent of queue contents.
        for _ in 0..50 {
            ctx.queue.post(
                Job::QueueItem(crate::job::QueueItem::purge()),
                false,
            );
        }

        ctx.stop();
        for _ in 0..worker_count {
            ctx.queue.post_shutdown();
        }

        let start = Instant::now();
        for h in handles {
            h.join().unwrap();
        }
        assert!(start.elapsed() < std::time::Duration::from_secs(2));
    }
}
