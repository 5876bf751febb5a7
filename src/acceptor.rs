//! The acceptor (C3): runs on the main thread, binds the listening socket,
//! wraps each accepted connection into an urgent job.
//!
//! The source exits its accept loop via `longjmp` out of a signal handler;
//! here a cooperative stop flag plus closing the listener does the same job
//! — the accept loop observes `accept()` return an error once the listener
//! is dropped/shut down and exits normally, with no unsafe stack unwinding
//! from signal context.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use crate::context::Context;
use crate::error::ServerError;
use crate::job::Job;

/// Read timeout applied to every accepted connection, so a slow or hanging
/// client can't pin a worker thread forever — it eventually surfaces as
/// [`crate::http::ParseError::Timeout`] and the connection is closed.
const READ_TIMEOUT: Duration = Duration::from_secs(10);

pub fn bind(address: &str, port: u16) -> Result<TcpListener, ServerError> {
    TcpListener::bind((address, port)).map_err(|source| ServerError::BindFailed {
        address: address.to_string(),
        port,
        source,
    })
}

/// Accepts connections until `ctx.is_running()` goes false or `accept`
/// fails. Each accepted connection gets a read timeout and is posted as an
/// urgent job.
pub fn accept_loop(ctx: &Arc<Context>, listener: &TcpListener) {
    while ctx.is_running() {
        match listener.accept() {
            Ok((stream, _addr)) => {
                if let Err(e) = stream.set_read_timeout(Some(READ_TIMEOUT)) {
                    tracing::debug!(error = %e, "failed to set read timeout on accepted connection");
                }
                ctx.queue.post(Job::Connection(Box::new(stream)), true);
            }
            Err(e) => {
                if ctx.is_running() {
                    tracing::debug!(error = %e, "accept failed, stopping acceptor");
                }
                break;
            }
        }
    }
}
