//! Process-scoped error types.
//!
//! Request-scoped failures never reach this type — per the connection
//! handler's contract (see [`crate::connection`]) every per-request failure
//! is converted into a [`crate::http::Response`] inline. `ServerError` only
//! covers the handful of failures that are fatal to the whole process.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind listening socket on {address}:{port}: {source}")]
    BindFailed {
        address: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create wake primitive for the job queue")]
    WakePrimitiveFailed,

    #[error("failed to load configuration: {0}")]
    Config(String),
}
