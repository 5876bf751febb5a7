//! The heterogeneous unit of work the job queue carries.

use std::io::{Read, Write};

/// Anything the connection handler can read a request from and write a
/// response to. Implemented for `TcpStream`; tests implement it over an
/// in-memory buffer.
pub trait Connection: Read + Write + Send {
    /// Best-effort peer address for diagnostics; not all transports have one.
    fn peer_description(&self) -> String {
        "unknown peer".to_string()
    }
}

impl Connection for std::net::TcpStream {
    fn peer_description(&self) -> String {
        self.peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown peer".to_string())
    }
}

/// A structured, opaque record describing deferred work. The core never
/// interprets the payload beyond the `kind` discriminator — everything past
/// that is the concern of `process_queue_item` (see [`crate::collaborators`]).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QueueItem {
    pub kind: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl QueueItem {
    pub fn purge() -> Self {
        Self {
            kind: "purge".to_string(),
            payload: serde_json::Value::Null,
        }
    }
}

/// A unit of work pulled off the job queue by a worker.
///
/// Modeled as a tagged enum rather than an erased trait object: a
/// `Connection` job owns an OS socket handle that must be released on every
/// exit path, and erasing that behind a common interface would hide the
/// resource-ownership distinction the queue's contract depends on.
pub enum Job {
    Connection(Box<dyn Connection>),
    QueueItem(QueueItem),
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Job::Connection(c) => write!(f, "Job::Connection({})", c.peer_description()),
            Job::QueueItem(item) => write!(f, "Job::QueueItem({:?})", item),
        }
    }
}
