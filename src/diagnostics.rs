//! Diagnostics sinks, mirroring the source's `srv_log`/`srv_debug`/
//! `srv_archive`/`srv_archive_error` collaborator interface.
//!
//! The source writes these to a log file and an on-disk archive directory.
//! Here they're a narrow trait so tests can inspect what was archived
//! without touching a filesystem; the default implementation logs through
//! `tracing` and keeps a bounded in-memory ring of archive entries.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::http::{Request, Response};

#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub label: String,
    pub method: String,
    pub path: String,
    pub status: u16,
    pub at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct ArchiveErrorEntry {
    pub kind: String,
    pub message: String,
    pub at: chrono::DateTime<chrono::Utc>,
}

/// Structured diagnostics sink. `Send + Sync` so it can be shared across
/// worker threads behind an `Arc`.
pub trait Diagnostics: Send + Sync {
    fn log(&self, message: &str);
    fn debug(&self, level: u8, message: &str);
    fn archive(&self, label: &str, req: &Request, resp: &Response);
    fn archive_error(&self, kind: &str, message: &str, req: &Request);
}

const ARCHIVE_CAPACITY: usize = 1024;

/// `tracing`-backed diagnostics sink with a bounded in-memory archive,
/// matching how `OutboxDispatcher::run` logs every state transition at
/// `debug`/`error` before falling through to the next retry.
pub struct TracingDiagnostics {
    archive: Mutex<VecDeque<ArchiveEntry>>,
    archive_errors: Mutex<VecDeque<ArchiveErrorEntry>>,
}

impl TracingDiagnostics {
    pub fn new() -> Self {
        Self {
            archive: Mutex::new(VecDeque::with_capacity(ARCHIVE_CAPACITY)),
            archive_errors: Mutex::new(VecDeque::with_capacity(ARCHIVE_CAPACITY)),
        }
    }

    pub fn archived_entries(&self) -> Vec<ArchiveEntry> {
        self.archive.lock().expect("archive mutex poisoned").iter().cloned().collect()
    }

    pub fn archived_errors(&self) -> Vec<ArchiveErrorEntry> {
        self.archive_errors
            .lock()
            .expect("archive error mutex poisoned")
            .iter()
            .cloned()
            .collect()
    }

    fn push_bounded<T>(ring: &Mutex<VecDeque<T>>, entry: T) {
        let mut ring = ring.lock().expect("archive mutex poisoned");
        if ring.len() == ARCHIVE_CAPACITY {
            ring.pop_front();
        }
        ring.push_back(entry);
    }
}

impl Default for TracingDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics for TracingDiagnostics {
    fn log(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn debug(&self, level: u8, message: &str) {
        match level {
            0 => tracing::debug!("{message}"),
            1 => tracing::debug!("{message}"),
            _ => tracing::trace!("{message}"),
        }
    }

    fn archive(&self, label: &str, req: &Request, resp: &Response) {
        Self::push_bounded(
            &self.archive,
            ArchiveEntry {
                label: label.to_string(),
                method: req.method.clone(),
                path: req.raw_path.clone(),
                status: resp.status,
                at: chrono::Utc::now(),
            },
        );
    }

    fn archive_error(&self, kind: &str, message: &str, req: &Request) {
        tracing::warn!(kind, %message, path = %req.raw_path, "archived error");
        Self::push_bounded(
            &self.archive_errors,
            ArchiveErrorEntry {
                kind: kind.to_string(),
                message: message.to_string(),
                at: chrono::Utc::now(),
            },
        );
    }
}
