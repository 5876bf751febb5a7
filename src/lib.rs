//! `snac-core` — the concurrency and request-dispatch substrate of a
//! small, single-node ActivityPub server.
//!
//! This crate implements the job queue, worker pool, acceptor, connection
//! handler, handler cascade, background driver, and lifecycle. ActivityPub
//! semantics, HTTP signature verification, WebFinger resolution, the
//! Mastodon API, HTML rendering, and persistent storage are out of scope —
//! they're represented as narrow collaborator traits in [`collaborators`],
//! with minimal stand-ins in [`stubs`].

pub mod acceptor;
pub mod cascade;
pub mod collaborators;
pub mod config;
pub mod connection;
pub mod context;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod http;
pub mod job;
pub mod lifecycle;
pub mod statics;
pub mod stubs;
pub mod worker;
