//! Narrow trait contracts for every subsystem this crate treats as an
//! external collaborator. None of these traits implement ActivityPub
//! semantics, signature verification, WebFinger resolution, the Mastodon
//! API, HTML rendering, or persistent storage — that's explicitly out of
//! scope. Each trait is object-safe and `Send + Sync` so it can be shared
//! across worker threads as `Arc<dyn Trait>`.
//!
//! A minimal stub implementation of each trait ships in [`crate::stubs`] so
//! the binary runs end-to-end without a real federation stack wired in.

use crate::http::{Request, Response};
use crate::job::QueueItem;

/// WebFinger discovery (`GET /.well-known/webfinger?resource=...`).
pub trait WebFingerHandler: Send + Sync {
    fn get(&self, req: &Request, path: &str) -> Option<Response>;
}

/// ActivityPub inbox/outbox/actor endpoints.
pub trait ActivityPubHandler: Send + Sync {
    fn get(&self, req: &Request, path: &str) -> Option<Response>;
    fn post(&self, req: &Request, path: &str) -> Option<Response>;
}

/// OAuth token issuance/authorization, feature-gated by `Config::oauth`.
pub trait OAuthHandler: Send + Sync {
    fn get(&self, req: &Request, path: &str) -> Option<Response>;
    fn post(&self, req: &Request, path: &str) -> Option<Response>;
}

/// Mastodon-compatible client API, feature-gated by `Config::mastodon_api`.
pub trait MastoApiHandler: Send + Sync {
    fn get(&self, req: &Request, path: &str) -> Option<Response>;
    fn post(&self, req: &Request, path: &str) -> Option<Response>;
    fn put(&self, req: &Request, path: &str) -> Option<Response>;
}

/// The HTML UI: user timelines, post composer, settings pages.
pub trait HtmlHandler: Send + Sync {
    fn get(&self, req: &Request, path: &str) -> Option<Response>;
    fn post(&self, req: &Request, path: &str) -> Option<Response>;
}

/// Renders the instance-wide timeline shown at `/` when
/// `show_instance_timeline` is set.
pub trait InstanceTimeline: Send + Sync {
    /// `timeline_instance_list(offset, limit)` + `html_timeline(...)`
    /// collapsed into one call — the core only needs the rendered HTML.
    fn render(&self, offset: usize, limit: usize) -> String;
}

/// Enumerates and opens local users. Backs the greeting template's
/// `%userlist%` substitution and the background driver's per-user queue
/// scan.
pub trait UserDirectory: Send + Sync {
    fn user_list(&self) -> Vec<String>;
    /// Actor URL + display name for one user, or `None` if the uid vanished
    /// between listing and opening (`user_open` returning false in the
    /// source).
    fn user_profile(&self, uid: &str) -> Option<UserProfile>;
}

#[derive(Debug, Clone)]
pub struct UserProfile {
    pub uid: String,
    pub actor_url: String,
    pub display_name: String,
}

/// Deferred work processors (`process_user_queue`, `process_queue`,
/// `process_queue_item`).
pub trait QueueProcessor: Send + Sync {
    fn process_user_queue(&self, uid: &str) -> usize;
    fn process_queue(&self) -> usize;
    fn process_queue_item(&self, item: &QueueItem);
}
