//! Minimal stand-ins for the out-of-scope collaborators, just enough for
//! the binary to run end-to-end and for the cascade to be exercised in
//! tests. None of these implement real ActivityPub/WebFinger/Mastodon
//! semantics — every method declines (`None`) or returns an empty result.

use crate::collaborators::{
    ActivityPubHandler, HtmlHandler, InstanceTimeline, MastoApiHandler, OAuthHandler,
    QueueProcessor, UserDirectory, UserProfile, WebFingerHandler,
};
use crate::http::{Request, Response};
use crate::job::QueueItem;

pub struct DecliningWebFinger;
impl WebFingerHandler for DecliningWebFinger {
    fn get(&self, _req: &Request, _path: &str) -> Option<Response> {
        None
    }
}

pub struct DecliningActivityPub;
impl ActivityPubHandler for DecliningActivityPub {
    fn get(&self, _req: &Request, _path: &str) -> Option<Response> {
        None
    }
    fn post(&self, _req: &Request, _path: &str) -> Option<Response> {
        None
    }
}

pub struct DecliningOAuth;
impl OAuthHandler for DecliningOAuth {
    fn get(&self, _req: &Request, _path: &str) -> Option<Response> {
        None
    }
    fn post(&self, _req: &Request, _path: &str) -> Option<Response> {
        None
    }
}

pub struct DecliningMastoApi;
impl MastoApiHandler for DecliningMastoApi {
    fn get(&self, _req: &Request, _path: &str) -> Option<Response> {
        None
    }
    fn post(&self, _req: &Request, _path: &str) -> Option<Response> {
        None
    }
    fn put(&self, _req: &Request, _path: &str) -> Option<Response> {
        None
    }
}

pub struct DecliningHtml;
impl HtmlHandler for DecliningHtml {
    fn get(&self, _req: &Request, _path: &str) -> Option<Response> {
        None
    }
    fn post(&self, _req: &Request, _path: &str) -> Option<Response> {
        None
    }
}

pub struct EmptyInstanceTimeline;
impl InstanceTimeline for EmptyInstanceTimeline {
    fn render(&self, _offset: usize, _limit: usize) -> String {
        "<html><body><p>No posts yet.</p></body></html>".to_string()
    }
}

/// In-memory user directory, for tests and for running the binary without a
/// real user store wired in.
pub struct InMemoryUserDirectory {
    users: Vec<UserProfile>,
}

impl InMemoryUserDirectory {
    pub fn new(users: Vec<UserProfile>) -> Self {
        Self { users }
    }

    pub fn empty() -> Self {
        Self { users: Vec::new() }
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn user_list(&self) -> Vec<String> {
        self.users.iter().map(|u| u.uid.clone()).collect()
    }

    fn user_profile(&self, uid: &str) -> Option<UserProfile> {
        self.users.iter().find(|u| u.uid == uid).cloned()
    }
}

/// Queue processor that reports no pending work. Real delivery/purge logic
/// is out of scope here; `process_queue_item` just logs at debug level.
pub struct NoopQueueProcessor;
impl QueueProcessor for NoopQueueProcessor {
    fn process_user_queue(&self, _uid: &str) -> usize {
        0
    }
    fn process_queue(&self) -> usize {
        0
    }
    fn process_queue_item(&self, item: &QueueItem) {
        tracing::debug!(kind = %item.kind, "process_queue_item (stub, no-op)");
    }
}
