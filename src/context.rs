//! The server context handle: an immutable bundle of configuration and
//! collaborator references passed to every component, replacing the
//! source's process-wide mutable globals.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::collaborators::{
    ActivityPubHandler, HtmlHandler, InstanceTimeline, MastoApiHandler, OAuthHandler,
    QueueProcessor, UserDirectory, WebFingerHandler,
};
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::queue::JobQueue;

pub struct Context {
    pub config: Arc<Config>,
    pub queue: Arc<JobQueue>,
    pub diagnostics: Arc<dyn Diagnostics>,
    pub users: Arc<dyn UserDirectory>,
    pub instance_timeline: Arc<dyn InstanceTimeline>,
    pub webfinger: Arc<dyn WebFingerHandler>,
    pub activitypub: Arc<dyn ActivityPubHandler>,
    pub oauth: Arc<dyn OAuthHandler>,
    pub mastoapi: Arc<dyn MastoApiHandler>,
    pub html: Arc<dyn HtmlHandler>,
    pub queue_processor: Arc<dyn QueueProcessor>,
    running: AtomicBool,
}

pub struct ContextBuilder {
    config: Arc<Config>,
    queue: Arc<JobQueue>,
    diagnostics: Arc<dyn Diagnostics>,
    users: Arc<dyn UserDirectory>,
    instance_timeline: Arc<dyn InstanceTimeline>,
    webfinger: Arc<dyn WebFingerHandler>,
    activitypub: Arc<dyn ActivityPubHandler>,
    oauth: Arc<dyn OAuthHandler>,
    mastoapi: Arc<dyn MastoApiHandler>,
    html: Arc<dyn HtmlHandler>,
    queue_processor: Arc<dyn QueueProcessor>,
}

impl ContextBuilder {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Arc<Config>,
        diagnostics: Arc<dyn Diagnostics>,
        users: Arc<dyn UserDirectory>,
        instance_timeline: Arc<dyn InstanceTimeline>,
        webfinger: Arc<dyn WebFingerHandler>,
        activitypub: Arc<dyn ActivityPubHandler>,
        oauth: Arc<dyn OAuthHandler>,
        mastoapi: Arc<dyn MastoApiHandler>,
        html: Arc<dyn HtmlHandler>,
        queue_processor: Arc<dyn QueueProcessor>,
    ) -> Self {
        Self {
            config,
            queue: Arc::new(JobQueue::new()),
            diagnostics,
            users,
            instance_timeline,
            webfinger,
            activitypub,
            oauth,
            mastoapi,
            html,
            queue_processor,
        }
    }

    pub fn build(self) -> Context {
        Context {
            config: self.config,
            queue: self.queue,
            diagnostics: self.diagnostics,
            users: self.users,
            instance_timeline: self.instance_timeline,
            webfinger: self.webfinger,
            activitypub: self.activitypub,
            oauth: self.oauth,
            mastoapi: self.mastoapi,
            html: self.html,
            queue_processor: self.queue_processor,
            running: AtomicBool::new(true),
        }
    }
}

impl Context {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }
}
