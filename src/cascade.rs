//! The handler cascade (C5): an ordered chain of per-subsystem route
//! matchers, first non-declining handler wins.
//!
//! The source expresses "declined" as status `0`; this core uses
//! `Option<Response>` at the cascade boundary instead, and keeps the order
//! as an explicit list rather than a registry, because order is
//! semantically significant: cheap exact-match statics first, federation
//! endpoints before the UI so a malformed UI path can't capture a protocol
//! request, feature-gated handlers early enough to short-circuit before
//! generic ones.

use crate::context::Context;
use crate::http::{Request, Response};
use crate::statics::StaticsHandler;

/// GET/HEAD order: statics, WebFinger, ActivityPub GET, OAuth GET
/// (feature-gated), Mastodon API GET (feature-gated), HTML UI GET.
pub fn run_get_cascade(ctx: &Context, req: &Request, path: &str) -> Option<Response> {
    let statics = StaticsHandler {
        config: &ctx.config,
        users: ctx.users.as_ref(),
        instance_timeline: ctx.instance_timeline.as_ref(),
    };

    statics
        .get(req, path)
        .or_else(|| ctx.webfinger.get(req, path))
        .or_else(|| ctx.activitypub.get(req, path))
        .or_else(|| ctx.config.oauth.then(|| ctx.oauth.get(req, path)).flatten())
        .or_else(|| ctx.config.mastodon_api.then(|| ctx.mastoapi.get(req, path)).flatten())
        .or_else(|| ctx.html.get(req, path))
}

/// POST order: OAuth POST (feature-gated), Mastodon API POST
/// (feature-gated), ActivityPub POST, HTML POST.
pub fn run_post_cascade(ctx: &Context, req: &Request, path: &str) -> Option<Response> {
    ctx.config
        .oauth
        .then(|| ctx.oauth.post(req, path))
        .flatten()
        .or_else(|| ctx.config.mastodon_api.then(|| ctx.mastoapi.post(req, path)).flatten())
        .or_else(|| ctx.activitypub.post(req, path))
        .or_else(|| ctx.html.post(req, path))
}

/// PUT order: Mastodon API PUT only.
pub fn run_put_cascade(ctx: &Context, req: &Request, path: &str) -> Option<Response> {
    ctx.config.mastodon_api.then(|| ctx.mastoapi.put(req, path)).flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::*;
    use crate::config::Config;
    use crate::diagnostics::TracingDiagnostics;
    use crate::stubs::*;
    use std::sync::Arc;

    struct ClaimingWebFinger;
    impl WebFingerHandler for ClaimingWebFinger {
        fn get(&self, _req: &Request, path: &str) -> Option<Response> {
            if path == "/.well-known/webfinger" {
                Some(Response::with_body(200, "application/jrd+json", "{}"))
            } else {
                None
            }
        }
    }

    struct ClaimingHtml;
    impl HtmlHandler for ClaimingHtml {
        fn get(&self, _req: &Request, _path: &str) -> Option<Response> {
            Some(Response::with_body(200, "text/html", "<html>claimed by html</html>"))
        }
        fn post(&self, _req: &Request, _path: &str) -> Option<Response> {
            None
        }
    }

    fn test_context(webfinger: Arc<dyn WebFingerHandler>, html: Arc<dyn HtmlHandler>) -> Context {
        let config = Arc::new(
            Config::from_yaml_str("host: example.test\nbase_url: https://example.test\n").unwrap(),
        );
        crate::context::ContextBuilder::new(
            config,
            Arc::new(TracingDiagnostics::new()),
            Arc::new(InMemoryUserDirectory::empty()),
            Arc::new(EmptyInstanceTimeline),
            webfinger,
            Arc::new(DecliningActivityPub),
            Arc::new(DecliningOAuth),
            Arc::new(DecliningMastoApi),
            html,
            Arc::new(NoopQueueProcessor),
        )
        .build()
    }

    fn get_req(path: &str) -> Request {
        Request {
            method: "GET".into(),
            raw_path: path.into(),
            headers: Default::default(),
            payload: None,
        }
    }

    #[test]
    fn statics_claims_before_later_handlers_run() {
        let ctx = test_context(Arc::new(ClaimingWebFinger), Arc::new(ClaimingHtml));
        let resp = run_get_cascade(&ctx, &get_req("/robots.txt"), "/robots.txt").unwrap();
        assert_eq!(resp.content_type.as_deref(), Some("text/plain"));
    }

    #[test]
    fn first_non_declining_handler_wins() {
        // Both WebFinger and HTML would claim an unmatched path; WebFinger
        // only claims its own path, so HTML (last in the GET order) claims
        // everything else that falls through.
        let ctx = test_context(Arc::new(ClaimingWebFinger), Arc::new(ClaimingHtml));
        let resp = run_get_cascade(&ctx, &get_req("/some/ui/path"), "/some/ui/path").unwrap();
        assert_eq!(resp.body.as_deref(), Some(b"<html>claimed by html</html>".as_slice()));
    }

    #[test]
    fn webfinger_runs_before_html_for_its_own_path() {
        let ctx = test_context(Arc::new(ClaimingWebFinger), Arc::new(ClaimingHtml));
        let resp = run_get_cascade(
            &ctx,
            &get_req("/.well-known/webfinger"),
            "/.well-known/webfinger",
        )
        .unwrap();
        assert_eq!(resp.content_type.as_deref(), Some("application/jrd+json"));
    }

    #[test]
    fn nothing_claims_gives_none() {
        let ctx = test_context(Arc::new(DecliningWebFinger), Arc::new(DecliningHtml));
        assert!(run_get_cascade(&ctx, &get_req("/nope"), "/nope").is_none());
    }

    #[test]
    fn feature_gated_put_declines_when_mastodon_api_disabled() {
        let ctx = test_context(Arc::new(DecliningWebFinger), Arc::new(DecliningHtml));
        assert!(!ctx.config.mastodon_api);
        let req = Request { method: "PUT".into(), raw_path: "/statuses/1".into(), headers: Default::default(), payload: None };
        assert!(run_put_cascade(&ctx, &req, "/statuses/1").is_none());
    }
}
