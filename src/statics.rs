//! Server statics handler: the one cascade entry the core implements in
//! full rather than delegating to a collaborator (root greeting, avatar,
//! NodeInfo discovery and payload, robots.txt).

use base64::Engine;

use crate::collaborators::{InstanceTimeline, UserDirectory};
use crate::config::Config;
use crate::http::{Request, Response};

/// 1x1 transparent PNG, used for `/susie.png` and `/favicon.ico` — the
/// source reads `default_avatar_base64()` from a compiled-in constant; we
/// do the same rather than shipping a real asset pipeline, which is out of
/// scope for this core.
const DEFAULT_AVATAR_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNk+A8AAQUBAScY42YAAAAASUVORK5CYII=";

const NODEINFO_SCHEMA_URL: &str = "http://nodeinfo.diaspora.software/ns/schema/2.0";

pub struct StaticsHandler<'a> {
    pub config: &'a Config,
    pub users: &'a dyn UserDirectory,
    pub instance_timeline: &'a dyn InstanceTimeline,
}

impl<'a> StaticsHandler<'a> {
    pub fn get(&self, _req: &Request, path: &str) -> Option<Response> {
        match path {
            "" => Some(self.root()),
            "/susie.png" | "/favicon.ico" => Some(self.avatar()),
            "/.well-known/nodeinfo" => Some(self.well_known_nodeinfo()),
            "/nodeinfo_2_0" => Some(self.nodeinfo_2_0()),
            "/robots.txt" => Some(self.robots_txt()),
            _ => None,
        }
    }

    fn root(&self) -> Response {
        let body = if self.config.show_instance_timeline {
            self.instance_timeline.render(0, 30)
        } else {
            self.greeting_html()
        };
        Response::with_body(200, "text/html; charset=utf-8", body)
    }

    fn avatar(&self) -> Response {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(DEFAULT_AVATAR_PNG_BASE64)
            .expect("embedded default avatar is valid base64");
        Response::with_body(200, "image/png", bytes)
    }

    fn well_known_nodeinfo(&self) -> Response {
        let body = serde_json::json!({
            "links": [{
                "rel": NODEINFO_SCHEMA_URL,
                "href": format!("{}/nodeinfo_2_0", self.config.base_url),
            }]
        });
        Response::with_body(200, "application/json; charset=utf-8", body.to_string())
    }

    fn nodeinfo_2_0(&self) -> Response {
        let n_users = self.users.user_list().len();
        // `localPosts` stays a `0` placeholder — the source's comment reads
        // "to be implemented someday" and no local post counter exists yet
        // (see DESIGN.md).
        let body = serde_json::json!({
            "version": "2.0",
            "software": { "name": "snac", "version": env!("CARGO_PKG_VERSION") },
            "protocols": ["activitypub"],
            "services": { "outbound": [], "inbound": [] },
            "usage": {
                "users": {
                    "total": n_users,
                    "activeMonth": n_users,
                    "activeHalfyear": n_users,
                },
                "localPosts": 0,
            },
            "openRegistrations": false,
            "metadata": {},
        });
        Response::with_body(200, "application/json; charset=utf-8", body.to_string())
    }

    fn robots_txt(&self) -> Response {
        Response::with_body(200, "text/plain", "User-agent: *\nDisallow: /\n")
    }

    fn greeting_html(&self) -> String {
        let mut s = GREETING_TEMPLATE.to_string();
        s = s.replace("%host%", &self.config.host);
        s = s.replace("%admin_email%", self.config.admin_email_or_default());

        if s.contains("%userlist%") {
            let mut list = String::from("<ul class=\"snac-user-list\">\n");
            for uid in self.users.user_list() {
                if let Some(profile) = self.users.user_profile(&uid) {
                    list.push_str(&format!(
                        "<li><a href=\"{}\">@{}@{} ({})</a></li>\n",
                        html_escape(&profile.actor_url),
                        html_escape(&uid),
                        html_escape(&self.config.host),
                        html_escape(&profile.display_name),
                    ));
                }
            }
            list.push_str("</ul>\n");
            s = s.replace("%userlist%", &list);
        }

        s
    }
}

/// Fallback template used when no `greeting.html` asset is configured. Real
/// deployments may override this by composing `StaticsHandler` with a
/// loaded template string; this core only guarantees the substitution
/// contract.
const GREETING_TEMPLATE: &str = "<html><head><title>%host%</title></head><body>\
<h1>%host%</h1><p>Welcome. Contact %admin_email% for help.</p>%userlist%</body></html>";

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stubs::{EmptyInstanceTimeline, InMemoryUserDirectory};
    use crate::collaborators::UserProfile;

    fn config() -> Config {
        Config::from_yaml_str("host: example.test\nbase_url: https://example.test\n").unwrap()
    }

    #[test]
    fn robots_txt_returns_standard_disallow_body() {
        let cfg = config();
        let users = InMemoryUserDirectory::empty();
        let timeline = EmptyInstanceTimeline;
        let handler = StaticsHandler { config: &cfg, users: &users, instance_timeline: &timeline };
        let req = Request { method: "GET".into(), raw_path: "/robots.txt".into(), headers: Default::default(), payload: None };
        let resp = handler.get(&req, "/robots.txt").unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.content_type.as_deref(), Some("text/plain"));
        assert_eq!(resp.body.as_deref(), Some(b"User-agent: *\nDisallow: /\n".as_slice()));
    }

    #[test]
    fn well_known_nodeinfo_points_at_nodeinfo_2_0() {
        let cfg = config();
        let users = InMemoryUserDirectory::empty();
        let timeline = EmptyInstanceTimeline;
        let handler = StaticsHandler { config: &cfg, users: &users, instance_timeline: &timeline };
        let req = Request { method: "GET".into(), raw_path: "/.well-known/nodeinfo".into(), headers: Default::default(), payload: None };
        let resp = handler.get(&req, "/.well-known/nodeinfo").unwrap();
        let json: serde_json::Value = serde_json::from_slice(resp.body.as_ref().unwrap()).unwrap();
        assert_eq!(json["links"][0]["href"], "https://example.test/nodeinfo_2_0");
        assert_eq!(json["links"][0]["rel"], NODEINFO_SCHEMA_URL);
    }

    #[test]
    fn nodeinfo_payload_reflects_user_count() {
        let cfg = config();
        let users = InMemoryUserDirectory::new(vec![
            UserProfile { uid: "alice".into(), actor_url: "https://example.test/alice".into(), display_name: "Alice".into() },
            UserProfile { uid: "bob".into(), actor_url: "https://example.test/bob".into(), display_name: "Bob".into() },
        ]);
        let timeline = EmptyInstanceTimeline;
        let handler = StaticsHandler { config: &cfg, users: &users, instance_timeline: &timeline };
        let req = Request { method: "GET".into(), raw_path: "/nodeinfo_2_0".into(), headers: Default::default(), payload: None };
        let resp = handler.get(&req, "/nodeinfo_2_0").unwrap();
        let json: serde_json::Value = serde_json::from_slice(resp.body.as_ref().unwrap()).unwrap();
        assert_eq!(json["software"]["name"], "snac");
        assert_eq!(json["protocols"][0], "activitypub");
        assert_eq!(json["usage"]["users"]["total"], 2);
        assert_eq!(json["usage"]["localPosts"], 0);
        assert_eq!(json["openRegistrations"], false);
    }

    #[test]
    fn unknown_path_declines() {
        let cfg = config();
        let users = InMemoryUserDirectory::empty();
        let timeline = EmptyInstanceTimeline;
        let handler = StaticsHandler { config: &cfg, users: &users, instance_timeline: &timeline };
        let req = Request { method: "GET".into(), raw_path: "/whatever".into(), headers: Default::default(), payload: None };
        assert!(handler.get(&req, "/whatever").is_none());
    }
}
