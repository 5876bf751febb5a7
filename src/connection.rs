//! The connection handler (C4): parses one HTTP/1 request per connection,
//! runs the handler cascade, shapes and writes the response, archives.

use crate::cascade::{run_get_cascade, run_post_cascade, run_put_cascade};
use crate::context::Context;
use crate::http::{read_request, write_response, ParseError, Request, Response};
use crate::job::Connection;

const X_CREATOR: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Processes exactly one request on `conn`. Never panics on a malformed
/// request — every per-request failure becomes an HTTP status.
pub fn handle_connection(ctx: &Context, mut conn: Box<dyn Connection>) {
    let req = match read_request(&mut conn) {
        Ok(req) => req,
        Err(ParseError::Timeout) => return, // silent close, no archive entry
        Err(e) => {
            // Malformed request: still a client-facing failure, but we have
            // no method/path to dispatch against, so close silently like a
            // timeout rather than guessing at a response shape.
            tracing::debug!(error = %e, "closing connection after parse failure");
            return;
        }
    };

    let path = normalize_path(&req.raw_path, &ctx.config.prefix);
    let resp = dispatch(ctx, &req, &path);
    let resp = shape_response(ctx, &req, resp);

    if let Err(e) = write_response(&mut conn, &resp) {
        tracing::debug!(error = %e, "failed to write response");
    }
    drop(conn);

    ctx.diagnostics.archive("RECV", &req, &resp);
    validate_json_body(ctx, &req, &resp);
}

/// Strips a trailing `/` and the configured `prefix`, so every downstream
/// matcher sees a prefix-free, trailing-slash-free path.
pub fn normalize_path(raw_path: &str, prefix: &str) -> String {
    // The raw path may carry a query string; strip it before normalizing,
    // same as the matchers in the cascade only ever see the path.
    let path = raw_path.split('?').next().unwrap_or(raw_path);
    let mut path = path.to_string();
    if path.ends_with('/') && path.len() > 1 {
        path.pop();
    } else if path == "/" {
        path = String::new();
    }
    if !prefix.is_empty() {
        if let Some(stripped) = path.strip_prefix(prefix) {
            path = stripped.to_string();
        }
    }
    path
}

fn dispatch(ctx: &Context, req: &Request, path: &str) -> Response {
    match req.method.as_str() {
        "GET" | "HEAD" => run_get_cascade(ctx, req, path).unwrap_or_default(),
        "POST" => run_post_cascade(ctx, req, path).unwrap_or_default(),
        "PUT" => run_put_cascade(ctx, req, path).unwrap_or_default(),
        "OPTIONS" => Response::new(200),
        _ => Response::default(), // status 0: unattended
    }
}

/// Status-conditioned response shaping: body substitution, redirect and
/// auth headers, content-type/CORS/etag defaults, HEAD body stripping.
fn shape_response(ctx: &Context, req: &Request, mut resp: Response) -> Response {
    if resp.status == 0 {
        ctx.diagnostics
            .archive_error("unattended_method", "unattended method", req);
        tracing::debug!(method = %req.method, path = %req.raw_path, "unattended method");
        resp.status = 404;
    }

    if resp.status == 404 {
        resp.body = Some(b"<h1>404 Not Found</h1>".to_vec());
    }

    if resp.status == 400 && resp.body.is_some() {
        resp.body = Some(b"<h1>400 Bad Request</h1>".to_vec());
    }

    if resp.status == 303 {
        if let Some(location) = resp.location.clone() {
            resp.headers.insert("location".to_string(), location);
        }
    }

    if resp.status == 401 {
        if let Some(hint) = resp.auth_hint.clone() {
            resp.headers.insert(
                "WWW-Authenticate".to_string(),
                format!("Basic realm=\"@{hint}@{} snac login\"", ctx.config.host),
            );
        }
    }

    let content_type = resp
        .content_type
        .clone()
        .unwrap_or_else(|| "text/html; charset=utf-8".to_string());
    resp.headers.insert("content-type".to_string(), content_type);
    resp.headers.insert("x-creator".to_string(), X_CREATOR.to_string());
    resp.headers
        .insert("access-control-allow-origin".to_string(), "*".to_string());
    resp.headers
        .insert("access-control-allow-headers".to_string(), "*".to_string());
    if let Some(etag) = &resp.etag {
        resp.headers.insert("etag".to_string(), etag.clone());
    }

    if req.method == "HEAD" {
        resp.body = None;
    }

    resp
}

fn validate_json_body(ctx: &Context, req: &Request, resp: &Response) {
    let is_json = resp
        .headers
        .get("content-type")
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false);
    if !is_json {
        return;
    }
    if let Some(body) = &resp.body {
        if serde_json::from_slice::<serde_json::Value>(body).is_err() {
            ctx.diagnostics.log("bad JSON");
            ctx.diagnostics.archive_error("bad_json", "bad JSON", req);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_slash() {
        assert_eq!(normalize_path("/robots.txt/", ""), "/robots.txt");
        assert_eq!(normalize_path("/robots.txt", ""), "/robots.txt");
    }

    #[test]
    fn root_normalizes_to_empty() {
        assert_eq!(normalize_path("/", ""), "");
        assert_eq!(normalize_path("", ""), "");
    }

    #[test]
    fn strips_configured_prefix() {
        assert_eq!(normalize_path("/snac/robots.txt", "/snac"), "/robots.txt");
        assert_eq!(normalize_path("/robots.txt", "/snac"), "/robots.txt");
    }

    #[test]
    fn path_normalization_is_idempotent() {
        let a = normalize_path("/snac/robots.txt", "/snac");
        let b = normalize_path("/snac/robots.txt/", "/snac");
        let c = normalize_path("/robots.txt", "/snac");
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn strips_query_string_before_normalizing() {
        assert_eq!(normalize_path("/robots.txt?x=1", ""), "/robots.txt");
    }
}
