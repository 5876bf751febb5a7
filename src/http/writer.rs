use std::io::{self, Write};

use super::response::Response;

const STATUS_TEXT: &[(u16, &str)] = &[
    (200, "OK"),
    (201, "Created"),
    (204, "No Content"),
    (303, "See Other"),
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (404, "Not Found"),
    (405, "Method Not Allowed"),
    (500, "Internal Server Error"),
];

fn status_text(status: u16) -> &'static str {
    STATUS_TEXT
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, text)| *text)
        .unwrap_or("Unknown")
}

/// Writes a response as an HTTP/1.1 message. One response per connection —
/// the connection handler closes the stream right after this call.
///
/// Headers are written in sorted-by-name order. `Response::headers` is a
/// `HashMap`, whose iteration order isn't stable across instances, so
/// sorting here is what makes the wire output deterministic.
pub fn write_response<W: Write>(mut w: W, resp: &Response) -> io::Result<()> {
    write!(w, "HTTP/1.1 {} {}\r\n", resp.status, status_text(resp.status))?;
    let mut headers: Vec<_> = resp.headers.iter().collect();
    headers.sort_by_key(|(name, _)| name.as_str());
    for (name, value) in headers {
        write!(w, "{name}: {value}\r\n")?;
    }
    let body_len = resp.body_len();
    write!(w, "content-length: {body_len}\r\n\r\n")?;
    if let Some(body) = &resp.body {
        w.write_all(body)?;
    }
    w.flush()
}
