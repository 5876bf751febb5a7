//! Minimal HTTP/1.x request-line + header parser.
//!
//! One request per connection, no chunked transfer encoding, no keep-alive —
//! matching the scope the connection handler commits to: exactly one
//! HTTP/1 request per connection.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};

use thiserror::Error;

use super::request::Request;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("connection closed or timed out before a request line arrived")]
    Timeout,
    #[error("malformed request line: {0}")]
    BadRequestLine(String),
    #[error("malformed header line: {0}")]
    BadHeaderLine(String),
    #[error("io error reading request: {0}")]
    Io(#[from] std::io::Error),
}

const MAX_HEADER_LINES: usize = 256;
const MAX_PAYLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Converts an io error into a [`ParseError`], folding a blocked/elapsed
/// read timeout into [`ParseError::Timeout`] rather than [`ParseError::Io`].
fn map_io_err(e: std::io::Error) -> ParseError {
    use std::io::ErrorKind;
    match e.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut => ParseError::Timeout,
        _ => ParseError::Io(e),
    }
}

/// Reads one HTTP/1.x request from `reader`. A read timeout or an
/// immediately-closed connection is reported as [`ParseError::Timeout`],
/// which the connection handler treats as "close silently, no archive
/// entry".
pub fn read_request<R: Read>(reader: R) -> Result<Request, ParseError> {
    let mut buf = BufReader::new(reader);

    let mut request_line = String::new();
    let n = buf.read_line(&mut request_line).map_err(map_io_err)?;
    if n == 0 {
        return Err(ParseError::Timeout);
    }
    let request_line = request_line.trim_end();
    let mut parts = request_line.splitn(3, ' ');
    let method = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ParseError::BadRequestLine(request_line.to_string()))?
        .to_string();
    let raw_path = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ParseError::BadRequestLine(request_line.to_string()))?
        .to_string();
    // HTTP version (third token) is read but not validated — the source
    // doesn't branch on it either.
    let _version = parts.next();

    let mut headers = HashMap::new();
    for _ in 0..MAX_HEADER_LINES {
        let mut line = String::new();
        let n = buf.read_line(&mut line).map_err(map_io_err)?;
        if n == 0 || line == "\r\n" || line == "\n" {
            break;
        }
        let line = line.trim_end();
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| ParseError::BadHeaderLine(line.to_string()))?;
        headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
    }

    let payload = match headers.get("content-length").and_then(|v| v.parse::<usize>().ok()) {
        Some(0) | None => None,
        Some(len) if len > MAX_PAYLOAD_BYTES => {
            return Err(ParseError::BadHeaderLine(format!(
                "content-length {len} exceeds maximum {MAX_PAYLOAD_BYTES}"
            )))
        }
        Some(len) => {
            let mut body = vec![0u8; len];
            buf.read_exact(&mut body).map_err(map_io_err)?;
            Some(body)
        }
    };

    Ok(Request {
        method,
        raw_path,
        headers,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_simple_get() {
        let raw = b"GET /robots.txt HTTP/1.1\r\nHost: example.test\r\n\r\n";
        let req = read_request(Cursor::new(raw.to_vec())).unwrap();
        assert_eq!(req.method, "GET");
        assert_eq!(req.raw_path, "/robots.txt");
        assert_eq!(req.header("host"), Some("example.test"));
        assert!(req.payload.is_none());
    }

    #[test]
    fn parses_post_with_body() {
        let raw = b"POST /inbox HTTP/1.1\r\ncontent-length: 5\r\n\r\nhello";
        let req = read_request(Cursor::new(raw.to_vec())).unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(req.payload.as_deref(), Some(b"hello".as_slice()));
    }

    #[test]
    fn empty_stream_is_timeout() {
        let raw: &[u8] = b"";
        let err = read_request(Cursor::new(raw.to_vec())).unwrap_err();
        assert!(matches!(err, ParseError::Timeout));
    }

    #[test]
    fn header_names_are_lowercased() {
        let raw = b"GET / HTTP/1.1\r\nX-Creator: test\r\n\r\n";
        let req = read_request(Cursor::new(raw.to_vec())).unwrap();
        assert_eq!(req.header("x-creator"), Some("test"));
    }

    #[test]
    fn elapsed_read_timeout_maps_to_timeout_error() {
        use std::io::ErrorKind;
        let err = map_io_err(std::io::Error::new(ErrorKind::WouldBlock, "timed out"));
        assert!(matches!(err, ParseError::Timeout));
        let err = map_io_err(std::io::Error::new(ErrorKind::TimedOut, "timed out"));
        assert!(matches!(err, ParseError::Timeout));
    }

    #[test]
    fn other_io_errors_stay_io() {
        let err = map_io_err(std::io::Error::new(std::io::ErrorKind::Other, "broken pipe"));
        assert!(matches!(err, ParseError::Io(_)));
    }
}
