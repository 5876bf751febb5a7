use std::collections::HashMap;

/// A response assembled by the handler cascade and consumed by the HTTP
/// writer.
///
/// `location` and `auth_hint` exist because the source overloads `body` to
/// smuggle a redirect target (303) and a username hint (401) through to the
/// outer response builder. That's fragile; here the cascade sets these
/// fields explicitly instead of repurposing the body slot.
#[derive(Debug, Clone, Default)]
pub struct Response {
    /// `0` means "declined". Handlers return `None` at the cascade boundary
    /// instead, see [`crate::cascade`]; this field only carries a real
    /// status once a handler has claimed the request.
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
    pub content_type: Option<String>,
    pub etag: Option<String>,
    pub location: Option<String>,
    /// Username hint for the `WWW-Authenticate: Basic realm="@<hint>@<host> ..."`
    /// header built on a 401.
    pub auth_hint: Option<String>,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn with_body(status: u16, content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: Some(content_type.into()),
            body: Some(body.into()),
            ..Default::default()
        }
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Self {
            status: 303,
            location: Some(location.into()),
            ..Default::default()
        }
    }

    pub fn unauthorized(auth_hint: impl Into<String>) -> Self {
        Self {
            status: 401,
            auth_hint: Some(auth_hint.into()),
            ..Default::default()
        }
    }

    pub fn body_len(&self) -> usize {
        self.body.as_ref().map(|b| b.len()).unwrap_or(0)
    }
}
