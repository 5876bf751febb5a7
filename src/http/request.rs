use std::collections::HashMap;

/// A parsed HTTP request. Headers are keyed by lowercased name, matching the
/// source's dictionary-of-lowercase-names convention.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    /// Path exactly as it arrived on the wire, including query string.
    pub raw_path: String,
    pub headers: HashMap<String, String>,
    pub payload: Option<Vec<u8>>,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(|s| s.as_str())
    }

    pub fn payload_size(&self) -> usize {
        self.payload.as_ref().map(|p| p.len()).unwrap_or(0)
    }
}
