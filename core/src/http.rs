//! Per-call request and response values exchanged with an `ApiClient`.
//!
//! # Design
//! These types describe a single HTTP exchange as plain data. A consumer
//! builds a `RequestOptions` (or `UploadOptions`) for every call and hands it
//! to the injected client; the client answers with a `RawResponse` that the
//! conversion helper turns into a typed outcome. Nothing here outlives the
//! call that created it.
//!
//! All fields use owned types so options can be recorded by test clients and
//! moved across await points without lifetime concerns.

use bytes::Bytes;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Options for a JSON request against a single URI.
///
/// `uri` is either relative to the client's base URL or absolute. `body` is
/// the already-serialized JSON payload for `POST`/`PUT`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub uri: String,
    pub body: Option<serde_json::Value>,
    /// Skip attaching credentials for this request.
    pub allow_anonymous: bool,
    pub log_request: bool,
    pub log_response: bool,
}

/// Options for a file upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadOptions {
    pub uri: String,
    pub content: Bytes,
    pub file_name: String,
    pub allow_anonymous: bool,
    pub log_request: bool,
    pub log_response: bool,
}

/// An HTTP response described as plain data.
///
/// Non-success statuses are carried here as data; interpreting them is left
/// to `convert::to_with_details`.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
