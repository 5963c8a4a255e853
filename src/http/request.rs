/// HTTP request methods.
///
/// Only the two methods this server implements; anything else is rejected
/// at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - download a file from the store
    GET,
    /// POST - upload a file into the store
    POST,
}

impl Method {
    /// Parses a method token from a request line (case-sensitive).
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
        }
    }
}

/// A parsed HTTP request.
///
/// Constructed fresh per framed message and discarded once the handler
/// has responded. The body passes through undecoded; text vs. binary is
/// resolved by the handler via the content type.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET or POST)
    pub method: Method,
    /// The request path (e.g. "/index.html"), no query-string support
    pub path: String,
    /// Declared Content-Type value; empty when the client sent none
    pub content_type: String,
    /// Request body bytes (possibly empty)
    pub body: Vec<u8>,
}

impl Request {
    /// Final segment of the request path.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Extension of the final path segment.
    ///
    /// A name without a dot yields the whole name, which then resolves to
    /// an `application/*` type downstream.
    pub fn extension(&self) -> &str {
        self.file_name().rsplit('.').next().unwrap_or("")
    }
}
