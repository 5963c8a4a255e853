use crate::http::mime::{Category, ContentType};

/// HTTP status codes this server emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// A complete HTTP response ready to be serialized.
///
/// Constructed by a handler, sent once, then discarded.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: ContentType,
    pub body: Vec<u8>,
}

impl Response {
    /// Creates a 200 OK response with the given type and body.
    pub fn ok(content_type: ContentType, body: Vec<u8>) -> Self {
        Self {
            status: StatusCode::Ok,
            content_type,
            body,
        }
    }

    /// Creates a 404 Not Found response: `text/html`, empty body.
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NotFound,
            content_type: ContentType {
                category: Category::Text,
                subtype: "html".to_string(),
            },
            body: Vec::new(),
        }
    }

    /// Creates a 500 Internal Server Error response: `text/html`, empty body.
    pub fn internal_error() -> Self {
        Self {
            status: StatusCode::InternalServerError,
            content_type: ContentType {
                category: Category::Text,
                subtype: "html".to_string(),
            },
            body: Vec::new(),
        }
    }
}
