use crate::http::request::{Method, Request};
use thiserror::Error;

/// Errors raised while framing and parsing a request.
///
/// `Incomplete` is the framing signal: the buffer does not yet hold a
/// full message and the caller must read more bytes. Every other variant
/// is fatal for the connection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed request line")]
    InvalidRequestLine,
    #[error("unsupported method {0:?}")]
    InvalidMethod(String),
    #[error("malformed header line")]
    InvalidHeader,
    #[error("invalid Content-Length value")]
    InvalidContentLength,
    #[error("incomplete request")]
    Incomplete,
}

/// Tries to frame and parse one request from the accumulated buffer.
///
/// A message boundary is the first `\r\n\r\n`. A declared Content-Length
/// is reconciled against the bytes already buffered past the boundary;
/// until the full body has arrived this returns `Incomplete` and the
/// caller issues another read on the same connection. A header block with
/// no Content-Length frames as a complete message with an empty body.
///
/// On success returns the request and the exact number of bytes consumed,
/// so any pipelined bytes after the message stay in the buffer.
pub fn parse_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let headers_end = find_headers_end(buf).ok_or(ParseError::Incomplete)?;
    let header_bytes = &buf[..headers_end];
    let body_bytes = &buf[headers_end + 4..];

    let header_block =
        std::str::from_utf8(header_bytes).map_err(|_| ParseError::InvalidRequestLine)?;

    let mut lines = header_block.split("\r\n");

    // Request line: "{METHOD} {PATH} HTTP/1.1", single-space separators
    let request_line = lines.next().ok_or(ParseError::InvalidRequestLine)?;
    let (method_token, rest) = request_line
        .split_once(' ')
        .ok_or(ParseError::InvalidRequestLine)?;
    let (path, _version) = rest.split_once(' ').ok_or(ParseError::InvalidRequestLine)?;

    let method = Method::from_token(method_token)
        .ok_or_else(|| ParseError::InvalidMethod(method_token.to_string()))?;

    // Header lines: only Content-Type and Content-Length are consumed
    let mut content_type = String::new();
    let mut content_length = 0usize;

    for line in lines {
        if line.is_empty() {
            continue;
        }

        let (key, value) = line.split_once(':').ok_or(ParseError::InvalidHeader)?;
        let value = value.trim();

        match key.trim() {
            "Content-Type" => content_type = value.to_string(),
            "Content-Length" => {
                content_length = value
                    .parse::<usize>()
                    .map_err(|_| ParseError::InvalidContentLength)?;
            }
            _ => {}
        }
    }

    if body_bytes.len() < content_length {
        return Err(ParseError::Incomplete);
    }

    let body = body_bytes[..content_length].to_vec();

    let request = Request {
        method,
        path: path.to_string(),
        content_type,
        body,
    };

    let consumed = headers_end + 4 + content_length;
    Ok((request, consumed))
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
