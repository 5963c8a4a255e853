use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Fixed Server header value.
pub const SERVER_ID: &str = "Thunder/1.0.0";

/// RFC 1123 formatted date for the `Date` header.
pub struct HttpDate(pub SystemTime);

impl std::fmt::Display for HttpDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let datetime = DateTime::<Utc>::from(self.0);
        write!(f, "{}", datetime.format("%a, %d %b %Y %H:%M:%S GMT"))
    }
}

/// Serializes a response into one contiguous byte sequence.
///
/// Header order is fixed: status line, Date, Server, Content-Length,
/// Content-Type, blank line, body. Content-Length is the exact byte
/// length of the body regardless of transfer mode.
pub fn serialize_response(resp: &Response, now: SystemTime) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128 + resp.body.len());

    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    buf.extend_from_slice(format!("Date: {}\r\n", HttpDate(now)).as_bytes());
    buf.extend_from_slice(format!("Server: {}\r\n", SERVER_ID).as_bytes());
    buf.extend_from_slice(format!("Content-Length: {}\r\n", resp.body.len()).as_bytes());
    buf.extend_from_slice(format!("Content-Type: {}\r\n", resp.content_type).as_bytes());

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf.extend_from_slice(&resp.body);

    buf
}

/// Writes one serialized response to the client.
///
/// The transport may accept the message in several writes, but the
/// buffer is a single logical message; nothing else is interleaved on
/// the connection until it has drained.
pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response, SystemTime::now()),
            written: 0,
        }
    }

    /// The serialized message (headers + body).
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub async fn write_to_stream(&mut self, stream: &mut TcpStream) -> std::io::Result<()> {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::WriteZero,
                    "connection closed while writing response",
                ));
            }

            self.written += n;
        }

        stream.flush().await
    }
}
