//! Command-file driven client.
//!
//! Connects once to the server, then executes a newline-delimited command
//! file over that single connection:
//!
//! ```text
//! client_get  <path> <host> [<port>]
//! client_post <path> <host> [<port>]
//! ```
//!
//! GET bodies are saved under the working directory; POST uploads derive
//! their Content-Type from the local file extension and always declare a
//! Content-Length so the server can frame the body.

use std::io::Write as _;

use anyhow::Context;
use bytes::{Buf, BytesMut};
use clap::Parser;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use thunder::http::mime::{ContentType, TransferMode};
use thunder::http::request::Method;

/// Command-file driven HTTP client for the thunder file server.
#[derive(Parser)]
#[command(name = "thunder-client", version)]
struct Cli {
    /// Server host name or address
    host: String,
    /// Server port
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut stream = TcpStream::connect((cli.host.as_str(), cli.port))
        .await
        .with_context(|| format!("failed to connect to {}:{}", cli.host, cli.port))?;

    print!("Enter the path of the commands file: ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;

    let commands =
        std::fs::read_to_string(answer.trim()).context("failed to read the commands file")?;

    for line in commands.lines() {
        if line.trim().is_empty() {
            continue;
        }
        send_request(&mut stream, line).await?;
    }

    Ok(())
}

async fn send_request(stream: &mut TcpStream, line: &str) -> anyhow::Result<()> {
    let (method, path) = parse_command(line)
        .with_context(|| format!("unrecognized command line {line:?}"))?;

    let request = form_request(method, path)?;

    let request_line_end = request
        .iter()
        .position(|&b| b == b'\r')
        .unwrap_or(request.len());
    println!(">>>> Request Sent");
    println!("{}", String::from_utf8_lossy(&request[..request_line_end]));

    stream.write_all(&request).await?;
    stream.flush().await?;

    let (status_line, body) = read_response(stream).await?;
    println!("<<<< Response Received");
    println!("{status_line}");
    println!();

    // Downloads land in the working directory under the requested name
    if method == Method::GET && status_line.starts_with("HTTP/1.1 200") {
        let saved = file_name(path);
        tokio::fs::write(saved, &body)
            .await
            .with_context(|| format!("failed to save {saved}"))?;
        println!("Saved {} bytes to {}", body.len(), saved);
    }

    Ok(())
}

/// `client_get <path> <host> [<port>]` / `client_post <path> <host> [<port>]`.
///
/// The trailing host/port operands are accepted for compatibility with
/// the command grammar; requests go over the session connection.
fn parse_command(line: &str) -> Option<(Method, &str)> {
    let mut tokens = line.split_whitespace();

    let method = match tokens.next()? {
        "client_get" => Method::GET,
        "client_post" => Method::POST,
        _ => return None,
    };
    let path = tokens.next()?;

    Some((method, path))
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn form_request(method: Method, path: &str) -> anyhow::Result<Vec<u8>> {
    let name = file_name(path);

    match method {
        Method::GET => Ok(format!("GET /{name} HTTP/1.1\r\n\r\n").into_bytes()),

        Method::POST => {
            let extension = name.rsplit('.').next().unwrap_or("");
            let content_type = ContentType::from_extension(extension);

            let data = match content_type.transfer_mode() {
                TransferMode::Binary => std::fs::read(path),
                TransferMode::Text => std::fs::read_to_string(path).map(String::into_bytes),
            }
            .with_context(|| format!("failed to read {path}"))?;

            // The server stores uploads under "{path}.{extension}", so the
            // posted path drops the local extension.
            let stem = name.split('.').next().unwrap_or(name);

            let mut request = format!(
                "POST /{stem} HTTP/1.1\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\n\r\n",
                data.len()
            )
            .into_bytes();
            request.extend_from_slice(&data);
            Ok(request)
        }
    }
}

/// Reads one response: headers up to the blank line, then a
/// Content-Length-bounded body.
async fn read_response(stream: &mut TcpStream) -> anyhow::Result<(String, Vec<u8>)> {
    let mut buffer = BytesMut::with_capacity(8192);

    loop {
        if let Some(headers_end) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            let header_bytes = buffer.split_to(headers_end + 4);
            let headers =
                std::str::from_utf8(&header_bytes).context("invalid response headers")?;

            let mut lines = headers.split("\r\n");
            let status_line = lines.next().unwrap_or("").to_string();

            let mut content_length = 0usize;
            for line in lines {
                if let Some((key, value)) = line.split_once(':') {
                    if key.trim() == "Content-Length" {
                        content_length = value.trim().parse().unwrap_or(0);
                    }
                }
            }

            let body = read_body(stream, &mut buffer, content_length).await?;
            return Ok((status_line, body));
        }

        let n = stream.read_buf(&mut buffer).await?;
        if n == 0 {
            anyhow::bail!("connection closed before a complete response arrived");
        }

        if buffer.len() > 64 * 1024 {
            anyhow::bail!("response headers too large");
        }
    }
}

async fn read_body(
    stream: &mut TcpStream,
    buffer: &mut BytesMut,
    content_length: usize,
) -> anyhow::Result<Vec<u8>> {
    let mut body = Vec::with_capacity(content_length);

    // Drain whatever arrived along with the headers first
    let from_buffer = buffer.len().min(content_length);
    body.extend_from_slice(&buffer[..from_buffer]);
    buffer.advance(from_buffer);

    while body.len() < content_length {
        let n = stream.read_buf(buffer).await?;
        if n == 0 {
            anyhow::bail!("connection closed before the complete body arrived");
        }

        let take = buffer.len().min(content_length - body.len());
        body.extend_from_slice(&buffer[..take]);
        buffer.advance(take);
    }

    Ok(body)
}
