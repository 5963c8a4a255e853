use std::net::SocketAddr;

use bytes::{Buf, BytesMut};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::http::parser::{ParseError, parse_request};
use crate::http::request::Request;
use crate::http::writer::ResponseWriter;
use crate::server::handlers;
use crate::server::listener::ServerState;
use crate::server::tracker::ConnectionPermit;

/// Why a connection left its request loop.
#[derive(Debug)]
pub enum CloseReason {
    /// Zero-byte read: the peer finished and closed its end.
    PeerClosed,
    /// No bytes arrived within the adaptive idle budget.
    TimedOut,
    /// Transport-level failure (reset, broken pipe, ...).
    Reset,
    /// Malformed request; not recoverable for this connection.
    Protocol(ParseError),
}

pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    buffer: BytesMut,
    state: ConnectionState,
    /// This connection's slot in the active count. Dropping it releases
    /// the slot, so the pairing holds even if the task unwinds; the
    /// `Closing` state takes it early so the final audit line reports the
    /// count without this connection.
    permit: Option<ConnectionPermit>,
    shared: ServerState,
}

enum ConnectionState {
    /// Waiting on a timed read; framing loops here until a full request
    /// has accumulated.
    Idle,
    /// Handler running for a framed request.
    Dispatching(Request),
    /// Writing the serialized response.
    Responding(ResponseWriter),
    /// Releasing the permit and auditing the closure.
    Closing(CloseReason),
    Closed,
}

impl Connection {
    pub fn new(
        stream: TcpStream,
        peer: SocketAddr,
        permit: ConnectionPermit,
        shared: ServerState,
    ) -> Self {
        Self {
            stream,
            peer,
            buffer: BytesMut::with_capacity(4096),
            state: ConnectionState::Idle,
            permit: Some(permit),
            shared,
        }
    }

    /// Drives the connection until the peer closes, the idle budget runs
    /// out, or a fatal framing error occurs. Every exit path passes
    /// through `Closing` exactly once.
    pub async fn run(&mut self) {
        loop {
            match &mut self.state {
                ConnectionState::Idle => {
                    self.state = match self.read_request().await {
                        Ok(request) => ConnectionState::Dispatching(request),
                        Err(reason) => ConnectionState::Closing(reason),
                    };
                }

                ConnectionState::Dispatching(request) => {
                    // The audit line is awaited before the response goes
                    // out, preserving request/response/log ordering.
                    self.shared
                        .audit
                        .request_received(self.peer, request.method)
                        .await;

                    let response = handlers::handle(request, &self.shared.store).await;
                    self.state = ConnectionState::Responding(ResponseWriter::new(&response));
                }

                ConnectionState::Responding(writer) => {
                    self.state = match writer.write_to_stream(&mut self.stream).await {
                        Ok(()) => ConnectionState::Idle,
                        Err(e) => {
                            tracing::debug!(peer = %self.peer, error = %e, "response write failed");
                            ConnectionState::Closing(CloseReason::Reset)
                        }
                    };
                }

                ConnectionState::Closing(reason) => {
                    self.permit.take();
                    let active = self.shared.tracker.active();

                    match reason {
                        CloseReason::TimedOut => {
                            tracing::info!(peer = %self.peer, "connection timed out");
                            self.shared.audit.connection_timeout(self.peer, active).await;
                        }
                        CloseReason::Protocol(e) => {
                            tracing::warn!(peer = %self.peer, error = %e, "closing connection on framing error");
                            self.shared.audit.connection_closed(self.peer, active).await;
                        }
                        CloseReason::PeerClosed | CloseReason::Reset => {
                            tracing::debug!(peer = %self.peer, "connection closed");
                            self.shared.audit.connection_closed(self.peer, active).await;
                        }
                    }

                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => break,
            }
        }
    }

    /// Accumulates reads until the buffer frames one complete request.
    ///
    /// The idle timeout is recomputed from the shared counter immediately
    /// before every blocking read; the count already includes this
    /// connection. A zero-byte read mid-frame discards the partial frame
    /// and reports orderly close.
    async fn read_request(&mut self) -> Result<Request, CloseReason> {
        loop {
            match parse_request(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.advance(consumed);
                    return Ok(request);
                }

                Err(ParseError::Incomplete) => {
                    // Need more data; fall through to the read below
                }

                Err(e) => return Err(CloseReason::Protocol(e)),
            }

            let idle = self.shared.tracker.idle_timeout();

            match timeout(idle, self.stream.read_buf(&mut self.buffer)).await {
                Err(_elapsed) => return Err(CloseReason::TimedOut),
                Ok(Ok(0)) => return Err(CloseReason::PeerClosed),
                Ok(Ok(_n)) => {}
                Ok(Err(e)) => {
                    tracing::debug!(peer = %self.peer, error = %e, "read failed");
                    return Err(CloseReason::Reset);
                }
            }
        }
    }
}
