//! HTTP protocol implementation.
//!
//! This module implements the GET/POST subset of HTTP/1.1 the file
//! server speaks, including connections that serve several requests
//! before closing.
//!
//! # Architecture
//!
//! - **`connection`**: the per-connection supervisor driving the
//!   request-response state machine under the adaptive idle timeout
//! - **`parser`**: frames and parses requests out of an accumulating
//!   byte buffer
//! - **`request`**: parsed request representation
//! - **`response`**: response representation with status helpers
//! - **`writer`**: serializes and writes responses to the client
//! - **`mime`**: content-type resolution from file extensions
//!
//! # Connection State Machine
//!
//! Each client connection goes through a state machine:
//!
//! ```text
//!        ┌─────────────┐
//!        │    Idle     │ ← Timed read; framing accumulates a request
//!        └──────┬──────┘
//!               │ Request framed
//!               ▼
//!        ┌──────────────────┐
//!        │   Dispatching    │ ← GET/POST handler runs
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Responding    │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ → Idle (same connection, next request)
//!               └─ timeout / peer close / reset / framing error
//!                          ▼
//!        ┌──────────────────┐
//!        │     Closing      │ ← Permit released, closure audited
//!        └──────┬───────────┘
//!               ▼
//!             Closed
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
