//! Server runtime: accept loop, connection accounting, request handlers
//! and the audit log.

pub mod audit;
pub mod handlers;
pub mod listener;
pub mod tracker;

pub use listener::{Server, ServerState};
