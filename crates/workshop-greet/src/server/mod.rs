//! Server-side implementation of the greet service.
//!
//! - [`handler`] - gRPC service entry point (`GreetHandler`).
//! - [`streaming`] - the duplex and client-stream exchange loops.

pub mod handler;
pub mod streaming;
