//! Server-side implementation of the blog service.
//!
//! - [`handler`] - gRPC service entry point (`BlogHandler`).
//! - [`store`] - document shape and id parsing for the MongoDB collection.

pub mod handler;
pub mod store;
