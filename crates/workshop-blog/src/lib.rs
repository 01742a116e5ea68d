//! Blog service: CRUD-over-MongoDB gRPC handlers plus a server-streaming
//! listing endpoint.

pub mod config;
pub mod server;
