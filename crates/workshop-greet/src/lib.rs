//! Greet service: tutorial-grade gRPC handlers covering the four RPC shapes
//! plus a deadline-aware unary call.

pub mod config;
pub mod server;
