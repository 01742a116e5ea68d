//! Calculator service: tutorial-grade arithmetic handlers covering the four
//! RPC shapes, including the running-maximum duplex exchange.

pub mod config;
pub mod server;
