//! Server-side implementation of the calculator service.
//!
//! - [`handler`] - gRPC service entry point (`CalculatorHandler`).
//! - [`streaming`] - the exchange loops and factor generation.

pub mod handler;
pub mod streaming;
