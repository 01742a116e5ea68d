//! Shared building blocks for the gRPC workshop services.
//!
//! This crate holds everything the greet, calculator, and blog services have
//! in common: the generated protobuf bindings, the unified [`Error`] type,
//! the duplex streaming primitives in [`exchange`], the cooperative deadline
//! helpers in [`deadline`], and tracing setup in [`telemetry`].

mod common;
pub use common::*;

pub mod deadline;
pub mod exchange;
pub mod shutdown;
pub mod telemetry;
