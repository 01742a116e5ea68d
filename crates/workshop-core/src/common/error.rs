//! Error types shared by every workshop service.
//!
//! This module defines the central `Error` enum, which captures all
//! recoverable and reportable failure cases across the services. It
//! implements `From<Error>` for `tonic::Status` so handlers can propagate
//! failures to clients with the appropriate gRPC status code attached.
//!
//! ## Error cases
//! - `InvalidArgument`: the client request was malformed or outside the
//!   operation's domain.
//! - `NotFound`: a referenced entity does not exist.
//! - `Internal`: an unexpected transport or storage failure.
//! - `Cancelled` / `DeadlineExceeded`: the caller's time budget ran out.
//! - `StreamClosed`: a send was attempted after the local side already
//!   signaled completion.

use tonic::Status;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the workshop services.
#[derive(Clone, thiserror::Error, Debug)]
pub enum Error {
    /// The client request was invalid or outside the operation's domain.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The referenced entity does not exist.
    #[error("not found: {reason}")]
    NotFound { reason: String },

    /// An unexpected transport or storage failure.
    #[error("internal error: {context}")]
    Internal { context: String },

    /// The caller aborted the request.
    #[error("request cancelled by caller")]
    Cancelled,

    /// The caller's deadline fired before the work completed.
    #[error("caller deadline exceeded")]
    DeadlineExceeded,

    /// A send was attempted after the local side closed its direction.
    #[error("stream already closed for sending")]
    StreamClosed,
}

impl Error {
    /// Shorthand for an [`Error::Internal`] wrapping an underlying failure.
    pub fn internal(context: impl std::fmt::Display) -> Self {
        Self::Internal {
            context: context.to_string(),
        }
    }
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidArgument { reason } => Status::invalid_argument(reason),
            Error::NotFound { reason } => Status::not_found(reason),
            Error::Internal { context } => Status::internal(context),
            Error::Cancelled => Status::cancelled("request was cancelled"),
            Error::DeadlineExceeded => Status::deadline_exceeded("deadline exceeded"),
            Error::StreamClosed => Status::internal("send after stream close"),
        }
    }
}
