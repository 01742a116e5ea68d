pub mod error;

pub use error::{Error, Result};

/// Generated bindings for the `greet` service.
pub mod greet {
    tonic::include_proto!("greet");
}

/// Generated bindings for the `calculator` service.
pub mod calculator {
    tonic::include_proto!("calculator");
}

/// Generated bindings for the `blog` service.
pub mod blog {
    tonic::include_proto!("blog");
}

/// Encoded file descriptor set covering all three services, registered with
/// the gRPC reflection service by each server binary.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("workshop_descriptor");
